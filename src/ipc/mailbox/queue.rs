/*!
 * Message Queue
 * Per-mailbox first-in-first-out queue of ciphered messages
 */

use super::types::{MailboxError, MailboxResult};
use crate::core::types::{MailboxId, Size};
use crate::memory::KernelBuffer;
use std::collections::VecDeque;

/// One queued message
///
/// The buffer is owned exclusively by the message until it is dequeued.
#[derive(Debug)]
pub struct Message {
    buffer: KernelBuffer,
}

impl Message {
    /// Wrap a buffer whose length is exactly the accepted byte count
    pub fn new(buffer: KernelBuffer) -> Self {
        Self { buffer }
    }

    #[inline]
    pub fn len(&self) -> Size {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

/// FIFO queue owned by a single mailbox
#[derive(Debug)]
pub struct MessageQueue {
    owner: MailboxId,
    messages: VecDeque<Message>,
    bytes_queued: Size,
}

impl MessageQueue {
    pub fn new(owner: MailboxId) -> Self {
        Self {
            owner,
            messages: VecDeque::new(),
            bytes_queued: 0,
        }
    }

    /// Append at the tail
    pub fn enqueue(&mut self, message: Message) {
        self.bytes_queued += message.len();
        self.messages.push_back(message);
    }

    /// Detach the head, failing with `Empty` when nothing is queued
    pub fn dequeue(&mut self) -> MailboxResult<Message> {
        let message = self
            .messages
            .pop_front()
            .ok_or(MailboxError::Empty(self.owner))?;
        self.bytes_queued -= message.len();
        Ok(message)
    }

    /// Put a message back at the head
    pub(super) fn restore_front(&mut self, message: Message) {
        self.bytes_queued += message.len();
        self.messages.push_front(message);
    }

    /// Number of queued messages
    #[inline]
    pub fn msg_count(&self) -> Size {
        self.messages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total payload bytes held by the queue
    #[inline]
    pub fn bytes_queued(&self) -> Size {
        self.bytes_queued
    }

    pub fn first(&self) -> Option<&Message> {
        self.messages.front()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    /// Remove every message in order
    pub fn drain(&mut self) -> impl Iterator<Item = Message> + '_ {
        self.bytes_queued = 0;
        self.messages.drain(..)
    }
}
