/*!
 * Mailbox Message Operations
 * Send, receive, and message counting
 */

use super::cipher::BlockCipher;
use super::manager::MailboxManager;
use super::queue::Message;
use super::types::{MailboxError, MailboxResult};
use crate::core::types::{CipherKey, MailboxId, Size};
use crate::memory::{Allocator, UserBoundary, UserPtr};
use tracing::{debug, warn};

impl MailboxManager {
    /// Number of messages queued in a mailbox
    pub fn count_messages(&self, id: MailboxId) -> MailboxResult<Size> {
        self.gate
            .enter("count_messages")
            .find(id)
            .map(|mailbox| mailbox.msg_count())
    }

    /// Copy `len` bytes from `payload`, cipher them with `key` and append
    /// them to mailbox `id`
    ///
    /// Returns the number of bytes accepted, which is less than `len` when
    /// the user buffer ends early. The stored message is exactly that long.
    pub fn send<B>(
        &self,
        boundary: &B,
        id: MailboxId,
        payload: UserPtr,
        len: Size,
        key: CipherKey,
    ) -> MailboxResult<Size>
    where
        B: UserBoundary + ?Sized,
    {
        let mut registry = self.gate.enter("send_message");

        let mut buffer = self.allocator.allocate(len).map_err(|e| {
            self.metrics.record_failure();
            MailboxError::from(e)
        })?;
        let accepted = boundary.copy_from_user(payload, &mut buffer).map_err(|e| {
            warn!(id, error = %e, "Send payload faulted");
            self.metrics.record_failure();
            MailboxError::from(e)
        })?;
        if accepted < len {
            debug!(id, requested = len, accepted, "Partial copy from user");
            buffer.truncate(accepted);
        }

        let mailbox = registry.find_mut(id).inspect_err(|_| self.metrics.record_failure())?;

        BlockCipher::new(key).apply(&mut buffer);
        mailbox.queue_mut().enqueue(Message::new(buffer));
        self.metrics.record_sent(accepted);

        debug!(id, bytes = accepted, queued = mailbox.msg_count(), "Message sent");
        Ok(accepted)
    }

    /// Detach the head message of mailbox `id`, decipher it with `key` and
    /// copy up to `max_len` bytes to `out`
    ///
    /// Returns the number of bytes delivered. The message is consumed even if
    /// it was longer than `max_len` or the copy was cut short; only a copy
    /// that faults before transferring anything leaves it queued.
    pub fn receive<B>(
        &self,
        boundary: &B,
        id: MailboxId,
        out: UserPtr,
        max_len: Size,
        key: CipherKey,
    ) -> MailboxResult<Size>
    where
        B: UserBoundary + ?Sized,
    {
        let mut registry = self.gate.enter("receive_message");

        let queue = registry
            .find_mut(id)
            .inspect_err(|_| self.metrics.record_failure())?
            .queue_mut();
        let mut message = queue
            .dequeue()
            .inspect_err(|_| self.metrics.record_failure())?;

        let cipher = BlockCipher::new(key);
        cipher.apply(message.bytes_mut());

        let copy_len = message.len().min(max_len);
        let copied = boundary.copy_to_user(out, &message.bytes()[..copy_len]);
        let delivered = match copied {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!(id, error = %e, "Receive buffer faulted, message kept at head");
                cipher.apply(message.bytes_mut());
                queue.restore_front(message);
                self.metrics.record_failure();
                return Err(e.into());
            }
        };

        if delivered < message.len() {
            debug!(
                id,
                length = message.len(),
                delivered,
                "Message delivered partially"
            );
        }
        drop(message);
        self.metrics.record_received(delivered);

        debug!(id, bytes = delivered, remaining = queue.msg_count(), "Message received");
        Ok(delivered)
    }
}
