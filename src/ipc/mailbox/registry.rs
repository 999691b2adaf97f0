/*!
 * Mailbox Registry
 * The set of live mailboxes keyed by id
 */

use super::queue::MessageQueue;
use super::types::{MailboxError, MailboxResult, MailboxStats};
use crate::core::types::{MailboxId, Size};
use crate::memory::Reservation;
use ahash::RandomState;
use std::collections::HashMap;

/// A named message queue
///
/// Holds the memory reservation for its own record; the charge is returned
/// when the mailbox is destroyed.
#[derive(Debug)]
pub struct Mailbox {
    id: MailboxId,
    queue: MessageQueue,
    _reservation: Reservation,
}

impl Mailbox {
    pub fn new(id: MailboxId, reservation: Reservation) -> Self {
        Self {
            id,
            queue: MessageQueue::new(id),
            _reservation: reservation,
        }
    }

    #[inline]
    pub fn id(&self) -> MailboxId {
        self.id
    }

    #[inline]
    pub fn msg_count(&self) -> Size {
        self.queue.msg_count()
    }

    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut MessageQueue {
        &mut self.queue
    }

    pub fn stats(&self) -> MailboxStats {
        MailboxStats {
            id: self.id,
            msg_count: self.queue.msg_count(),
            bytes_queued: self.queue.bytes_queued(),
        }
    }
}

/// Registry of mailboxes
///
/// Ids are pairwise distinct and `count()` always equals the number of live
/// mailboxes; both follow from the map being the only owner.
#[derive(Debug, Default)]
pub struct Registry {
    mailboxes: HashMap<MailboxId, Mailbox, RandomState>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            mailboxes: HashMap::with_hasher(RandomState::new()),
        }
    }

    #[inline]
    pub fn contains(&self, id: MailboxId) -> bool {
        self.mailboxes.contains_key(&id)
    }

    /// Insert a new mailbox, rejecting duplicate ids
    pub fn insert(&mut self, mailbox: Mailbox) -> MailboxResult<()> {
        let id = mailbox.id();
        if self.contains(id) {
            return Err(MailboxError::DuplicateId(id));
        }
        self.mailboxes.insert(id, mailbox);
        Ok(())
    }

    /// Detach an empty mailbox
    ///
    /// Fails with `NotEmpty` (leaving the mailbox in place) while messages
    /// are queued.
    pub fn detach(&mut self, id: MailboxId) -> MailboxResult<Mailbox> {
        let msg_count = self.find(id)?.msg_count();
        if msg_count > 0 {
            return Err(MailboxError::NotEmpty { id, msg_count });
        }
        self.mailboxes.remove(&id).ok_or(MailboxError::NotFound(id))
    }

    pub fn find(&self, id: MailboxId) -> MailboxResult<&Mailbox> {
        self.mailboxes.get(&id).ok_or(MailboxError::NotFound(id))
    }

    pub fn find_mut(&mut self, id: MailboxId) -> MailboxResult<&mut Mailbox> {
        self.mailboxes.get_mut(&id).ok_or(MailboxError::NotFound(id))
    }

    /// Number of live mailboxes
    #[inline]
    pub fn count(&self) -> Size {
        self.mailboxes.len()
    }

    /// Ids in traversal order
    pub fn ids(&self) -> impl Iterator<Item = MailboxId> + '_ {
        self.mailboxes.keys().copied()
    }

    /// Detach every mailbox regardless of queued messages
    pub fn drain(&mut self) -> impl Iterator<Item = Mailbox> + '_ {
        self.mailboxes.drain().map(|(_, mailbox)| mailbox)
    }
}
