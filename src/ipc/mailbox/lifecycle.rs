/*!
 * Mailbox Lifecycle Operations
 * Create, remove, count, list, and teardown
 */

use super::manager::MailboxManager;
use super::registry::Mailbox;
use super::types::{MailboxError, MailboxResult, MailboxStats};
use crate::core::limits::MAILBOX_ID_WIDTH;
use crate::core::types::{MailboxId, Size};
use crate::memory::{Allocator, UserBoundary, UserPtr};
use tracing::{debug, info, warn};

/// Bytes charged to the memory pool for one mailbox record
pub const MAILBOX_RECORD_SIZE: Size = std::mem::size_of::<Mailbox>();

impl MailboxManager {
    /// Create an empty mailbox with the given id
    pub fn create(&self, id: MailboxId) -> MailboxResult<()> {
        let mut registry = self.gate.enter("create_mailbox");

        if registry.contains(id) {
            debug!(id, "Rejected duplicate mailbox id");
            self.metrics.record_failure();
            return Err(MailboxError::DuplicateId(id));
        }

        let reservation = self
            .allocator
            .reserve(MAILBOX_RECORD_SIZE)
            .map_err(|e| {
                self.metrics.record_failure();
                MailboxError::from(e)
            })?;
        registry.insert(Mailbox::new(id, reservation))?;
        self.metrics.record_created();

        info!(id, total = registry.count(), "Created mailbox");
        Ok(())
    }

    /// Remove an empty mailbox
    pub fn remove(&self, id: MailboxId) -> MailboxResult<()> {
        let mut registry = self.gate.enter("remove_mailbox");

        let mailbox = registry.detach(id).inspect_err(|e| {
            debug!(id, error = %e, "Mailbox removal refused");
            self.metrics.record_failure();
        })?;
        drop(mailbox);
        self.metrics.record_removed();

        info!(id, total = registry.count(), "Removed mailbox");
        Ok(())
    }

    /// Number of live mailboxes
    pub fn count(&self) -> Size {
        self.gate.enter("count_mailboxes").count()
    }

    /// Up to `limit` mailbox ids in registry traversal order
    pub fn ids(&self, limit: Size) -> Vec<MailboxId> {
        self.gate
            .enter("mailbox_ids")
            .ids()
            .take(limit)
            .collect()
    }

    /// Write up to `capacity` ids to the user buffer at `dst`
    ///
    /// Ids are written one at a time as native-endian u64 values. A copy that
    /// transfers fewer bytes than an id needs stops the listing and reports
    /// how many ids made it.
    pub fn list<B>(&self, boundary: &B, dst: UserPtr, capacity: Size) -> MailboxResult<Size>
    where
        B: UserBoundary + ?Sized,
    {
        let registry = self.gate.enter("list_mailboxes");
        let requested = capacity.min(registry.count());
        let mut written = 0;

        for id in registry.ids().take(capacity) {
            let bytes = id.to_ne_bytes();
            let slot = dst.offset(written * MAILBOX_ID_WIDTH);

            match boundary.copy_to_user(slot, &bytes) {
                Ok(copied) if copied == bytes.len() => written += 1,
                Ok(copied) => {
                    warn!(written, requested, copied, "Mailbox listing cut short");
                    self.metrics.record_failure();
                    return Err(MailboxError::PartialCopy { written, requested });
                }
                Err(e) if written == 0 => {
                    warn!(error = %e, "Mailbox listing faulted");
                    self.metrics.record_failure();
                    return Err(e.into());
                }
                Err(e) => {
                    warn!(written, requested, error = %e, "Mailbox listing cut short");
                    self.metrics.record_failure();
                    return Err(MailboxError::PartialCopy { written, requested });
                }
            }
        }

        debug!(written, capacity, "Listed mailboxes");
        Ok(written)
    }

    /// Snapshot of one mailbox
    pub fn stats(&self, id: MailboxId) -> MailboxResult<MailboxStats> {
        self.gate
            .enter("mailbox_stats")
            .find(id)
            .map(Mailbox::stats)
    }

    /// Explicit teardown: destroy every mailbox and any queued messages
    ///
    /// Returns the number of mailboxes destroyed.
    pub fn shutdown(&self) -> Size {
        let mut registry = self.gate.enter("shutdown");
        let mut destroyed = 0;
        let mut discarded = 0;

        for mut mailbox in registry.drain() {
            discarded += mailbox.queue_mut().drain().count();
            destroyed += 1;
        }

        if discarded > 0 {
            warn!(discarded, "Discarded undelivered messages during teardown");
        }
        info!(destroyed, "Mailbox registry torn down");
        destroyed
    }
}
