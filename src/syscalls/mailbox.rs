/*!
 * Mailbox Syscalls
 * Thin handlers from syscall arguments to mailbox operations
 */

use super::executor::{SyscallExecutor, SyscallOutcome};
use crate::core::types::{CipherKey, MailboxId, Pid, Size};
use crate::memory::{UserBoundary, UserPtr};
use tracing::{debug, info};

impl SyscallExecutor {
    pub(super) fn create_mailbox(&self, pid: Pid, id: MailboxId) -> SyscallOutcome {
        self.mailboxes.create(id)?;
        info!(pid, id, "Process created mailbox");
        Ok(0)
    }

    pub(super) fn remove_mailbox(&self, pid: Pid, id: MailboxId) -> SyscallOutcome {
        self.mailboxes.remove(id)?;
        info!(pid, id, "Process removed mailbox");
        Ok(0)
    }

    pub(super) fn count_mailboxes(&self) -> SyscallOutcome {
        Ok(self.mailboxes.count())
    }

    pub(super) fn list_mailboxes(
        &self,
        boundary: &dyn UserBoundary,
        buffer: UserPtr,
        capacity: Size,
    ) -> SyscallOutcome {
        Ok(self.mailboxes.list(boundary, buffer, capacity)?)
    }

    pub(super) fn count_messages(&self, id: MailboxId) -> SyscallOutcome {
        Ok(self.mailboxes.count_messages(id)?)
    }

    pub(super) fn send_message(
        &self,
        pid: Pid,
        boundary: &dyn UserBoundary,
        id: MailboxId,
        payload: UserPtr,
        len: Size,
        key: CipherKey,
    ) -> SyscallOutcome {
        let accepted = self.mailboxes.send(boundary, id, payload, len, key)?;
        if accepted < len {
            debug!(pid, id, requested = len, accepted, "Short send");
        }
        Ok(accepted)
    }

    pub(super) fn receive_message(
        &self,
        pid: Pid,
        boundary: &dyn UserBoundary,
        id: MailboxId,
        buffer: UserPtr,
        max_len: Size,
        key: CipherKey,
    ) -> SyscallOutcome {
        let delivered = self.mailboxes.receive(boundary, id, buffer, max_len, key)?;
        debug!(pid, id, delivered, "Process received message");
        Ok(delivered)
    }
}
