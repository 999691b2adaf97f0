/*!
 * Syscall Executor
 * Dispatches mailbox syscalls and converts outcomes to ABI return codes
 */

use super::types::{Syscall, SyscallError, SyscallResult};
use crate::core::types::{Pid, Size};
use crate::ipc::mailbox::MailboxManager;
use crate::memory::UserBoundary;
use crate::monitoring::SyscallSpan;
use tracing::{debug, info, warn};

/// Value of a successful syscall before ABI conversion
pub(super) type SyscallOutcome = Result<Size, SyscallError>;

/// System call executor
#[derive(Clone)]
pub struct SyscallExecutor {
    pub(super) mailboxes: MailboxManager,
}

impl SyscallExecutor {
    pub fn new(mailboxes: MailboxManager) -> Self {
        info!("Syscall executor initialized with mailbox support");
        Self { mailboxes }
    }

    pub fn mailboxes(&self) -> &MailboxManager {
        &self.mailboxes
    }

    /// Execute one syscall on behalf of `pid`
    ///
    /// `boundary` is the address space of the calling process.
    pub fn execute(&self, pid: Pid, boundary: &dyn UserBoundary, syscall: &Syscall) -> SyscallResult {
        let span = SyscallSpan::new(syscall.name(), pid);
        let _guard = span.enter();

        debug!(pid, syscall = syscall.name(), trace_id = %span.trace_id(), "Executing syscall");

        let outcome = match *syscall {
            Syscall::CreateMailbox { id } => self.create_mailbox(pid, id),
            Syscall::RemoveMailbox { id } => self.remove_mailbox(pid, id),
            Syscall::CountMailboxes => self.count_mailboxes(),
            Syscall::ListMailboxes { buffer, capacity } => {
                self.list_mailboxes(boundary, buffer, capacity)
            }
            Syscall::CountMessages { id } => self.count_messages(id),
            Syscall::SendMessage {
                id,
                payload,
                len,
                key,
            } => self.send_message(pid, boundary, id, payload, len, key),
            Syscall::ReceiveMessage {
                id,
                buffer,
                max_len,
                key,
            } => self.receive_message(pid, boundary, id, buffer, max_len, key),
        };

        let result = match outcome.and_then(|value| {
            i64::try_from(value).map_err(|_| SyscallError::ReturnOverflow(value))
        }) {
            Ok(value) => {
                span.record_return(value);
                SyscallResult::success(value)
            }
            Err(err) => {
                let message = err.to_string();
                span.record_error(&message);
                warn!(pid, syscall = syscall.name(), code = err.abi_code(), %message, "Syscall failed");
                SyscallResult::from(err)
            }
        };

        self.mailboxes.metrics().record_latency(span.elapsed());
        result
    }

    /// Decode a JSON request and execute it
    pub fn execute_json(&self, pid: Pid, boundary: &dyn UserBoundary, request: &[u8]) -> SyscallResult {
        match Syscall::from_json(request) {
            Ok(syscall) => self.execute(pid, boundary, &syscall),
            Err(err) => {
                warn!(pid, error = %err, "Rejected syscall request");
                SyscallResult::from(err)
            }
        }
    }
}
