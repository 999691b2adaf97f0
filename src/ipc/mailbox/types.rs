/*!
 * Mailbox Types
 * Error taxonomy and statistics for the mailbox facility
 */

use crate::core::types::{Address, MailboxId, Size};
use crate::memory::{BoundaryError, MemoryError};
use miette::Diagnostic;
use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mailbox operation result
///
/// # Must Use
/// Mailbox operations can fail and must be handled
pub type MailboxResult<T> = Result<T, MailboxError>;

/// Mailbox error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum MailboxError {
    #[error("Mailbox {0} already exists")]
    #[diagnostic(
        code(mailbox::duplicate_id),
        help("Mailbox ids are unique. Remove the existing mailbox or pick another id.")
    )]
    DuplicateId(MailboxId),

    #[error("Mailbox {0} not found")]
    #[diagnostic(
        code(mailbox::not_found),
        help("No mailbox has this id. List mailboxes to see the live ids.")
    )]
    NotFound(MailboxId),

    #[error("Mailbox {id} still holds {msg_count} message(s)")]
    #[diagnostic(
        code(mailbox::not_empty),
        help("Only empty mailboxes can be removed. Receive the pending messages first.")
    )]
    NotEmpty { id: MailboxId, msg_count: Size },

    #[error("Mailbox {0} has no messages")]
    #[diagnostic(
        code(mailbox::empty),
        help("Receive never blocks. Retry after a sender has delivered a message.")
    )]
    Empty(MailboxId),

    #[error("Out of kernel memory: requested {requested} bytes, {available} available")]
    #[diagnostic(
        code(mailbox::out_of_memory),
        help("The kernel memory pool is exhausted. Drain or remove mailboxes to free space.")
    )]
    OutOfMemory { requested: Size, available: Size },

    #[error("Bad user address 0x{address:x}")]
    #[diagnostic(
        code(mailbox::fault),
        help("The supplied buffer pointer does not address mapped memory.")
    )]
    Fault { address: Address },

    #[error("Partial copy: wrote {written} of {requested} entries before the user buffer ended")]
    #[diagnostic(
        code(mailbox::partial_copy),
        help("The destination buffer is shorter than the requested capacity.")
    )]
    PartialCopy { written: Size, requested: Size },
}

impl MailboxError {
    /// Errno reported to callers for this error kind
    #[must_use]
    pub const fn errno(&self) -> Errno {
        match self {
            MailboxError::DuplicateId(_) => Errno::EEXIST,
            MailboxError::NotFound(_) => Errno::ENOENT,
            MailboxError::NotEmpty { .. } => Errno::ENOTEMPTY,
            MailboxError::Empty(_) => Errno::ENOMSG,
            MailboxError::OutOfMemory { .. } => Errno::ENOMEM,
            MailboxError::Fault { .. } => Errno::EFAULT,
            MailboxError::PartialCopy { .. } => Errno::EIO,
        }
    }

    /// Negative return code (`-errno`)
    #[inline]
    #[must_use]
    pub const fn abi_code(&self) -> i64 {
        -(self.errno() as i64)
    }
}

impl From<MemoryError> for MailboxError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::OutOfMemory {
                requested,
                available,
                ..
            } => MailboxError::OutOfMemory {
                requested,
                available,
            },
            MemoryError::AllocationFailed { requested } => MailboxError::OutOfMemory {
                requested,
                available: 0,
            },
        }
    }
}

impl From<BoundaryError> for MailboxError {
    fn from(err: BoundaryError) -> Self {
        match err {
            BoundaryError::Fault { address } => MailboxError::Fault { address },
        }
    }
}

/// Mailbox statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxStats {
    pub id: MailboxId,
    pub msg_count: Size,
    pub bytes_queued: Size,
}
