/*!
 * Syscall Types
 * Mailbox syscall requests, results, and errors
 */

use crate::core::types::{CipherKey, MailboxId, Size};
use crate::ipc::mailbox::MailboxError;
use crate::memory::UserPtr;
use miette::Diagnostic;
use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mailbox system calls
///
/// Buffer arguments are addresses in the calling process; the executor
/// reaches them through a `UserBoundary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "syscall")]
pub enum Syscall {
    CreateMailbox {
        id: MailboxId,
    },
    RemoveMailbox {
        id: MailboxId,
    },
    CountMailboxes,
    ListMailboxes {
        buffer: UserPtr,
        capacity: Size,
    },
    CountMessages {
        id: MailboxId,
    },
    SendMessage {
        id: MailboxId,
        payload: UserPtr,
        len: Size,
        key: CipherKey,
    },
    ReceiveMessage {
        id: MailboxId,
        buffer: UserPtr,
        max_len: Size,
        key: CipherKey,
    },
}

impl Syscall {
    /// Stable name used in spans and logs
    pub const fn name(&self) -> &'static str {
        match self {
            Syscall::CreateMailbox { .. } => "create_mailbox",
            Syscall::RemoveMailbox { .. } => "remove_mailbox",
            Syscall::CountMailboxes => "count_mailboxes",
            Syscall::ListMailboxes { .. } => "list_mailboxes",
            Syscall::CountMessages { .. } => "count_messages",
            Syscall::SendMessage { .. } => "send_message",
            Syscall::ReceiveMessage { .. } => "receive_message",
        }
    }

    /// Decode a JSON-encoded request
    pub fn from_json(request: &[u8]) -> Result<Self, SyscallError> {
        serde_json::from_slice(request)
            .map_err(|e| SyscallError::MalformedRequest(e.to_string()))
    }
}

/// Syscall failures
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum SyscallError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mailbox(#[from] MailboxError),

    #[error("Malformed syscall request: {0}")]
    #[diagnostic(
        code(syscall::malformed_request),
        help("Requests are JSON objects tagged with a \"syscall\" field.")
    )]
    MalformedRequest(String),

    #[error("Return value {0} does not fit the syscall ABI")]
    #[diagnostic(code(syscall::overflow))]
    ReturnOverflow(Size),
}

impl SyscallError {
    pub const fn errno(&self) -> Errno {
        match self {
            SyscallError::Mailbox(err) => err.errno(),
            SyscallError::MalformedRequest(_) => Errno::EINVAL,
            SyscallError::ReturnOverflow(_) => Errno::EOVERFLOW,
        }
    }

    /// Negative return code (`-errno`)
    #[inline]
    pub const fn abi_code(&self) -> i64 {
        -(self.errno() as i64)
    }
}

/// Result of one syscall as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum SyscallResult {
    Success { value: i64 },
    Error { code: i64, message: String },
}

impl SyscallResult {
    #[inline]
    #[must_use]
    pub const fn success(value: i64) -> Self {
        Self::Success { value }
    }

    #[inline]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Raw ABI value: the result on success, `-errno` on failure
    #[inline]
    #[must_use]
    pub const fn return_code(&self) -> i64 {
        match self {
            Self::Success { value } => *value,
            Self::Error { code, .. } => *code,
        }
    }
}

impl From<SyscallError> for SyscallResult {
    fn from(err: SyscallError) -> Self {
        Self::Error {
            code: err.abi_code(),
            message: err.to_string(),
        }
    }
}

impl From<MailboxError> for SyscallResult {
    fn from(err: MailboxError) -> Self {
        SyscallError::from(err).into()
    }
}
