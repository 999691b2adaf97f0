/*!
 * Error Types
 * Kernel-wide error umbrella over the per-subsystem error types
 */

use miette::Diagnostic;
use thiserror::Error;

pub use crate::core::config::ConfigError;
pub use crate::ipc::mailbox::MailboxError;
pub use crate::memory::{BoundaryError, MemoryError};
pub use crate::syscalls::SyscallError;

/// Any error the kernel can surface
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Mailbox(#[from] MailboxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Boundary(#[from] BoundaryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syscall(#[from] SyscallError),
}
