/*!
 * Syscalls Module
 * Mailbox system call surface
 */

mod executor;
mod mailbox;
mod types;

// Re-export public API
pub use executor::SyscallExecutor;
pub use types::{Syscall, SyscallError, SyscallResult};
