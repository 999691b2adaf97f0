/*!
 * Mailbox Kernel Library
 * In-kernel mailbox IPC: registry, ciphered FIFO queues, and the syscall surface
 */

pub mod core;
pub mod ipc;
pub mod memory;
pub mod monitoring;
pub mod syscalls;

// Re-exports
pub use crate::core::{ConfigError, KernelConfig, KernelError};
pub use ipc::mailbox::{BlockCipher, MailboxError, MailboxManager, MailboxResult, MailboxStats};
pub use memory::{
    Allocator, BoundaryError, KernelBuffer, MemoryError, MemoryManager, MemoryStats,
    UserAddressSpace, UserBoundary, UserPtr,
};
pub use monitoring::{init_tracing, MailboxMetrics, MetricsSnapshot, SyscallSpan};
pub use syscalls::{Syscall, SyscallError, SyscallExecutor, SyscallResult};
