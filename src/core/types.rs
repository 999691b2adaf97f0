/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Mailbox identifier (chosen by the caller, immutable after creation)
pub type MailboxId = u64;

/// 32-bit cipher key supplied on every send/receive
pub type CipherKey = u32;

/// Common result type for kernel operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;
