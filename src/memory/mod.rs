/*!
 * Memory Module
 * Kernel memory budget and user/kernel copy boundary
 */

pub mod manager;
pub mod traits;
pub mod types;
pub mod user;

// Re-export for convenience
pub use manager::{KernelBuffer, MemoryManager, Reservation};
pub use traits::{Allocator, MemoryInfo};
pub use types::*;
pub use user::{UserAddressSpace, UserBoundary, UserPtr};
