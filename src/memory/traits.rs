/*!
 * Memory Traits
 * Allocation and accounting seams of the kernel memory pool
 */

use super::manager::{KernelBuffer, MemoryManager, Reservation};
use super::types::{MemoryPressure, MemoryResult, MemoryStats};
use crate::core::types::Size;

/// Kernel storage allocator
///
/// Freeing is implicit: dropping the returned value returns its charge.
pub trait Allocator: MemoryInfo + Send + Sync {
    /// Allocate `size` zeroed bytes
    fn allocate(&self, size: Size) -> MemoryResult<KernelBuffer>;

    /// Charge `size` bytes without handing out storage
    fn reserve(&self, size: Size) -> MemoryResult<Reservation>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    fn stats(&self) -> MemoryStats;

    /// Memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size);

    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

impl Allocator for MemoryManager {
    fn allocate(&self, size: Size) -> MemoryResult<KernelBuffer> {
        MemoryManager::allocate(self, size)
    }

    fn reserve(&self, size: Size) -> MemoryResult<Reservation> {
        MemoryManager::reserve(self, size)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        MemoryManager::info(self)
    }
}

#[cfg(test)]
mockall::mock! {
    pub Pool {}

    impl MemoryInfo for Pool {
        fn stats(&self) -> MemoryStats;
        fn info(&self) -> (Size, Size, Size);
    }

    impl Allocator for Pool {
        fn allocate(&self, size: Size) -> MemoryResult<KernelBuffer>;
        fn reserve(&self, size: Size) -> MemoryResult<Reservation>;
    }
}
