/*!
 * Memory Management
 *
 * Budgeted kernel allocator with graceful OOM handling.
 *
 * Every allocation is charged against a fixed pool. Charges are carried by
 * RAII values ([`Reservation`], [`KernelBuffer`]) and returned to the pool
 * exactly once, when the value is dropped.
 */

use super::types::{MemoryError, MemoryPressure, MemoryResult, MemoryStats};
use crate::core::limits::{
    DEFAULT_MEMORY_POOL, MEMORY_CRITICAL_THRESHOLD, MEMORY_WARNING_THRESHOLD,
};
use crate::core::types::Size;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Shared accounting state
///
/// # Performance
/// - Cache-line aligned to prevent false sharing of atomic counters
#[repr(C, align(64))]
struct MemoryPool {
    total: Size,
    used: AtomicUsize,
    peak: AtomicUsize,
    allocations: AtomicU64,
    live: AtomicU64,
}

impl MemoryPool {
    fn release(&self, size: Size) {
        self.used.fetch_sub(size, Ordering::SeqCst);
    }
}

/// Memory manager
#[derive(Clone)]
pub struct MemoryManager {
    pool: Arc<MemoryPool>,
}

impl MemoryManager {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_POOL)
    }

    /// Create memory manager with custom capacity (useful for testing)
    pub fn with_capacity(total: Size) -> Self {
        info!(total_bytes = total, "Memory manager initialized");
        Self {
            pool: Arc::new(MemoryPool {
                total,
                used: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                allocations: AtomicU64::new(0),
                live: AtomicU64::new(0),
            }),
        }
    }

    /// Charge `size` bytes to the pool without backing storage
    pub fn reserve(&self, size: Size) -> MemoryResult<Reservation> {
        let total = self.pool.total;
        let previous = self
            .pool
            .used
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                used.checked_add(size).filter(|next| *next <= total)
            })
            .map_err(|used| {
                let available = total.saturating_sub(used);
                error!(
                    requested = size,
                    available, used, total, "OOM: kernel memory pool exhausted"
                );
                MemoryError::OutOfMemory {
                    requested: size,
                    available,
                    used,
                    total,
                }
            })?;

        let used = previous + size;
        self.pool.peak.fetch_max(used, Ordering::SeqCst);
        self.pool.allocations.fetch_add(1, Ordering::Relaxed);
        self.pool.live.fetch_add(1, Ordering::Relaxed);

        if let Some(level) = self.check_memory_pressure(used) {
            warn!(
                pressure = %level,
                size,
                used,
                total,
                "Memory pressure {}: {:.1}% used",
                level,
                (used as f64 / total as f64) * 100.0
            );
        } else {
            debug!(size, used, "Reserved kernel memory");
        }

        Ok(Reservation {
            pool: Arc::clone(&self.pool),
            size,
        })
    }

    /// Allocate `size` bytes of zeroed kernel storage
    pub fn allocate(&self, size: Size) -> MemoryResult<KernelBuffer> {
        let reservation = self.reserve(size)?;

        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|_| {
            error!(requested = size, "Host allocation failed after budget check");
            MemoryError::AllocationFailed { requested: size }
        })?;
        data.resize(size, 0u8);

        Ok(KernelBuffer { data, reservation })
    }

    /// Get memory info as (total, used, available)
    pub fn info(&self) -> (Size, Size, Size) {
        let used = self.pool.used.load(Ordering::SeqCst);
        (self.pool.total, used, self.pool.total.saturating_sub(used))
    }

    /// Bytes currently charged to the pool
    pub fn used(&self) -> Size {
        self.pool.used.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> MemoryStats {
        let (total, used, available) = self.info();
        MemoryStats {
            total_memory: total,
            used_memory: used,
            available_memory: available,
            peak_memory: self.pool.peak.load(Ordering::SeqCst),
            usage_percentage: if total == 0 {
                100.0
            } else {
                (used as f64 / total as f64) * 100.0
            },
            allocation_count: self.pool.allocations.load(Ordering::Relaxed),
            live_allocations: self.pool.live.load(Ordering::Relaxed),
        }
    }

    pub fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }

    /// Check memory pressure level
    fn check_memory_pressure(&self, used: Size) -> Option<MemoryPressure> {
        let usage_ratio = used as f64 / self.pool.total as f64;

        if usage_ratio >= MEMORY_CRITICAL_THRESHOLD {
            Some(MemoryPressure::Critical)
        } else if usage_ratio >= MEMORY_WARNING_THRESHOLD {
            Some(MemoryPressure::High)
        } else {
            None
        }
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Bytes charged to a [`MemoryManager`], released on drop
pub struct Reservation {
    pool: Arc<MemoryPool>,
    size: Size,
}

impl Reservation {
    pub fn size(&self) -> Size {
        self.size
    }

    /// Return everything above `size` to the pool
    fn shrink_to(&mut self, size: Size) {
        if size < self.size {
            self.pool.release(self.size - size);
            self.size = size;
        }
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.pool.release(self.size);
        self.pool.live.fetch_sub(1, Ordering::Relaxed);
    }
}

impl fmt::Debug for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation").field("size", &self.size).finish()
    }
}

/// Zero-initialised kernel byte buffer owned by exactly one holder
pub struct KernelBuffer {
    data: Vec<u8>,
    reservation: Reservation,
}

impl KernelBuffer {
    /// Drop bytes past `len` and return their charge to the pool
    pub fn truncate(&mut self, len: Size) {
        if len < self.data.len() {
            self.data.truncate(len);
            self.data.shrink_to_fit();
            self.reservation.shrink_to(len);
        }
    }

    /// Bytes charged for this buffer
    pub fn charged(&self) -> Size {
        self.reservation.size()
    }
}

impl Deref for KernelBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for KernelBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl fmt::Debug for KernelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelBuffer")
            .field("len", &self.data.len())
            .field("charged", &self.reservation.size())
            .finish()
    }
}
