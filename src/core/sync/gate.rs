/*!
 * Exclusion Gate
 *
 * A single mutual-exclusion lock around a protected value. Access is only
 * possible through a [`GateGuard`], so the lock is held for the whole
 * critical section and released on every exit path, including early error
 * returns and unwinding.
 *
 * # Observability
 *
 * - Counts acquisitions and contended acquisitions
 * - Tracks the longest hold time
 * - Warns when a critical section outlives the configured threshold
 */

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{trace, warn};

/// Gate statistics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateStats {
    pub acquisitions: u64,
    pub contended: u64,
    pub longest_hold_us: u64,
}

/// Global mutual-exclusion gate
///
/// # Performance
/// - Cache-line aligned so the lock word does not share a line with neighbours
#[repr(C, align(64))]
pub struct ExclusionGate<T> {
    lock: Mutex<T>,
    hold_warning: Duration,
    acquisitions: AtomicU64,
    contended: AtomicU64,
    longest_hold_us: AtomicU64,
}

impl<T> ExclusionGate<T> {
    pub fn new(value: T, hold_warning: Duration) -> Self {
        Self {
            lock: Mutex::new(value),
            hold_warning,
            acquisitions: AtomicU64::new(0),
            contended: AtomicU64::new(0),
            longest_hold_us: AtomicU64::new(0),
        }
    }

    /// Acquire the gate for the named operation, blocking until available
    pub fn enter(&self, operation: &'static str) -> GateGuard<'_, T> {
        let guard = match self.lock.try_lock() {
            Some(guard) => guard,
            None => {
                self.contended.fetch_add(1, Ordering::Relaxed);
                self.lock.lock()
            }
        };
        self.acquisitions.fetch_add(1, Ordering::Relaxed);
        trace!(operation, "gate acquired");

        GateGuard {
            guard,
            gate: self,
            operation,
            acquired_at: Instant::now(),
        }
    }

    /// Run `f` with exclusive access, releasing the gate when it returns
    pub fn with<R>(&self, operation: &'static str, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.enter(operation);
        f(&mut guard)
    }

    /// Whether some caller currently holds the gate
    pub fn is_held(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn stats(&self) -> GateStats {
        GateStats {
            acquisitions: self.acquisitions.load(Ordering::Relaxed),
            contended: self.contended.load(Ordering::Relaxed),
            longest_hold_us: self.longest_hold_us.load(Ordering::Relaxed),
        }
    }
}

impl<T> fmt::Debug for ExclusionGate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExclusionGate")
            .field("held", &self.is_held())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Scoped proof that the gate is held
pub struct GateGuard<'a, T> {
    guard: MutexGuard<'a, T>,
    gate: &'a ExclusionGate<T>,
    operation: &'static str,
    acquired_at: Instant,
}

impl<T> Deref for GateGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for GateGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for GateGuard<'_, T> {
    fn drop(&mut self) {
        let held = self.acquired_at.elapsed();
        self.gate
            .longest_hold_us
            .fetch_max(held.as_micros() as u64, Ordering::Relaxed);

        if held > self.gate.hold_warning {
            warn!(
                operation = self.operation,
                held_us = held.as_micros() as u64,
                "slow critical section under exclusion gate"
            );
        } else {
            trace!(operation = self.operation, held_us = held.as_micros() as u64, "gate released");
        }
        // MutexGuard field drops after this, releasing the lock
    }
}
