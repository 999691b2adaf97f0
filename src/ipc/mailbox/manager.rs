/*!
 * Mailbox Manager
 * Operation layer over the registry, serialized by one exclusion gate
 */

use super::registry::Registry;
use crate::core::config::KernelConfig;
use crate::core::limits::DEFAULT_GATE_HOLD_WARNING;
use crate::core::sync::{ExclusionGate, GateStats};
use crate::memory::{Allocator, MemoryInfo};
use crate::monitoring::MailboxMetrics;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Mailbox manager
///
/// Constructed once at start-up and shared by cloning; every clone drives the
/// same registry. Every operation holds the gate for its full body. Record
/// and payload storage is charged through the `Allocator` it was built with.
pub struct MailboxManager {
    pub(super) gate: Arc<ExclusionGate<Registry>>,
    pub(super) allocator: Arc<dyn Allocator>,
    pub(super) metrics: Arc<MailboxMetrics>,
}

impl MailboxManager {
    pub fn new<A: Allocator + 'static>(allocator: A) -> Self {
        Self::with_gate_warning(Arc::new(allocator), DEFAULT_GATE_HOLD_WARNING)
    }

    /// Create a manager using the thresholds from `config`
    pub fn from_config<A: Allocator + 'static>(allocator: A, config: &KernelConfig) -> Self {
        Self::with_gate_warning(Arc::new(allocator), config.gate_hold_warning)
    }

    fn with_gate_warning(allocator: Arc<dyn Allocator>, hold_warning: Duration) -> Self {
        info!(
            gate_hold_warning_us = hold_warning.as_micros() as u64,
            "Mailbox manager initialized with global exclusion gate"
        );
        Self {
            gate: Arc::new(ExclusionGate::new(Registry::new(), hold_warning)),
            allocator,
            metrics: Arc::new(MailboxMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &MailboxMetrics {
        &self.metrics
    }

    pub fn gate_stats(&self) -> GateStats {
        self.gate.stats()
    }

    /// Bytes currently charged to the kernel memory pool
    pub fn memory_usage(&self) -> usize {
        let (_, used, _) = self.allocator.info();
        used
    }
}

impl Clone for MailboxManager {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            allocator: Arc::clone(&self.allocator),
            metrics: Arc::clone(&self.metrics),
        }
    }
}
