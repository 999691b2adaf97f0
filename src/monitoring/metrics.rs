/*!
 * Mailbox Metrics
 * Lock-free operation counters plus a syscall latency histogram
 */

use crate::core::serde::is_zero_u64;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Latency buckets in seconds
const LATENCY_BUCKETS: [f64; 9] = [0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1];

/// Cumulative latency histogram
#[derive(Debug, Clone)]
struct Histogram {
    counts: [u64; LATENCY_BUCKETS.len()],
    sum: f64,
    count: u64,
}

impl Histogram {
    const fn new() -> Self {
        Self {
            counts: [0; LATENCY_BUCKETS.len()],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;

        for (bucket, count) in LATENCY_BUCKETS.iter().zip(self.counts.iter_mut()) {
            if value <= *bucket {
                *count += 1;
            }
        }
    }

    fn percentile(&self, p: f64) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        let target = ((self.count as f64 * p).ceil() as u64).max(1);
        LATENCY_BUCKETS
            .iter()
            .zip(self.counts.iter())
            .find(|(_, count)| **count >= target)
            .map(|(bucket, _)| *bucket)
            .unwrap_or(LATENCY_BUCKETS[LATENCY_BUCKETS.len() - 1])
    }

    fn stats(&self) -> HistogramStats {
        HistogramStats {
            count: self.count,
            sum: self.sum,
            avg: if self.count > 0 {
                self.sum / self.count as f64
            } else {
                0.0
            },
            p50: self.percentile(0.50),
            p95: self.percentile(0.95),
            p99: self.percentile(0.99),
        }
    }
}

/// Mailbox facility metrics
///
/// # Performance
/// - Cache-line aligned to prevent false sharing between hot counters
#[repr(C, align(64))]
pub struct MailboxMetrics {
    mailboxes_created: AtomicU64,
    mailboxes_removed: AtomicU64,
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    failed_operations: AtomicU64,
    syscall_latency: Mutex<Histogram>,
    start_time: Instant,
}

impl MailboxMetrics {
    pub fn new() -> Self {
        Self {
            mailboxes_created: AtomicU64::new(0),
            mailboxes_removed: AtomicU64::new(0),
            messages_sent: AtomicU64::new(0),
            messages_received: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            failed_operations: AtomicU64::new(0),
            syscall_latency: Mutex::new(Histogram::new()),
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn record_created(&self) {
        self.mailboxes_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_removed(&self) {
        self.mailboxes_removed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sent(&self, bytes: usize) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_received(&self, bytes: usize) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.failed_operations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how long one syscall took end to end
    pub fn record_latency(&self, duration: Duration) {
        self.syscall_latency.lock().observe(duration.as_secs_f64());
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            mailboxes_created: self.mailboxes_created.load(Ordering::Relaxed),
            mailboxes_removed: self.mailboxes_removed.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            failed_operations: self.failed_operations.load(Ordering::Relaxed),
            syscall_latency: self.syscall_latency.lock().stats(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for MailboxMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MailboxMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxMetrics")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// Histogram statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HistogramStats {
    pub count: u64,
    pub sum: f64,
    pub avg: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Snapshot of all metrics at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsSnapshot {
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub mailboxes_created: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub mailboxes_removed: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub messages_sent: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub messages_received: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub bytes_sent: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub bytes_received: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub failed_operations: u64,
    pub syscall_latency: HistogramStats,
    pub uptime_secs: u64,
}

impl MetricsSnapshot {
    /// Messages sent but not yet received or discarded
    pub fn messages_in_flight(&self) -> u64 {
        self.messages_sent.saturating_sub(self.messages_received)
    }
}
