/*!
 * System Limits and Constants
 *
 * Centralized location for system-wide limits and thresholds.
 */

use std::time::Duration;

// =============================================================================
// MEMORY LIMITS
// =============================================================================

/// Default kernel memory pool (64MB)
/// Budget shared by mailbox records and message buffers
pub const DEFAULT_MEMORY_POOL: usize = 64 * 1024 * 1024;

/// Usage ratio at which allocations log a high-pressure warning
pub const MEMORY_WARNING_THRESHOLD: f64 = 0.80;

/// Usage ratio at which allocations log a critical-pressure warning
pub const MEMORY_CRITICAL_THRESHOLD: f64 = 0.95;

// =============================================================================
// MAILBOX LIMITS
// =============================================================================

/// Cipher block width in bytes
pub const CIPHER_BLOCK_SIZE: usize = 4;

/// Width of one mailbox id as written by list_mailboxes
pub const MAILBOX_ID_WIDTH: usize = std::mem::size_of::<u64>();

// =============================================================================
// SYNCHRONIZATION & MONITORING
// =============================================================================

/// Gate hold time above which a critical section is reported as slow
pub const DEFAULT_GATE_HOLD_WARNING: Duration = Duration::from_millis(10);

/// Syscall duration above which a slow-syscall warning is emitted
pub const SLOW_SYSCALL_THRESHOLD: Duration = Duration::from_millis(10);

/// Interval between periodic stats reports from the daemon
pub const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(30);

// =============================================================================
// SIMULATED USER SPACE
// =============================================================================

/// Base address of the first mapping in a simulated address space
/// Keeps address 0 unmapped so null pointers always fault
pub const USER_SPACE_BASE: usize = 0x1000;

/// Unmapped gap left between consecutive simulated mappings
pub const USER_MAPPING_GUARD: usize = 0x1000;
