/*!
 * Memory Types
 * Common types for memory management and user/kernel copies
 */

use crate::core::types::{Address, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// User boundary copy result (bytes copied on success)
pub type BoundaryResult<T> = Result<T, BoundaryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    #[diagnostic(
        code(memory::out_of_memory),
        help("The kernel memory pool is exhausted. Drain mailboxes or raise MAILBOX_MEMORY_POOL.")
    )]
    OutOfMemory {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("Host allocator refused {requested} bytes")]
    #[diagnostic(
        code(memory::allocation_failed),
        help("The budget allowed the request but the host could not back it.")
    )]
    AllocationFailed { requested: usize },
}

/// Errors raised while copying across the user/kernel boundary
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum BoundaryError {
    #[error("Bad user address: 0x{address:x}")]
    #[diagnostic(
        code(boundary::fault),
        help("The pointer does not address mapped memory in the caller's address space.")
    )]
    Fault { address: Address },
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub peak_memory: Size,
    pub usage_percentage: f64,
    pub allocation_count: u64,
    pub live_allocations: u64,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        if self.usage_percentage >= 95.0 {
            MemoryPressure::Critical
        } else if self.usage_percentage >= 80.0 {
            MemoryPressure::High
        } else if self.usage_percentage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
