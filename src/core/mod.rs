/*!
 * Core Module
 * Fundamental kernel types, configuration, and synchronization
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod serde;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use config::{ConfigError, KernelConfig};
pub use errors::KernelError;
pub use sync::{ExclusionGate, GateGuard, GateStats};
pub use types::*;
