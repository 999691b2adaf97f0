/*!
 * Kernel Configuration
 *
 * Runtime configuration read from the environment at start-up.
 *
 * Environment variables:
 * - MAILBOX_MEMORY_POOL: kernel memory budget in bytes (default: 64MB)
 * - KERNEL_TRACE_JSON: emit JSON logs when "1" or "true" (default: false)
 * - MAILBOX_STATS_INTERVAL_SECS: daemon stats reporting period (default: 30)
 * - MAILBOX_GATE_WARN_MS: slow critical section threshold (default: 10)
 */

use crate::core::limits::{
    DEFAULT_GATE_HOLD_WARNING, DEFAULT_MEMORY_POOL, DEFAULT_STATS_INTERVAL,
};
use crate::core::serde::duration_millis;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const ENV_MEMORY_POOL: &str = "MAILBOX_MEMORY_POOL";
pub const ENV_TRACE_JSON: &str = "KERNEL_TRACE_JSON";
pub const ENV_STATS_INTERVAL: &str = "MAILBOX_STATS_INTERVAL_SECS";
pub const ENV_GATE_WARN: &str = "MAILBOX_GATE_WARN_MS";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {variable}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment variable; numeric settings must be plain unsigned integers.")
    )]
    InvalidValue {
        variable: String,
        value: String,
        reason: String,
    },
}

/// Kernel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Total bytes available to mailbox records and message buffers
    pub memory_pool: usize,
    /// JSON log output instead of the compact human format
    pub trace_json: bool,
    #[serde(with = "duration_millis")]
    pub stats_interval: Duration,
    #[serde(with = "duration_millis")]
    pub gate_hold_warning: Duration,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            memory_pool: DEFAULT_MEMORY_POOL,
            trace_json: false,
            stats_interval: DEFAULT_STATS_INTERVAL,
            gate_hold_warning: DEFAULT_GATE_HOLD_WARNING,
        }
    }
}

impl KernelConfig {
    /// Build configuration from defaults overridden by environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MEMORY_POOL) {
            config.memory_pool = parse_size(ENV_MEMORY_POOL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TRACE_JSON) {
            config.trace_json = parse_flag(ENV_TRACE_JSON, &raw)?;
        }
        if let Some(raw) = lookup(ENV_STATS_INTERVAL) {
            let secs = parse_unsigned(ENV_STATS_INTERVAL, &raw)?;
            if secs == 0 {
                return Err(invalid(ENV_STATS_INTERVAL, &raw, "interval must be non-zero"));
            }
            config.stats_interval = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_GATE_WARN) {
            config.gate_hold_warning = Duration::from_millis(parse_unsigned(ENV_GATE_WARN, &raw)?);
        }

        Ok(config)
    }

    pub fn with_memory_pool(mut self, bytes: usize) -> Self {
        self.memory_pool = bytes;
        self
    }

    pub fn with_gate_hold_warning(mut self, threshold: Duration) -> Self {
        self.gate_hold_warning = threshold;
        self
    }
}

fn parse_unsigned(variable: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| invalid(variable, raw, &e.to_string()))
}

/// Byte counts must fit the target's address width
fn parse_size(variable: &str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|e| invalid(variable, raw, &e.to_string()))
}

fn parse_flag(variable: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid(variable, raw, "expected a boolean flag")),
    }
}

fn invalid(variable: &str, raw: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        variable: variable.to_string(),
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}
