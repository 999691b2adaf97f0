/*!
 * Kernel Configuration Tests
 * Environment overrides feeding the mailbox manager
 */

use mailbox_kernel::core::config::{
    ENV_GATE_WARN, ENV_MEMORY_POOL, ENV_STATS_INTERVAL, ENV_TRACE_JSON,
};
use mailbox_kernel::ipc::mailbox::{MailboxError, MailboxManager, MAILBOX_RECORD_SIZE};
use mailbox_kernel::memory::MemoryManager;
use mailbox_kernel::{ConfigError, KernelConfig};
use serial_test::serial;
use std::time::Duration;

const ALL_VARS: [&str; 4] = [ENV_MEMORY_POOL, ENV_TRACE_JSON, ENV_STATS_INTERVAL, ENV_GATE_WARN];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_env() {
    clear_env();
    assert_eq!(KernelConfig::from_env().unwrap(), KernelConfig::default());
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var(ENV_MEMORY_POOL, "4096");
    std::env::set_var(ENV_TRACE_JSON, "true");
    std::env::set_var(ENV_STATS_INTERVAL, "5");
    std::env::set_var(ENV_GATE_WARN, "250");

    let config = KernelConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.memory_pool, 4096);
    assert!(config.trace_json);
    assert_eq!(config.stats_interval, Duration::from_secs(5));
    assert_eq!(config.gate_hold_warning, Duration::from_millis(250));
}

#[test]
#[serial]
fn test_malformed_env_rejected() {
    clear_env();
    std::env::set_var(ENV_MEMORY_POOL, "lots");
    let result = KernelConfig::from_env();
    clear_env();

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { ref variable, .. }) if variable == ENV_MEMORY_POOL
    ));
}

#[test]
#[serial]
fn test_pool_size_bounds_mailboxes() {
    clear_env();
    std::env::set_var(ENV_MEMORY_POOL, (3 * MAILBOX_RECORD_SIZE).to_string());
    let config = KernelConfig::from_env().unwrap();
    clear_env();

    let manager = MailboxManager::from_config(MemoryManager::with_capacity(config.memory_pool), &config);
    for id in 0..3 {
        manager.create(id).unwrap();
    }
    assert!(matches!(
        manager.create(3),
        Err(MailboxError::OutOfMemory { .. })
    ));
}
