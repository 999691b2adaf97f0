/*!
 * Mailbox Kernel - Main Entry Point
 *
 * Hosts the mailbox facility:
 * - Budgeted kernel memory pool
 * - Mailbox registry behind the global exclusion gate
 * - Syscall executor
 * - Periodic metrics reporting until Ctrl+C
 */

use anyhow::Context;
use tracing::{info, warn};

use mailbox_kernel::{
    init_tracing, KernelConfig, MailboxManager, MemoryManager, SyscallExecutor,
};

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = KernelConfig::from_env().context("invalid kernel configuration")?;
    init_tracing(config.trace_json);

    info!("Mailbox kernel starting...");
    info!(
        config = %serde_json::to_string(&config)?,
        "Loaded configuration"
    );

    let memory_manager = MemoryManager::with_capacity(config.memory_pool);
    let mailboxes = MailboxManager::from_config(memory_manager.clone(), &config);
    let executor = SyscallExecutor::new(mailboxes.clone());

    info!("Mailbox kernel ready, press Ctrl+C to stop");

    let mut ticker = tokio::time::interval(config.stats_interval);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = executor.mailboxes().metrics().snapshot();
                let gate = executor.mailboxes().gate_stats();
                info!(
                    mailboxes = executor.mailboxes().count(),
                    memory_used = executor.mailboxes().memory_usage(),
                    pressure = %memory_manager.pressure(),
                    gate_acquisitions = gate.acquisitions,
                    gate_contended = gate.contended,
                    metrics = %serde_json::to_string(&snapshot)?,
                    "Mailbox statistics"
                );
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    warn!(error = %e, "Failed to listen for shutdown signal");
                }
                break;
            }
        }
    }

    info!("Shutdown requested");
    let destroyed = mailboxes.shutdown();
    info!(
        destroyed,
        memory_used = mailboxes.memory_usage(),
        "Mailbox kernel stopped"
    );
    Ok(())
}
