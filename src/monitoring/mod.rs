/*!
 * Monitoring
 * Mailbox metrics and syscall tracing
 */

mod metrics;
mod tracer;

pub use metrics::{HistogramStats, MailboxMetrics, MetricsSnapshot};
pub use tracer::{generate_trace_id, init_tracing, SyscallSpan};
