/*!
 * Syscall Tracing
 * Structured tracing for mailbox syscalls using the tracing crate
 *
 * Features:
 * - Trace ID per syscall for log correlation
 * - JSON or compact output selected at start-up
 * - Slow syscall warnings
 */

use crate::core::limits::SLOW_SYSCALL_THRESHOLD;
use crate::core::types::Pid;
use std::time::{Duration, Instant};
use tracing::{debug, info, span, warn, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// `RUST_LOG` selects the filter (default: info). Calling this twice is
/// harmless; the second subscriber is rejected and the first stays active.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .compact(),
            )
            .try_init()
    };

    if installed.is_ok() {
        info!(json, "Structured tracing initialized");
    }
}

/// Generate a unique trace ID for request correlation
pub fn generate_trace_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span covering one syscall from dispatch to return
pub struct SyscallSpan {
    span: Span,
    start: Instant,
    syscall: &'static str,
    trace_id: String,
}

impl SyscallSpan {
    pub fn new(syscall: &'static str, pid: Pid) -> Self {
        let trace_id = generate_trace_id();
        let span = span!(
            Level::DEBUG,
            "syscall",
            trace_id = %trace_id,
            syscall,
            pid,
            duration_us = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
            return_value = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            syscall,
            trace_id,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn syscall(&self) -> &'static str {
        self.syscall
    }

    /// Time since the syscall was dispatched
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn record_return(&self, value: i64) {
        self.span.record("return_value", value);
        self.span.record("result", "success");
    }

    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for SyscallSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_us", duration.as_micros() as u64);
        let _entered = self.span.enter();

        if duration > SLOW_SYSCALL_THRESHOLD {
            warn!(
                trace_id = %self.trace_id,
                syscall = self.syscall,
                duration_ms = duration.as_millis() as u64,
                slow = true,
                "slow syscall detected"
            );
        } else {
            debug!(
                syscall = self.syscall,
                duration_us = duration.as_micros() as u64,
                "syscall completed"
            );
        }
    }
}
