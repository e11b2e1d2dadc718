/*!
 * Tracing
 * Structured logging for pipeline runs using the tracing crate
 *
 * Features:
 * - Env-filtered levels (RUST_LOG)
 * - JSON-formatted logs for structured parsing
 * - Thread names on every line, so worker and generator output is attributable
 * - Timed spans around whole pipeline operations
 */

use std::time::Instant;
use tracing::{debug, span, warn, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Environment variable enabling JSON output
pub const TRACE_JSON_VAR: &str = "PIPELINES_TRACE_JSON";

/// Operations slower than this are logged at warn level on completion
const SLOW_OPERATION_MS: u128 = 5_000;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - PIPELINES_TRACE_JSON: Enable JSON output (default: false)
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(TRACE_JSON_VAR)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if installed.is_ok() {
        debug!(json = use_json, "Structured tracing initialized");
    }
}

/// Span timing one pipeline operation; records duration when dropped
pub struct PipelineSpan {
    span: tracing::Span,
    start: Instant,
    operation: &'static str,
}

impl PipelineSpan {
    pub fn new(operation: &'static str) -> Self {
        let span = span!(
            Level::INFO,
            "pipeline",
            operation = operation,
            duration_ms = tracing::field::Empty,
            items_processed = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            operation,
        }
    }

    /// Record items processed count
    pub fn record_items_processed(&self, count: usize) {
        self.span.record("items_processed", count);
    }

    /// Enter the span context on the current thread
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for PipelineSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self.span.record("duration_ms", duration.as_millis() as u64);

        if duration.as_millis() > SLOW_OPERATION_MS {
            let _entered = self.span.enter();
            warn!(
                operation = self.operation,
                duration_ms = duration.as_millis() as u64,
                "Slow pipeline operation"
            );
        }
    }
}
