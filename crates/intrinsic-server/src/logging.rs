//! Logging setup.
//!
//! Noisy library modules (hyper, reqwest, h2, rustls, ...) are pinned to
//! `warn` so request logs stay readable. `RUST_LOG` overrides everything.

use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, prelude::*};

/// Modules filtered to `warn` level.
pub const NOISY_MODULES: &[&str] = &[
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "rustls",
    "tokio_util",
    "html5ever",
    "selectors",
];

/// Filter directives for a base level with noise suppression.
#[must_use]
pub fn filter_directives(log_level: &str) -> String {
    NOISY_MODULES
        .iter()
        .fold(log_level.to_string(), |mut directives, module| {
            directives.push_str(&format!(",{module}=warn"));
            directives
        })
}

fn build_filter(log_level: &str) -> EnvFilter {
    // Try environment variable first (allows override)
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    EnvFilter::new(filter_directives(log_level))
}

/// Initialize the global subscriber.
///
/// `log_format` is `"json"` for structured output; anything else is the
/// human-readable format. Calling this twice is harmless.
pub fn init_logging(log_level: &str, log_format: &str) {
    let subscriber = tracing_subscriber::registry().with(build_filter(log_level));

    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(true);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        noise_filtered = NOISY_MODULES.len(),
        "logging initialized"
    );
}
