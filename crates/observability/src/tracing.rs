//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Service-specific filter override; falls back to `RUST_LOG`.
const LOG_FILTER_ENV: &str = "FORMLANE_LOG";

/// Structured log output toggle. JSON is the default; set
/// `FORMLANE_LOG_FORMAT=compact` for human-readable dev output.
const LOG_FORMAT_ENV: &str = "FORMLANE_LOG_FORMAT";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = if compact_requested() {
        builder.compact().try_init()
    } else {
        builder.json().try_init()
    };
}

fn filter_from_env() -> EnvFilter {
    if let Ok(spec) = std::env::var(LOG_FILTER_ENV) {
        return EnvFilter::new(spec);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn compact_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("compact"))
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_is_idempotent() {
        super::init();
        super::init();
    }
}
