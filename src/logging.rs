//! Logging setup for `td`.
//!
//! Diagnostics always go to stderr so stdout stays clean for `--json`.
//! `RUST_LOG` wins over the verbosity flags when it is set.

use std::io;
use std::sync::Once;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Log line encoding on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

/// Default filter directive for a verbosity level.
#[must_use]
pub const fn level_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "ticketdesk=info,ticketdesk_lib=info,warn",
        2 => "ticketdesk=debug,ticketdesk_lib=debug,info",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    format: Option<LogFormat>,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(verbose, quiet)));

    let registry = tracing_subscriber::registry().with(filter);
    match format.unwrap_or_default() {
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(verbose > 1)
                    .without_time()
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            )
            .try_init(),
    }
}

static TEST_LOGGING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_test_logging() {
    TEST_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_overrides_verbose() {
        assert_eq!(level_directive(3, true), "error");
        assert_eq!(level_directive(0, false), "warn");
        assert!(level_directive(2, false).contains("ticketdesk_lib=debug"));
    }

    #[test]
    fn test_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("still fine");
    }
}
