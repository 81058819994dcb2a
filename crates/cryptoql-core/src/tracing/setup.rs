//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

static INIT: Once = Once::new();

/// Initialize the cryptoql logging system.
///
/// Reads `CRYPTOQL_LOG` for per-module log levels, e.g.
/// `CRYPTOQL_LOG=cryptoql_rules::compiler=debug,cryptoql_rules::taxonomy=warn`.
///
/// Falls back to `cryptoql=info` if `CRYPTOQL_LOG` is unset or invalid.
/// Logs go to stderr so rendered queries on stdout stay clean.
///
/// Idempotent. A subscriber installed elsewhere (e.g. by a test harness)
/// is left in place.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
