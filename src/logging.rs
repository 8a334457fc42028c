//! Logging setup.
//!
//! Every event names its subsystem as the tracing target (`walker`,
//! `pipeline`, `extract`, `storage`, `search`, `scan`, `cli`), so levels can
//! be tuned per subsystem from settings:
//!
//! ```toml
//! [logging]
//! default = "warn"
//!
//! [logging.modules]
//! pipeline = "info"
//! search = "debug"
//! ```
//!
//! A set `RUST_LOG` replaces the configured filter entirely:
//! ```bash
//! RUST_LOG=extract=trace,storage=debug folio build-index -d ./books
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LoggingConfig;

static INIT: Once = Once::new();

/// Wall-clock time as `HH:MM:SS.mmm`.
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// `default,target=level,...` with targets in sorted order.
fn filter_directives(config: &LoggingConfig) -> String {
    let mut modules: Vec<_> = config.modules.iter().collect();
    modules.sort();
    modules
        .into_iter()
        .fold(config.default.clone(), |mut directives, (target, level)| {
            directives.push_str(&format!(",{target}={level}"));
            directives
        })
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(filter_directives(config)),
    }
}

/// Install the global subscriber.
///
/// Only the first call has any effect. Output goes to stderr; stdout is
/// reserved for search results.
pub fn init_with_config(config: &LoggingConfig) {
    INIT.call_once(|| {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_timer(ClockTime)
            .with_filter(env_filter(config));

        let _ = tracing_subscriber::registry().with(layer).try_init();
    });
}

/// [`init_with_config`] with default settings.
pub fn init() {
    init_with_config(&LoggingConfig::default());
}

/// Info-level event tagged with its subsystem.
///
/// ```ignore
/// log_event!("pipeline", "document extracted", "{}", path.display());
/// ```
#[macro_export]
macro_rules! log_event {
    ($subsystem:literal, $event:expr) => {
        tracing::info!(target: $subsystem, "{}", $event)
    };
    ($subsystem:literal, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: $subsystem, "{}: {}", $event, format!($($arg)*))
    };
}

/// Debug-level counterpart of [`log_event!`].
#[macro_export]
macro_rules! debug_event {
    ($subsystem:literal, $event:expr) => {
        tracing::debug!(target: $subsystem, "{}", $event)
    };
    ($subsystem:literal, $event:expr, $($arg:tt)*) => {
        tracing::debug!(target: $subsystem, "{}: {}", $event, format!($($arg)*))
    };
}
