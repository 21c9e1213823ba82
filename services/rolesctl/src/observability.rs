//! Tracing setup for rolesctl.
//!
//! # Notes
//! Initialization is guarded by `OnceLock` to keep startup idempotent in tests.
//! Logs go to stderr so that JSON output on stdout stays parseable.
use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static OBS_INIT: OnceLock<()> = OnceLock::new();

/// Install the fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_observability(default_filter: &str) {
    OBS_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_observability("debug");
        init_observability("not a [valid filter");
        tracing::debug!("observability initialized twice");
    }
}
