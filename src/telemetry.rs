//! Opt-in `tracing` setup for hosts and demos.
//!
//! The library only emits events. Script `print`/`debug` output goes to the
//! `chart_playground::script` target, so it can be filtered separately from
//! lifecycle logs, e.g. `RUST_LOG=info,chart_playground::script=off`.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,chart_playground::script=debug";

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when the `telemetry` feature is off or the host already
/// installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
