//! Opt-in tracing setup for hosts embedding `returns-chart`.
//!
//! Hosts that already configure `tracing` can ignore this module; engine
//! events are emitted under the `returns_chart` target either way.

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "returns_chart=info";

/// Installs a compact `tracing` subscriber when the `telemetry` feature is
/// enabled.
///
/// Returns `false` when the feature is disabled or a global subscriber was
/// already installed by the host.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
