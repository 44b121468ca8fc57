//! Telemetry helpers for applications embedding `chart-geometry`.
//!
//! Layout passes log axis ranges and fallbacks at `debug`, per-series
//! geometry at `trace`. Hosts either call one of the helpers below or wire
//! their own `tracing` subscriber.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "chart_geometry=info";

/// Initializes a compact `tracing` subscriber with [`DEFAULT_FILTER`].
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_FILTER)
}

/// Like [`init_default_tracing`] with an explicit fallback filter, e.g.
/// `"chart_geometry=trace"` to see every built series.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
