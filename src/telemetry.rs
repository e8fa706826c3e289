//! Opt-in tracing setup for hosts embedding `xyplot`.
//!
//! Hosts that already install a subscriber can ignore this module. Model
//! update passes log at `debug`; layout, tracker hits and per-series render
//! summaries log at `trace`.

/// Environment variable read for a filter directive before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "XYPLOT_LOG";

/// Directive used when neither environment variable is set.
pub const DEFAULT_DIRECTIVE: &str = "xyplot=info";

/// Installs a compact subscriber filtered by [`LOG_ENV_VAR`], `RUST_LOG` or
/// [`DEFAULT_DIRECTIVE`], in that order.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with(DEFAULT_DIRECTIVE)
}

/// Like [`init_default_tracing`] with a caller-chosen fallback directive.
#[must_use]
pub fn init_tracing_with(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(fallback_directive));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn disabled_feature_installs_nothing() {
        assert!(!init_default_tracing());
        assert!(!init_tracing_with("xyplot=trace"));
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn second_initialization_is_refused() {
        let _ = init_tracing_with("xyplot=warn");
        assert!(!init_default_tracing());
    }
}
