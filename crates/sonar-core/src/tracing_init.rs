//! Shared tracing/logging initialization.
//!
//! Headless subcommands and the interactive address bar both set up
//! `tracing_subscriber` with an env-filter and optional JSON output. Headless
//! commands log to stderr so output never mixes with listings on stdout; the
//! terminal UI logs to a file so it never draws over the frame.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global tracing subscriber.
///
/// * `default_filter` -- default `RUST_LOG` value when the env-var is not set
///   (e.g. `"sonar=info"`).
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
/// * `writer` -- log sink, e.g. `std::io::stderr` or a `Mutex<File>`.
pub fn init_tracing<W>(default_filter: &str, log_json: bool, writer: W)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .init();
    }
}

/// Like [`init_tracing`], but also exports spans and metrics over OTLP when
/// `metrics_endpoint` is set.
///
/// Keep the returned guard alive for the life of the process. A pipeline that
/// fails to build is logged and skipped.
#[cfg(feature = "metrics")]
pub fn init_tracing_with_metrics<W>(
    default_filter: &str,
    log_json: bool,
    writer: W,
    metrics_endpoint: Option<&str>,
) -> Option<crate::metrics::MetricsGuard>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (guard, failure) = match metrics_endpoint.map(crate::metrics::init_metrics) {
        Some(Ok(guard)) => (Some(guard), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer),
            )
            .with(otel_layer(guard.as_ref()))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            )
            .with(otel_layer(guard.as_ref()))
            .init();
    }

    if let Some(e) = failure {
        tracing::warn!(error = %e, "OpenTelemetry pipeline disabled");
    }
    guard
}

#[cfg(feature = "metrics")]
fn otel_layer<S>(
    guard: Option<&crate::metrics::MetricsGuard>,
) -> Option<tracing_opentelemetry::OpenTelemetryLayer<S, opentelemetry_sdk::trace::SdkTracer>>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    guard.map(|g| tracing_opentelemetry::layer().with_tracer(g.tracer()))
}

/// Build the default filter string for a given log level.
///
/// Scopes the level to Sonar's own crates so dependency noise (hyper, rustls)
/// stays at `warn`.
pub fn default_filter(level: &str) -> String {
    format!("warn,sonar={level},sonar_core={level},sonar_cli={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_scopes_level_to_sonar_crates() {
        let filter = default_filter("debug");
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("sonar_core=debug"));
        assert!(filter.contains("sonar_cli=debug"));
    }
}
