//! `OpenTelemetry` export for the suggestion engine.
//!
//! Only compiled with the `metrics` Cargo feature. [`init_metrics`] sets up
//! OTLP export of traces and metrics; [`SuggestionMetrics`] holds the remote
//! client's counters.

use opentelemetry::global;
use opentelemetry::metrics::Counter;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to build OTLP exporter: {0}")]
    Exporter(#[from] opentelemetry_otlp::ExporterBuildError),

    #[error("failed to flush telemetry: {0}")]
    Flush(#[from] opentelemetry_sdk::error::OTelSdkError),
}

/// Keeps the OTLP span and metric pipelines running.
///
/// Dropping the guard shuts both pipelines down, exporting whatever is still
/// buffered, so it must outlive every instrumented task.
pub struct MetricsGuard {
    traces: SdkTracerProvider,
    meters: SdkMeterProvider,
}

impl MetricsGuard {
    /// Tracer for the `tracing-opentelemetry` layer.
    pub fn tracer(&self) -> SdkTracer {
        self.traces.tracer("sonar")
    }

    /// Export buffered spans and counters now.
    pub fn flush(&self) -> Result<(), MetricsError> {
        self.traces.force_flush()?;
        self.meters.force_flush()?;
        Ok(())
    }
}

impl Drop for MetricsGuard {
    fn drop(&mut self) {
        // Nothing useful can be done with an export failure at exit.
        let _ = self.traces.shutdown();
        let _ = self.meters.shutdown();
    }
}

/// Start OTLP/gRPC export of spans and counters to `endpoint`, e.g.
/// `http://localhost:4317`.
///
/// The meter provider is installed globally so [`SuggestionMetrics`] picks it
/// up; spans only reach the collector through [`MetricsGuard::tracer`].
pub fn init_metrics(endpoint: &str) -> Result<MetricsGuard, MetricsError> {
    let spans = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;
    let counters = MetricExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let traces = SdkTracerProvider::builder()
        .with_batch_exporter(spans)
        .build();
    let meters = SdkMeterProvider::builder()
        .with_periodic_exporter(counters)
        .build();
    global::set_meter_provider(meters.clone());

    Ok(MetricsGuard { traces, meters })
}

/// Counters for the remote suggestion client.
///
/// Instruments come from the global meter, so they record nothing until
/// [`init_metrics`] installs a provider.
#[derive(Debug, Clone)]
pub struct SuggestionMetrics {
    requests: Counter<u64>,
    failures: Counter<u64>,
    cache_hits: Counter<u64>,
    coalesced: Counter<u64>,
}

impl SuggestionMetrics {
    pub fn new() -> Self {
        let meter = global::meter("sonar");
        Self {
            requests: meter
                .u64_counter("sonar.suggest.remote.requests")
                .with_description("Requests sent to the completion service")
                .build(),
            failures: meter
                .u64_counter("sonar.suggest.remote.failures")
                .with_description("Requests that failed, timed out or returned garbage")
                .build(),
            cache_hits: meter
                .u64_counter("sonar.suggest.remote.cache_hits")
                .with_description("Fetches answered from the response cache")
                .build(),
            coalesced: meter
                .u64_counter("sonar.suggest.remote.coalesced")
                .with_description("Fetches that joined an in-flight request")
                .build(),
        }
    }

    pub fn request(&self) {
        self.requests.add(1, &[]);
    }

    pub fn failure(&self) {
        self.failures.add(1, &[]);
    }

    pub fn cache_hit(&self) {
        self.cache_hits.add(1, &[]);
    }

    pub fn coalesced(&self) {
        self.coalesced.add(1, &[]);
    }
}

impl Default for SuggestionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
