//! Tracing subscriber setup and OpenTelemetry metrics.

#[cfg(feature = "metrics")]
use opentelemetry::{KeyValue, global};
#[cfg(feature = "metrics")]
use opentelemetry_otlp::{MetricExporter as OtlpExporter, WithExportConfig};
#[cfg(feature = "metrics")]
use opentelemetry_sdk::{
    Resource,
    metrics::{PeriodicReader, SdkMeterProvider},
};
#[cfg(feature = "metrics")]
use opentelemetry_stdout::MetricExporter as StdoutExporter;
use serde::{Deserialize, Serialize};
#[cfg(feature = "metrics")]
use std::sync::OnceLock;
#[cfg(feature = "metrics")]
use std::time::Duration;
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

// Handle kept for flushing at exit; the global registry only hands out meters.
#[cfg(feature = "metrics")]
static METER_PROVIDER: OnceLock<SdkMeterProvider> = OnceLock::new();

/// Log line format for the tracing subscriber.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let result = match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
    };
    result.map_err(|e| format!("Failed to install tracing subscriber: {}", e))
}

/// Initialize OpenTelemetry metrics with OTLP or stdout export.
///
/// Checks the `OTEL_EXPORTER` environment variable:
/// - `otlp` exports to `OTEL_EXPORTER_OTLP_ENDPOINT` (default `http://localhost:4318`)
/// - anything else, or unset, exports to stdout
///
/// When the `metrics` feature is disabled, this function returns `Ok(())` immediately.
#[instrument(skip_all, fields(service_name))]
pub fn init_observability(
    service_name: &'static str,
    export_interval_secs: u64,
) -> Result<(), String> {
    #[cfg(not(feature = "metrics"))]
    {
        let _ = export_interval_secs;
        info!(
            service_name = service_name,
            "Metrics feature disabled - skipping metrics initialization"
        );
        Ok(())
    }

    #[cfg(feature = "metrics")]
    {
        info!(
            service_name = service_name,
            export_interval_secs = export_interval_secs,
            "Initializing OpenTelemetry metrics"
        );

        let resource = Resource::builder_empty()
            .with_attributes([KeyValue::new("service.name", service_name)])
            .build();
        let interval = Duration::from_secs(export_interval_secs);

        let exporter_type = std::env::var("OTEL_EXPORTER").unwrap_or_else(|_| "stdout".to_string());
        info!(exporter_type = %exporter_type, "Selecting metrics exporter");

        let builder = SdkMeterProvider::builder().with_resource(resource);
        let builder = match exporter_type.as_str() {
            "otlp" => {
                let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:4318".to_string());
                let exporter = OtlpExporter::builder()
                    .with_http()
                    .with_endpoint(&endpoint)
                    .with_timeout(Duration::from_secs(10))
                    .build()
                    .map_err(|e| format!("Failed to create OTLP exporter: {}", e))?;
                debug!(endpoint = %endpoint, "OTLP metric exporter created");
                builder.with_reader(PeriodicReader::builder(exporter).with_interval(interval).build())
            }
            _ => {
                debug!("Created stdout metric exporter");
                builder.with_reader(
                    PeriodicReader::builder(StdoutExporter::default())
                        .with_interval(interval)
                        .build(),
                )
            }
        };

        let provider = builder.build();
        if METER_PROVIDER.set(provider.clone()).is_err() {
            debug!("Meter provider already initialized, keeping the first handle");
        }
        global::set_meter_provider(provider);
        info!(service_name = service_name, "Meter provider registered globally");
        Ok(())
    }
}

/// Adds one to a named relay counter, tagged with the model when known.
///
/// A no-op without the `metrics` feature.
pub fn increment_counter(name: &'static str, model: Option<&str>) {
    #[cfg(feature = "metrics")]
    {
        let counter = global::meter("prompt-relay").u64_counter(name).build();
        match model {
            Some(model) => counter.add(1, &[KeyValue::new("model", model.to_string())]),
            None => counter.add(1, &[]),
        }
    }

    #[cfg(not(feature = "metrics"))]
    {
        let _ = (name, model);
    }
}

/// Flushes pending metrics and shuts the meter provider down.
///
/// Call once before exit so the last export interval is not lost. A no-op
/// without the `metrics` feature or when metrics were never initialized.
///
/// # Errors
///
/// Returns an error if flushing or shutdown fails, including when the provider
/// was already shut down.
#[instrument]
pub fn shutdown_observability() -> Result<(), String> {
    #[cfg(feature = "metrics")]
    {
        let Some(provider) = METER_PROVIDER.get() else {
            debug!("Metrics were never initialized");
            return Ok(());
        };

        info!("Flushing and shutting down OpenTelemetry metrics provider");
        provider
            .force_flush()
            .map_err(|e| format!("Failed to flush metrics: {}", e))?;
        provider
            .shutdown()
            .map_err(|e| format!("Failed to shut down metrics provider: {}", e))?;
        debug!("Metrics shutdown complete");
        Ok(())
    }

    #[cfg(not(feature = "metrics"))]
    {
        debug!("Metrics feature disabled - nothing to shut down");
        Ok(())
    }
}
