//! Process-wide telemetry bootstrap.
//!
//! Installs a `tracing` subscriber with an env-filtered fmt layer and,
//! when an OTLP endpoint is configured, an OpenTelemetry export layer that
//! batches the facade's spans to the collector, keyed by API key and tagged
//! with the service name. Call [`TelemetryConfig::init`] exactly once at
//! startup; keep the returned guard and flush it on shutdown.

use std::collections::HashMap;

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{WithExportConfig, WithHttpConfig};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Header carrying the collector API key.
const API_KEY_HEADER: &str = "x-honeycomb-team";

/// Telemetry bootstrap failure.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The OTLP span exporter could not be built.
    #[error("failed to build span exporter: {0}")]
    Exporter(#[from] opentelemetry::trace::TraceError),

    /// A global subscriber was already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Span export settings for the external collector.
#[derive(Debug, Clone)]
pub struct OtlpSettings {
    /// Collector endpoint (OTLP over HTTP).
    pub endpoint: String,
    /// API key sent with every export batch.
    pub api_key: Option<SecretString>,
}

/// Top-level telemetry configuration. Start here.
pub struct TelemetryConfig {
    service_name: String,
    global_filter: EnvFilter,
    otlp: Option<OtlpSettings>,
}

impl TelemetryConfig {
    #[must_use]
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            global_filter: EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
            otlp: None,
        }
    }

    /// Override the global filter. Only deviate from the default (`RUST_LOG`
    /// or info) when necessary.
    #[must_use]
    pub fn with_global_filter(self, filter: EnvFilter) -> Self {
        Self {
            global_filter: filter,
            ..self
        }
    }

    /// Enable span export to an OTLP collector.
    #[must_use]
    pub fn with_otlp(self, otlp: OtlpSettings) -> Self {
        Self {
            otlp: Some(otlp),
            ..self
        }
    }

    /// Install the subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError`] if the exporter cannot be built or a
    /// subscriber is already installed.
    pub fn try_init(self) -> Result<TelemetryGuard, TelemetryError> {
        let (otel_layer, provider) = if let Some(otlp) = self.otlp {
            let mut headers = HashMap::new();
            if let Some(api_key) = &otlp.api_key {
                headers.insert(
                    API_KEY_HEADER.to_string(),
                    api_key.expose_secret().to_string(),
                );
            }

            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .with_endpoint(otlp.endpoint)
                .with_headers(headers)
                .build()?;

            let provider = opentelemetry_sdk::trace::TracerProvider::builder()
                .with_resource(opentelemetry_sdk::Resource::new([
                    KeyValue::new("service.name", self.service_name.clone()),
                ]))
                .with_sampler(opentelemetry_sdk::trace::Sampler::AlwaysOn)
                .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
                .build();

            let tracer = provider.tracer(self.service_name);
            (
                Some(tracing_opentelemetry::OpenTelemetryLayer::new(tracer)),
                Some(provider),
            )
        } else {
            (None, None)
        };

        tracing_subscriber::registry()
            .with(self.global_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(otel_layer)
            .try_init()?;

        Ok(TelemetryGuard { provider })
    }

    /// Install the subscriber, panicking on failure.
    ///
    /// Call once, at the beginning of the program.
    #[must_use]
    pub fn init(self) -> TelemetryGuard {
        self.try_init().expect("failed to initialize telemetry")
    }
}

/// Flushes buffered spans on shutdown.
#[must_use = "call .flush() at the end of the program or buffered spans may be lost"]
pub struct TelemetryGuard {
    provider: Option<opentelemetry_sdk::trace::TracerProvider>,
}

impl TelemetryGuard {
    /// Flush and shut down the exporter. Call at the end of the program.
    pub async fn flush(self) {
        let task = tokio::task::spawn_blocking(move || self.flush_blocking());
        let _ = task.await;
    }

    /// Blocking variant of [`Self::flush`].
    pub fn flush_blocking(mut self) {
        if let Some(provider) = self.provider.take() {
            for result in provider.force_flush() {
                if let Err(err) = result {
                    // tracing itself may be torn down; stderr is all we have
                    eprintln!("failed to flush spans: {err:?}");
                }
            }
            if let Err(err) = provider.shutdown() {
                eprintln!("failed to shut down span exporter: {err:?}");
            }
        }
    }
}
