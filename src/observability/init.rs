//! Subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name recorded on every exported span.
pub const SERVICE_NAME: &str = "shelter";

const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `info`. When [`Config::trace_output`] names
/// a file, spans are exported there as OTLP JSON lines; otherwise events are
/// formatted to stderr.
///
/// Safe to call more than once. Only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use shelter::observability::init_tracing;
/// use shelter::Config;
///
/// let config = Config::default();
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL))
    });

    let otel_layer = config.trace_output().and_then(|path| {
        if let Some(parent) = path.parent() {
            // Tracing is optional; a missing directory just disables export.
            std::fs::create_dir_all(parent).ok()?;
        }
        let resource = Resource::new(vec![KeyValue::new("service.name", SERVICE_NAME)]);
        let provider = tracer::create_tracer_provider(path, resource);
        Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
    });

    let fmt_layer = otel_layer.is_none().then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(fmt_layer)
        .try_init()
    {
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
}
