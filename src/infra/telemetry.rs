use tracing::{Subscriber, level_filters::LevelFilter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// sqlx logs every statement at `info`; postdesk only wants slow or failed ones.
const QUIET_TARGETS: &str = "sqlx::query=warn";

pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(logging.level, rust_log.as_deref());

    tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default())
        .with(format_layer(logging.format))
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("tracing subscriber already set: {err}")))
}

/// `RUST_LOG` wins outright when set; otherwise the configured level applies
/// everywhere except the quieted targets.
fn log_filter(level: LevelFilter, rust_log: Option<&str>) -> EnvFilter {
    let directives = match rust_log.map(str::trim).filter(|value| !value.is_empty()) {
        Some(custom) => custom.to_string(),
        None => format!("{level},{QUIET_TARGETS}"),
    };
    EnvFilter::builder().parse_lossy(directives)
}

fn format_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    }
}
