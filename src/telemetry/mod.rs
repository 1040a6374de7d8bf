//! Telemetry initialization: structured logging and dispatch metrics

use crate::config::TelemetryConfig;
use metrics::describe_counter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Counter of send attempts, labelled by `transport` and `outcome`
pub const SEND_TOTAL: &str = "mailer_send_total";

/// Install the global tracing subscriber.
///
/// Meant for binaries embedding the mailer that have no subscriber of their
/// own. Calling it twice fails, so it uses `try_init` and reports whether the
/// subscriber was installed.
pub fn init(config: &TelemetryConfig) -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mailer_core=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if config.log_format == "json" {
        // Flatten event fields so `message` is top-level in the JSON record.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true);
        registry.with(fmt_layer).try_init().is_ok()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init().is_ok()
    };

    describe_metrics();
    installed
}

/// Register metric descriptions with whichever recorder is installed.
pub fn describe_metrics() {
    describe_counter!(
        SEND_TOTAL,
        "Total number of email send attempts by transport and outcome"
    );
}

/// Record the outcome of one send attempt.
pub fn record_send(transport: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!(SEND_TOTAL, "transport" => transport, "outcome" => outcome).increment(1);
}
