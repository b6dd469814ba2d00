//! Metrics collection for `telemu`.
//!
//! Prometheus-compatible counters, gauges and histograms describing frame
//! transmission. Recording functions are no-ops until [`init_metrics`]
//! installs a recorder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::EmulatorError;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without
/// an HTTP endpoint.
///
/// # Errors
///
/// Returns `EmulatorError::Io` if the recorder or HTTP listener
/// cannot be installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), EmulatorError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| EmulatorError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "telemu_frames_sent_total",
        "Total number of telemetry frames written"
    );
    describe_counter!("telemu_bytes_sent_total", "Bytes written to the transport");
    describe_histogram!(
        "telemu_frame_write_duration_ms",
        "Time spent writing one frame in milliseconds"
    );
    describe_counter!(
        "telemu_phase_transitions_total",
        "Total number of phases entered"
    );
    describe_gauge!("telemu_current_phase", "Currently active phase (1 = active)");
    describe_counter!(
        "telemu_errors_total",
        "Total number of errors by category"
    );
}

/// Records one written frame.
pub fn record_frame(phase: char, bytes: u64, duration: Duration) {
    counter!("telemu_frames_sent_total", "phase" => phase_label(phase)).increment(1);
    counter!("telemu_bytes_sent_total").increment(bytes);
    histogram!("telemu_frame_write_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

/// Sets the currently active phase gauge.
///
/// Zeros out the previous phase label (if any) so only one phase reads `1.0`.
pub fn set_current_phase(phase: char, previous: Option<char>) {
    if let Some(prev) = previous {
        gauge!("telemu_current_phase", "phase" => phase_label(prev)).set(0.0);
    }
    counter!("telemu_phase_transitions_total").increment(1);
    gauge!("telemu_current_phase", "phase" => phase_label(phase)).set(1.0);
}

/// Records an error by category.
pub fn record_error(category: &str) {
    counter!("telemu_errors_total", "category" => category.to_owned()).increment(1);
}

/// Renders a phase code as a Prometheus label value.
///
/// Codes are printable ASCII after validation; `@` and friends are legal in
/// label values, so the code is used as-is.
fn phase_label(code: char) -> String {
    code.to_string()
}
