//! Logger metrics exported through the `metrics` facade.
//!
//! Every function takes the sink name as a label so several loggers in one
//! process stay distinguishable.

use metrics::{counter, gauge, histogram};

/// Record one line written to a sink
pub fn record_line_written(sink_name: &str, bytes: usize) {
    counter!("alog_lines_written_total", "sink" => sink_name.to_string()).increment(1);
    counter!("alog_bytes_written_total", "sink" => sink_name.to_string()).increment(bytes as u64);
}

/// Record a failed sink write, `path` is "async" or "direct"
pub fn record_write_failure(sink_name: &str, path: &'static str) {
    counter!(
        "alog_write_failures_total",
        "sink" => sink_name.to_string(),
        "path" => path
    )
    .increment(1);
}

/// Record time spent holding the sink (format + write)
pub fn record_write_latency_ms(sink_name: &str, latency_ms: f64) {
    histogram!("alog_write_latency_ms", "sink" => sink_name.to_string()).record(latency_ms);
}

/// Record an error that could not be queued on the error channel
pub fn record_error_dropped(sink_name: &str) {
    counter!("alog_errors_dropped_total", "sink" => sink_name.to_string()).increment(1);
}

/// Record the number of write tasks currently spawned and not yet finished
pub fn record_writes_in_flight(sink_name: &str, in_flight: usize) {
    gauge!("alog_writes_in_flight", "sink" => sink_name.to_string()).set(in_flight as f64);
}

/// Record a message accepted by the dispatch loop
pub fn record_message_dispatched(sink_name: &str) {
    counter!("alog_messages_dispatched_total", "sink" => sink_name.to_string()).increment(1);
}
