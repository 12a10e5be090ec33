//! Counters and timings for suite runs.
//!
//! Recording goes through the `metrics` facade; nothing is exported unless the
//! embedding process installs a recorder.

use std::sync::Once;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};

static DESCRIBE: Once = Once::new();

pub fn describe_metrics() {
    DESCRIBE.call_once(|| {
        describe_counter!("authflow_cases_total", "Total number of suite cases run, by outcome");
        describe_histogram!(
            "authflow_case_duration_seconds",
            "Wall-clock duration of a suite case in seconds"
        );
        describe_counter!(
            "authflow_requests_total",
            "Total number of HTTP requests issued against the target"
        );
    });
}

pub fn record_case(case: &'static str, outcome: &'static str, elapsed: Duration) {
    counter!("authflow_cases_total", "case" => case, "outcome" => outcome).increment(1);
    histogram!("authflow_case_duration_seconds", "case" => case).record(elapsed.as_secs_f64());
}

pub fn record_request(method: &str, status: u16) {
    counter!(
        "authflow_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
