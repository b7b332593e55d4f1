//! Metrics and observability utilities
//!
//! Prometheus metrics with standardized naming for the workflow layer.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ODR Lab metrics
pub const METRICS_PREFIX: &str = "odrlab";

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Workflow metrics
    describe_counter!(
        format!("{}_submissions_total", METRICS_PREFIX),
        Unit::Count,
        "Total idea submissions received"
    );

    describe_counter!(
        format!("{}_moderation_decisions_total", METRICS_PREFIX),
        Unit::Count,
        "Total moderation decisions taken"
    );

    describe_counter!(
        format!("{}_comments_posted_total", METRICS_PREFIX),
        Unit::Count,
        "Total comments posted"
    );

    describe_counter!(
        format!("{}_likes_toggled_total", METRICS_PREFIX),
        Unit::Count,
        "Total like toggles, labelled by target and direction"
    );

    describe_counter!(
        format!("{}_meeting_tokens_issued_total", METRICS_PREFIX),
        Unit::Count,
        "Total video-room join tokens issued"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

/// Record a received idea submission
pub fn record_submission() {
    counter!(format!("{}_submissions_total", METRICS_PREFIX)).increment(1);
}

/// Record a moderation decision
pub fn record_moderation(decision: &str) {
    counter!(
        format!("{}_moderation_decisions_total", METRICS_PREFIX),
        "decision" => decision.to_string()
    )
    .increment(1);
}

/// Record a posted comment
pub fn record_comment(reply: bool) {
    counter!(
        format!("{}_comments_posted_total", METRICS_PREFIX),
        "kind" => if reply { "reply" } else { "top_level" }
    )
    .increment(1);
}

/// Record a like toggle
pub fn record_like_toggle(target: &str, liked: bool) {
    counter!(
        format!("{}_likes_toggled_total", METRICS_PREFIX),
        "target" => target.to_string(),
        "action" => if liked { "like" } else { "unlike" }
    )
    .increment(1);
}

/// Record an issued video-room join token
pub fn record_meeting_token() {
    counter!(format!("{}_meeting_tokens_issued_total", METRICS_PREFIX)).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("POST", "/submit-idea");
        std::thread::sleep(std::time::Duration::from_millis(10));
        metrics.finish(201);
        // Just verify it runs without panic
    }

    #[test]
    fn test_workflow_recorders() {
        record_submission();
        record_moderation("approve");
        record_comment(true);
        record_like_toggle("idea", true);
        record_meeting_token();
    }
}
