//! Prometheus metrics for the API server.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vnation_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vnation_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vnation_http_requests_in_flight";

    // Generation metrics
    pub const GENERATIONS_TOTAL: &str = "vnation_generations_total";
    pub const GENERATION_FALLBACKS_TOTAL: &str = "vnation_generation_fallbacks_total";
    pub const REFINEMENTS_TOTAL: &str = "vnation_refinements_total";
    pub const JOB_STORE_ERRORS_TOTAL: &str = "vnation_job_store_errors_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a finished generation by the provider that produced it.
pub fn record_generation(provider: &str, fallback: bool) {
    let labels = [("provider", provider.to_string())];
    counter!(names::GENERATIONS_TOTAL, &labels).increment(1);
    if fallback {
        counter!(names::GENERATION_FALLBACKS_TOTAL).increment(1);
    }
}

/// Record a refinement attempt.
pub fn record_refinement(outcome: &str) {
    let labels = [("outcome", outcome.to_string())];
    counter!(names::REFINEMENTS_TOTAL, &labels).increment(1);
}

/// Record a failed job store write.
pub fn record_job_store_error() {
    counter!(names::JOB_STORE_ERRORS_TOTAL).increment(1);
}

fn job_id_pattern() -> &'static regex_lite::Regex {
    static PATTERN: OnceLock<regex_lite::Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex_lite::Regex::new(r"^/status/[^/]+$").expect("static pattern compiles")
    })
}

/// Sanitize path for metrics labels (collapse job IDs and static files).
fn sanitize_path(path: &str) -> String {
    if job_id_pattern().is_match(path) {
        return "/status/:job_id".to_string();
    }
    for prefix in ["/static/", "/mockvideos/"] {
        if path.starts_with(prefix) {
            return format!("{}*", prefix);
        }
    }
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
