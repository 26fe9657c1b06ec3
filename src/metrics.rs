//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("clipnest_http_requests_total", "Total number of HTTP requests"),
        &["method", "endpoint", "status"]
    ).expect("metric can be created");
    pub static ref HTTP_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "clipnest_http_request_duration_seconds",
            "HTTP request duration in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["method", "endpoint"]
    ).expect("metric can be created");

    // Interaction Metrics
    pub static ref INTERACTIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("clipnest_interactions_total", "Total number of user interactions"),
        &["kind"]
    ).expect("metric can be created");
    pub static ref NOTIFICATIONS_DISPATCHED_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("clipnest_notifications_dispatched_total", "Total number of notification dispatch attempts"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("clipnest_errors_total", "Total number of errors"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("HTTP_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("HTTP_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(INTERACTIONS_TOTAL.clone()))
        .expect("INTERACTIONS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(NOTIFICATIONS_DISPATCHED_TOTAL.clone()))
        .expect("NOTIFICATIONS_DISPATCHED_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}
