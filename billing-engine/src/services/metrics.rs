//! Metrics module for billing-engine.
//! Provides Prometheus metrics for billing computations.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_counter_vec, register_histogram_vec, register_int_counter_vec,
    CounterVec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

/// Engine operation duration histogram
pub static OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "billing_engine_operation_duration_seconds",
            "Billing engine operation duration",
            vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]
        ),
        &["operation"]
    )
    .expect("Failed to register OPERATION_DURATION")
});

/// Engine operations counter
pub static OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Error counter for alerting
pub static ERRORS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Amount billed by opening records, by plan mode
pub static INVOICED_AMOUNT_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Amount received through payment records
pub static PAYMENT_AMOUNT_TOTAL: OnceLock<CounterVec> = OnceLock::new();

/// Initialize all metrics. Safe to call more than once.
pub fn init_metrics() {
    OPERATIONS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!(
                "billing_engine_operations_total",
                "Total billing engine operations by outcome"
            ),
            &["operation", "status"]
        )
        .expect("Failed to register OPERATIONS_TOTAL")
    });

    ERRORS_TOTAL.get_or_init(|| {
        register_int_counter_vec!(
            opts!("billing_engine_errors_total", "Total errors by type for alerting"),
            &["error_type", "operation"]
        )
        .expect("Failed to register ERRORS_TOTAL")
    });

    INVOICED_AMOUNT_TOTAL.get_or_init(|| {
        register_counter_vec!(
            opts!(
                "billing_engine_invoiced_amount_total",
                "Total amount billed by opening records"
            ),
            &["plan_mode"]
        )
        .expect("Failed to register INVOICED_AMOUNT_TOTAL")
    });

    PAYMENT_AMOUNT_TOTAL.get_or_init(|| {
        register_counter_vec!(
            opts!(
                "billing_engine_payment_amount_total",
                "Total amount received through payment records"
            ),
            &["status"]
        )
        .expect("Failed to register PAYMENT_AMOUNT_TOTAL")
    });

    // Force initialization of lazy statics
    let _ = &*OPERATION_DURATION;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Record an engine operation outcome.
pub fn record_operation(operation: &str, status: &str) {
    if let Some(counter) = OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation, status]).inc();
    }
}

/// Record an error for alerting.
pub fn record_error(error_type: &str, operation: &str) {
    if let Some(counter) = ERRORS_TOTAL.get() {
        counter.with_label_values(&[error_type, operation]).inc();
    }
}

/// Record the amount billed by a newly opened cycle.
pub fn record_invoiced_amount(plan_mode: &str, amount: f64) {
    if let Some(counter) = INVOICED_AMOUNT_TOTAL.get() {
        counter.with_label_values(&[plan_mode]).inc_by(amount.abs());
    }
}

/// Record a payment amount, labelled with the status it moved the cycle to.
pub fn record_payment_amount(status: &str, amount: f64) {
    if let Some(counter) = PAYMENT_AMOUNT_TOTAL.get() {
        counter.with_label_values(&[status]).inc_by(amount.abs());
    }
}
