//! Prometheus metrics collection for ticketd.
//!
//! Exposed on the HTTP `/metrics` endpoint.
//!
//! - `ticket_opened_total` - Tickets created
//! - `ticket_open` - Tickets not yet closed (gauge)
//! - `ticket_transitions_total{kind}` - Accepted actions by transition kind
//! - `ticket_rejections_total{action, error}` - Refused actions
//! - `ticket_action_duration_seconds{action}` - Time spent arbitrating an action
//! - `ticket_effect_failures_total{call, error}` - Failed platform calls
//! - `ticket_counter_persist_failures_total` - Sequence counter write failures

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::{Once, OnceLock};

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters
// ========================================================================

/// Tickets opened.
pub static TICKETS_OPENED: OnceLock<IntCounter> = OnceLock::new();

/// Closed tickets whose channel was removed.
pub static TICKETS_RETIRED: OnceLock<IntCounter> = OnceLock::new();

/// Sequence counter persistence failures.
pub static COUNTER_PERSIST_FAILURES: OnceLock<IntCounter> = OnceLock::new();

/// Bridge events processed by type.
pub static BRIDGE_EVENTS: OnceLock<IntCounterVec> = OnceLock::new();

// ========================================================================
// Gauges
// ========================================================================

/// Tickets that are not closed.
pub static OPEN_TICKETS: OnceLock<IntGauge> = OnceLock::new();

/// Connected bridge adapters (0 or 1).
pub static BRIDGE_CONNECTED: OnceLock<IntGauge> = OnceLock::new();

// ========================================================================
// Ticket lifecycle
// ========================================================================

pub static TRANSITIONS: OnceLock<IntCounterVec> = OnceLock::new();

pub static REJECTIONS: OnceLock<IntCounterVec> = OnceLock::new();

pub static ACTION_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

pub static EFFECT_FAILURES: OnceLock<IntCounterVec> = OnceLock::new();

static INIT: Once = Once::new();

/// Initialize the Prometheus metrics registry.
///
/// Idempotent. Recording before `init` is a no-op.
pub fn init() {
    INIT.call_once(register_all);
}

fn register_all() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            let m = $init.expect(concat!(stringify!($metric), " creation failed"));
            if let Err(e) = r.register(Box::new(m.clone())) {
                tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
            }
            let _ = $metric.set(m);
        };
    }

    register!(TICKETS_OPENED, IntCounter::new("ticket_opened_total", "Tickets opened"));
    register!(TICKETS_RETIRED, IntCounter::new("ticket_retired_total", "Closed tickets removed after the countdown"));
    register!(COUNTER_PERSIST_FAILURES, IntCounter::new("ticket_counter_persist_failures_total", "Sequence counter persistence failures"));
    register!(BRIDGE_EVENTS, IntCounterVec::new(Opts::new("ticket_bridge_events_total", "Bridge events by type"), &["event"]));
    register!(OPEN_TICKETS, IntGauge::new("ticket_open", "Tickets not yet closed"));
    register!(BRIDGE_CONNECTED, IntGauge::new("ticket_bridge_connected", "Connected bridge adapters"));

    register!(TRANSITIONS, IntCounterVec::new(Opts::new("ticket_transitions_total", "Accepted actions by transition kind"), &["kind"]));
    register!(REJECTIONS, IntCounterVec::new(Opts::new("ticket_rejections_total", "Refused actions by action and error"), &["action", "error"]));
    register!(ACTION_LATENCY, HistogramVec::new(
        HistogramOpts::new("ticket_action_duration_seconds", "Time spent arbitrating an action")
            .buckets(vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]),
        &["action"]));
    register!(EFFECT_FAILURES, IntCounterVec::new(Opts::new("ticket_effect_failures_total", "Failed platform calls by call and error"), &["call", "error"]));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

pub fn ticket_opened() {
    if let Some(m) = TICKETS_OPENED.get() {
        m.inc();
    }
    if let Some(m) = OPEN_TICKETS.get() {
        m.inc();
    }
}

pub fn ticket_closed() {
    if let Some(m) = OPEN_TICKETS.get() {
        m.dec();
    }
}

pub fn ticket_retired() {
    if let Some(m) = TICKETS_RETIRED.get() {
        m.inc();
    }
}

pub fn record_persist_failure() {
    if let Some(m) = COUNTER_PERSIST_FAILURES.get() {
        m.inc();
    }
}

pub fn record_transition(kind: &str) {
    if let Some(m) = TRANSITIONS.get() {
        m.with_label_values(&[kind]).inc();
    }
}

pub fn record_rejection(action: &str, error: &str) {
    if let Some(m) = REJECTIONS.get() {
        m.with_label_values(&[action, error]).inc();
    }
}

pub fn record_action(action: &str, duration_secs: f64) {
    if let Some(m) = ACTION_LATENCY.get() {
        m.with_label_values(&[action]).observe(duration_secs);
    }
}

pub fn record_effect_failure(call: &str, error: &str) {
    if let Some(m) = EFFECT_FAILURES.get() {
        m.with_label_values(&[call, error]).inc();
    }
}

pub fn record_bridge_event(event: &str) {
    if let Some(m) = BRIDGE_EVENTS.get() {
        m.with_label_values(&[event]).inc();
    }
}

pub fn set_bridge_connected(connected: bool) {
    if let Some(m) = BRIDGE_CONNECTED.get() {
        m.set(i64::from(connected));
    }
}
