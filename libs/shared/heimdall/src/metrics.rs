//! Process-wide Prometheus metrics registry.
//!
//! A single `once_cell::sync::Lazy` registry is shared across the binary;
//! handlers and background jobs pull the metric handles they need out of
//! the statics below rather than threading a registry handle through
//! `AppState`.

use once_cell::sync::Lazy;
use prometheus::{
    exponential_buckets, Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge,
    Opts, Registry, TextEncoder,
};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// p95/p99 write-latency histogram for the heartbeat ingestion path.
/// Buckets span 1 ms to ~1 s so the 150 ms / 300 ms SLO boundaries land
/// inside a bucket rather than between two of them.
pub static HB_WRITE_LATENCY_MS: Lazy<Histogram> = Lazy::new(|| {
    let histogram = Histogram::with_opts(
        HistogramOpts::new(
            "hb_write_latency_ms",
            "Heartbeat write latency in milliseconds",
        )
        .buckets(exponential_buckets(1.0, 2.0, 11).expect("static bucket spec")),
    )
    .expect("metric registration");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("metric registration");
    histogram
});

pub static DB_POOL_IN_USE: Lazy<IntGauge> = Lazy::new(|| {
    let gauge = IntGauge::with_opts(Opts::new(
        "db_pool_in_use",
        "Connections currently checked out of the database pool",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("metric registration");
    gauge
});

pub static DB_POOL_UTILIZATION_PCT: Lazy<IntGauge> = Lazy::new(|| {
    let gauge = IntGauge::with_opts(Opts::new(
        "db_pool_utilization_pct",
        "Database pool utilization as an integer percentage",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("metric registration");
    gauge
});

pub static ALERT_DEDUPE_HIT: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::with_opts(Opts::new(
        "alert_dedupe_hit_total",
        "Alert raises suppressed by an active per-device cooldown",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

pub static ALERT_RATE_LIMITED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::with_opts(Opts::new(
        "alert_rate_limited_total",
        "Alert notifications dropped by the global per-minute rate cap",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

pub static WS_DROPPED_MESSAGES: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::with_opts(Opts::new(
        "ws_dropped_messages_total",
        "Admin websocket events dropped because a subscriber fell behind",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

pub static DISPATCH_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new(
            "dispatch_results_total",
            "Command dispatch outcomes by result",
        ),
        &["result"],
    )
    .expect("metric registration");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

pub static HEARTBEATS_ACCEPTED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::with_opts(Opts::new(
        "heartbeats_accepted_total",
        "Heartbeats that passed auth and schema validation",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

pub static HEARTBEATS_DEDUPED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::with_opts(Opts::new(
        "heartbeats_deduped_total",
        "Heartbeats absorbed by the dedupe-bucket unique constraint",
    ))
    .expect("metric registration");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric registration");
    counter
});

/// Forces every lazy metric to register with `REGISTRY` before the first
/// scrape. Call once at startup; `/metrics` works without it too, since
/// each static registers on first touch, but a cold first scrape would
/// otherwise omit metrics nothing has incremented yet.
pub fn register_all() {
    Lazy::force(&HB_WRITE_LATENCY_MS);
    Lazy::force(&DB_POOL_IN_USE);
    Lazy::force(&DB_POOL_UTILIZATION_PCT);
    Lazy::force(&ALERT_DEDUPE_HIT);
    Lazy::force(&ALERT_RATE_LIMITED);
    Lazy::force(&WS_DROPPED_MESSAGES);
    Lazy::force(&DISPATCH_RESULTS);
    Lazy::force(&HEARTBEATS_ACCEPTED);
    Lazy::force(&HEARTBEATS_DEDUPED);
}

/// Renders the registry in Prometheus text exposition format for the
/// `/metrics` handler.
pub fn render() -> Result<String, prometheus::Error> {
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).expect("prometheus output is valid utf8"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_registered_metric_names() {
        register_all();
        HEARTBEATS_ACCEPTED.inc();
        let output = render().unwrap();
        assert!(output.contains("hb_write_latency_ms"));
        assert!(output.contains("db_pool_in_use"));
        assert!(output.contains("heartbeats_accepted_total"));
    }
}
