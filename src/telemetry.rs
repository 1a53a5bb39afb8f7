use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub slow_query_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        let slow = std::env::var("BOOKSHELF_SLOW_QUERY_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(500);
        Self { slow_query_ms: slow }
    }
}

#[derive(Default)]
pub struct Metrics {
    pub queries_total: AtomicU64,
    pub queries_slow_total: AtomicU64,
    pub writes_total: AtomicU64,
}

#[derive(Default)]
pub struct Telemetry {
    pub cfg: RwLock<TelemetryConfig>,
    pub metrics: Metrics,
}

pub(crate) static TELEMETRY: std::sync::LazyLock<Telemetry> =
    std::sync::LazyLock::new(Telemetry::default);

pub fn set_slow_query_ms(ms: u64) {
    TELEMETRY.cfg.write().slow_query_ms = ms;
}

pub fn log_query(collection: &str, op: &str, duration_ms: u128, returned: usize) {
    TELEMETRY.metrics.queries_total.fetch_add(1, Ordering::Relaxed);
    let threshold = TELEMETRY.cfg.read().slow_query_ms;
    let slow = match u64::try_from(duration_ms) {
        Ok(ms) => ms >= threshold,
        Err(_) => true,
    };
    if slow {
        TELEMETRY.metrics.queries_slow_total.fetch_add(1, Ordering::Relaxed);
    }
    let line = serde_json::json!({
        "collection": collection,
        "op": op,
        "duration_ms": u64::try_from(duration_ms).unwrap_or(u64::MAX),
        "returned": returned,
        "slow": slow
    })
    .to_string();
    if slow {
        log::warn!("{line}");
    } else {
        log::debug!("{line}");
    }
}

pub fn log_write(collection: &str, op: &str, affected: u64) {
    TELEMETRY.metrics.writes_total.fetch_add(1, Ordering::Relaxed);
    let line = serde_json::json!({
        "collection": collection,
        "op": op,
        "affected": affected
    })
    .to_string();
    log::debug!("{line}");
}

#[must_use]
pub fn queries_total() -> u64 {
    TELEMETRY.metrics.queries_total.load(Ordering::Relaxed)
}

#[must_use]
pub fn queries_slow_total() -> u64 {
    TELEMETRY.metrics.queries_slow_total.load(Ordering::Relaxed)
}

#[must_use]
pub fn writes_total() -> u64 {
    TELEMETRY.metrics.writes_total.load(Ordering::Relaxed)
}

#[must_use]
pub fn metrics_text() -> String {
    // Prometheus exposition, counters only; no TYPE/HELP lines.
    let m = &TELEMETRY.metrics;
    format!(
        "bookshelf_queries_total {}\n\
         bookshelf_queries_slow_total {}\n\
         bookshelf_writes_total {}\n",
        m.queries_total.load(Ordering::Relaxed),
        m.queries_slow_total.load(Ordering::Relaxed),
        m.writes_total.load(Ordering::Relaxed),
    )
}
