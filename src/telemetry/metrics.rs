//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Klines request
    CandleFetch,
    /// Spot ticker request
    SpotPrice,
    /// Futures ticker request
    FuturesPrice,
}

impl LatencyMetric {
    fn name(&self) -> &'static str {
        match self {
            LatencyMetric::CandleFetch => "atr_sizer_candle_fetch_latency_ms",
            LatencyMetric::SpotPrice => "atr_sizer_spot_price_latency_ms",
            LatencyMetric::FuturesPrice => "atr_sizer_futures_price_latency_ms",
        }
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = metric.name();
    tracing::debug!(
        metric = metric_name,
        value_ms = duration.as_millis() as u64,
        "Recording latency"
    );
    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
}

/// Count a finished calculation by outcome kind
pub fn record_calculation(outcome: &'static str) {
    metrics::counter!("atr_sizer_calculations_total", "outcome" => outcome).increment(1);
}

/// Set the last computed ATR
pub fn set_atr(symbol: &str, interval: &str, atr: f64) {
    metrics::gauge!(
        "atr_sizer_last_atr",
        "symbol" => symbol.to_string(),
        "interval" => interval.to_string()
    )
    .set(atr);
}
