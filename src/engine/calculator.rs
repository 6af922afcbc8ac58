//! Calculation orchestrator
//!
//! Sequences validation, the candle fetch, ATR, stop placement and sizing
//! into a single `CalculationResult`. Every call is tagged with a request id;
//! a completion that is no longer the newest issued id is discarded so the
//! latest user action always wins.

use super::types::{
    CalcError, CalcState, Calculation, CalculationRequest, CalculationResult, InputField,
    ValidatedRequest,
};
use crate::config::CalculatorConfig;
use crate::feed::{validate_series, Candle, MarketData};
use crate::model::{compute_atr_with, Smoothing};
use crate::risk::{derive_stop, rr_text, size_position, RiskError};
use crate::telemetry::{record_calculation, set_atr};
use rust_decimal::prelude::ToPrimitive;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::Instrument;

/// Run the engines over an already-fetched series
///
/// Pure: identical inputs always produce identical results.
pub fn compute(
    request: &ValidatedRequest,
    candles: &[Candle],
    smoothing: Smoothing,
) -> CalculationResult {
    validate_series(candles).map_err(|e| CalcError::DataFetchFailed(e.to_string()))?;

    let atr = compute_atr_with(candles, request.atr_period, smoothing).ok_or_else(|| {
        if candles.len() <= request.atr_period {
            CalcError::InsufficientData {
                bars: candles.len(),
                required: request.atr_period.saturating_add(1),
            }
        } else {
            CalcError::DataFetchFailed("true ranges exceed the decimal range".to_string())
        }
    })?;

    let stop = derive_stop(
        request.entry_price,
        request.direction,
        atr,
        request.atr_multiplier,
    )
    .map_err(|e| match e {
        RiskError::NonPositiveEntry(_) => CalcError::invalid(InputField::EntryPrice, e.to_string()),
        _ => CalcError::invalid(InputField::AtrMultiplier, e.to_string()),
    })?;

    let inputs = request
        .risk
        .with_prices(request.entry_price, stop.stop_loss_price);
    let sizing = size_position(&inputs);

    Ok(Calculation {
        symbol: request.symbol.clone(),
        interval: request.interval.clone(),
        direction: request.direction,
        entry_price: request.entry_price,
        atr_period: request.atr_period,
        smoothing,
        bars: candles.len(),
        atr,
        stop_loss_price: stop.stop_loss_price,
        stop_distance: stop.stop_distance,
        rr_text: rr_text(request.atr_multiplier),
        sizing,
    })
}

/// Orchestrates calculations against a market data provider
pub struct Calculator<M: MarketData> {
    market_data: Arc<M>,
    candle_limit: u32,
    smoothing: Smoothing,
    /// Last issued request id
    issued: AtomicU64,
    /// Result of the newest finished calculation
    current: RwLock<Option<CalculationResult>>,
    /// State of the newest calculation
    state: RwLock<CalcState>,
}

impl<M: MarketData> Calculator<M> {
    /// Create a calculator
    pub fn new(market_data: Arc<M>, config: &CalculatorConfig) -> Self {
        Self {
            market_data,
            candle_limit: config.candle_limit,
            smoothing: config.smoothing,
            issued: AtomicU64::new(0),
            current: RwLock::new(None),
            state: RwLock::new(CalcState::Idle),
        }
    }

    /// The market data provider
    pub fn market_data(&self) -> &Arc<M> {
        &self.market_data
    }

    /// Result of the newest calculation that completed, if any
    pub async fn current(&self) -> Option<CalculationResult> {
        self.current.read().await.clone()
    }

    /// State of the newest calculation
    pub async fn state(&self) -> CalcState {
        *self.state.read().await
    }

    fn is_latest(&self, id: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == id
    }

    async fn transition(&self, id: u64, next: CalcState) {
        if !self.is_latest(id) {
            return;
        }
        let mut state = self.state.write().await;
        // A newer request may have been issued while waiting for the lock
        if !self.is_latest(id) {
            return;
        }
        tracing::debug!(request_id = id, from = %*state, to = %next, "Calculation state");
        *state = next;
    }

    /// Run one calculation end to end
    ///
    /// Always returns exactly one result. A call overtaken by a newer one
    /// returns `CalcError::Superseded` and leaves `current()` untouched.
    pub async fn calculate(&self, request: &CalculationRequest) -> CalculationResult {
        let id = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::info_span!(
            "calculate",
            request_id = id,
            symbol = %request.symbol,
            interval = %request.interval,
            direction = %request.direction
        );

        async move {
            let result = self.run(id, request).await;
            self.finish(id, result).await
        }
        .instrument(span)
        .await
    }

    async fn run(&self, id: u64, request: &CalculationRequest) -> CalculationResult {
        self.transition(id, CalcState::Validating).await;
        let validated = request.validate()?;

        self.transition(id, CalcState::FetchingData).await;
        let candles = self
            .market_data
            .fetch_candles(&validated.symbol, &validated.interval, self.candle_limit)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Candle fetch failed");
                CalcError::DataFetchFailed(e.to_string())
            })?;

        if candles.len() < self.candle_limit as usize {
            tracing::debug!(
                bars = candles.len(),
                requested = self.candle_limit,
                "Provider returned fewer bars than requested"
            );
        }

        self.transition(id, CalcState::Computing).await;
        compute(&validated, &candles, self.smoothing)
    }

    async fn finish(&self, id: u64, result: CalculationResult) -> CalculationResult {
        {
            // Latest-id check and slot write happen under the same lock
            let mut current = self.current.write().await;
            let latest = self.issued.load(Ordering::SeqCst);
            if latest != id {
                tracing::info!(latest, "Discarding superseded calculation");
                record_calculation("superseded");
                return Err(CalcError::Superseded { id, latest });
            }
            *current = Some(result.clone());
        }

        let terminal = match &result {
            Ok(calc) => {
                tracing::info!(
                    atr = %calc.atr,
                    stop_loss = %calc.stop_loss_price,
                    sized = calc.sizing.is_some(),
                    "Calculation succeeded"
                );
                set_atr(&calc.symbol, &calc.interval, calc.atr.to_f64().unwrap_or_default());
                record_calculation("success");
                CalcState::Success
            }
            Err(e) => {
                tracing::warn!(error = %e, kind = e.kind().as_str(), "Calculation failed");
                record_calculation(e.kind().as_str());
                CalcState::Failed
            }
        };

        self.transition(id, terminal).await;
        self.transition(id, CalcState::Idle).await;
        result
    }
}
