//! Property tests for the stop and sizing engines
//!
//! Uses proptest to verify:
//! 1. Sizing identities hold exactly for every valid input set
//! 2. Sizing declines whenever a required input is non-positive
//! 3. Stop distance is `multiplier * atr` and sits on the losing side
//! 4. ATR is absent below `period + 1` bars and non-negative otherwise

use atr_sizer::feed::Candle;
use atr_sizer::model::{compute_atr, compute_atr_with, Smoothing};
use atr_sizer::risk::{derive_stop, size_position, Direction, RiskInputs};
use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies ───────────────────────────────────────────────────────

/// Positive decimal with 2 decimal places in [0.01, max)
fn arb_positive(max: i64) -> impl Strategy<Value = Decimal> {
    (1..max * 100).prop_map(|cents| Decimal::new(cents, 2))
}

/// ATR as a quotient, as a rolling mean produces, often a repeating decimal
fn arb_quotient_atr() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000, 1i64..50).prop_map(|(n, d)| Decimal::new(n, 2) / Decimal::from(d))
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Long), Just(Direction::Short)]
}

fn arb_series(max_len: usize) -> impl Strategy<Value = Vec<Candle>> {
    prop::collection::vec((1i64..10_000, 0i64..500, 0i64..500), 0..max_len).prop_map(|bars| {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        bars.into_iter()
            .enumerate()
            .map(|(i, (close, up, down))| {
                let close = Decimal::new(close, 1);
                let high = close + Decimal::new(up, 2);
                let low = (close - Decimal::new(down, 2)).max(Decimal::new(1, 2));
                Candle::new(
                    t0 + Duration::minutes(i as i64),
                    close,
                    high,
                    low,
                    close,
                    Decimal::ONE,
                )
            })
            .collect()
    })
}

// ── Sizing ───────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sizing_identities_hold(
        equity in arb_positive(100_000),
        risk_percent in arb_positive(100),
        leverage in arb_positive(125),
        entry in arb_positive(100_000),
        stop in arb_positive(100_000),
    ) {
        prop_assume!(entry != stop);

        let inputs = RiskInputs::new(entry, stop)
            .with_equity(equity)
            .with_risk_percent(risk_percent)
            .with_leverage(leverage);
        let result = size_position(&inputs).unwrap();

        prop_assert_eq!(result.stop_distance, (entry - stop).abs());
        prop_assert_eq!(result.risk_amount, equity * risk_percent / Decimal::ONE_HUNDRED);
        prop_assert_eq!(result.max_notional_by_lev, equity * leverage);
        prop_assert_eq!(
            result.final_notional,
            result.notional_by_risk.min(result.max_notional_by_lev)
        );
        prop_assert_eq!(result.qty, result.final_notional / entry);
        prop_assert!(result.final_notional <= result.max_notional_by_lev);
        prop_assert!(result.risk_amount >= Decimal::ZERO);
        prop_assert!(result.qty >= Decimal::ZERO);
    }

    #[test]
    fn sizing_declines_on_non_positive_input(
        equity in arb_positive(100_000),
        entry in arb_positive(1_000),
        stop in arb_positive(1_000),
        bad in -1000i64..=0,
        which in 0usize..5,
    ) {
        let bad = Decimal::new(bad, 1);
        let mut values = [equity, Decimal::ONE, Decimal::TEN, entry, stop];
        values[which] = bad;

        let inputs = RiskInputs::new(values[3], values[4])
            .with_equity(values[0])
            .with_risk_percent(values[1])
            .with_leverage(values[2]);
        prop_assert!(size_position(&inputs).is_none());
    }

    #[test]
    fn sizing_declines_when_entry_equals_stop(price in arb_positive(100_000)) {
        let inputs = RiskInputs::new(price, price)
            .with_equity(Decimal::ONE_THOUSAND)
            .with_risk_percent(Decimal::ONE)
            .with_leverage(Decimal::TEN);
        prop_assert!(size_position(&inputs).is_none());
    }
}

// ── Stop placement ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn stop_distance_is_multiplier_times_atr(
        entry in arb_positive(100_000),
        atr in arb_positive(1_000),
        multiplier in arb_positive(10),
        direction in arb_direction(),
    ) {
        let stop = derive_stop(entry, direction, atr, multiplier).unwrap();

        prop_assert_eq!(stop.stop_distance, multiplier * atr);
        prop_assert!(stop.stop_distance >= Decimal::ZERO);
        match direction {
            Direction::Long => prop_assert!(stop.stop_loss_price < entry),
            Direction::Short => prop_assert!(stop.stop_loss_price > entry),
        }
    }

    #[test]
    fn stop_distance_exact_for_quotient_atr(
        entry in arb_positive(100_000),
        atr in arb_quotient_atr(),
        multiplier in arb_positive(10),
        direction in arb_direction(),
    ) {
        let stop = derive_stop(entry, direction, atr, multiplier).unwrap();
        prop_assert_eq!(stop.stop_distance, multiplier * atr);
    }
}

// ── ATR ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn atr_defined_iff_enough_bars(series in arb_series(40), period in 1usize..30) {
        let simple = compute_atr(&series, period);
        let wilder = compute_atr_with(&series, period, Smoothing::Wilder);

        if series.len() < period + 1 {
            prop_assert!(simple.is_none());
            prop_assert!(wilder.is_none());
        } else {
            prop_assert!(simple.unwrap() >= Decimal::ZERO);
            prop_assert!(wilder.unwrap() >= Decimal::ZERO);
        }
    }

    #[test]
    fn atr_grows_with_spread(series in arb_series(40), period in 1usize..20, widen in 1i64..500) {
        prop_assume!(series.len() > period);

        let wider: Vec<Candle> = series
            .iter()
            .cloned()
            .map(|mut c| {
                c.high += Decimal::new(widen, 2);
                c
            })
            .collect();

        prop_assert!(compute_atr(&wider, period).unwrap() >= compute_atr(&series, period).unwrap());
    }
}
