//! Human-readable result cards

use crate::engine::{Calculation, PriceSnapshot};
use std::fmt::Write;

/// Render a calculation as a text card, prices to 2 decimals
pub fn format_calculation(calc: &Calculation) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {}",
        calc.symbol,
        calc.interval,
        calc.direction.to_string().to_uppercase()
    );
    let _ = writeln!(
        out,
        "  ATR({}, {}):   {:.2}  ({} bars)",
        calc.atr_period, calc.smoothing, calc.atr, calc.bars
    );
    let _ = writeln!(out, "  Entry:           {:.2}", calc.entry_price);
    let _ = writeln!(out, "  Stop loss:       {:.2}", calc.stop_loss_price);
    let _ = writeln!(out, "  Stop distance:   {:.2}", calc.stop_distance);
    let _ = write!(out, "  Risk/reward:     {}", calc.rr_text);

    match &calc.sizing {
        Some(sizing) => {
            let _ = writeln!(out);
            let _ = writeln!(out, "  Risk amount:     {:.2}", sizing.risk_amount);
            let _ = writeln!(
                out,
                "  Notional:        {:.2}{}",
                sizing.final_notional,
                if sizing.is_leverage_capped() {
                    " (capped by leverage)"
                } else {
                    ""
                }
            );
            let _ = write!(out, "  Quantity:        {:.6}", sizing.qty.normalize());
        }
        None => {
            let _ = writeln!(out);
            let _ = write!(
                out,
                "  Position size:   n/a (set equity, risk percent and leverage)"
            );
        }
    }

    out
}

/// Render a price snapshot
pub fn format_prices(snapshot: &PriceSnapshot) -> String {
    format!(
        "{}\n  Spot:     {:.2}\n  Futures:  {:.2}\n  Basis:    {:.2}",
        snapshot.symbol,
        snapshot.spot,
        snapshot.futures,
        snapshot.basis()
    )
}
