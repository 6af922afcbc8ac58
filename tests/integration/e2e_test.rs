//! End-to-end integration tests

use atr_sizer::config::Config;
use atr_sizer::engine::{fetch_prices, CalcError, CalculationRequest, Calculator, ErrorKind};
use atr_sizer::feed::{BinanceConfig, BinanceRestClient};
use atr_sizer::risk::{Direction, RiskInputs};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::klines_body;

fn client_for(server: &MockServer) -> Arc<BinanceRestClient> {
    Arc::new(
        BinanceRestClient::with_config(BinanceConfig {
            spot_base_url: server.uri(),
            futures_base_url: server.uri(),
            timeout: Duration::from_secs(2),
        })
        .unwrap(),
    )
}

async fn serve_klines(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.calculator.default_symbol, "BTCUSDT");
    assert_eq!(config.calculator.candle_limit, 200);
    assert!(config.validate().is_ok());
}

#[tokio::test]
async fn test_long_calculation_with_sizing() {
    let server = MockServer::start().await;
    serve_klines(&server, klines_body(200, dec!(4))).await;

    let calculator = Calculator::new(client_for(&server), &Config::default().calculator);
    let request = CalculationRequest::new("BTCUSDT", "1h", Direction::Long)
        .with_entry_price(dec!(100))
        .with_atr_period(14)
        .with_atr_multiplier(dec!(1.25))
        .with_risk(
            RiskInputs::default()
                .with_equity(dec!(1000))
                .with_risk_percent(dec!(1))
                .with_leverage(dec!(10)),
        );

    let calc = calculator.calculate(&request).await.unwrap();
    assert_eq!(calc.atr, dec!(4));
    assert_eq!(calc.stop_loss_price, dec!(95));
    assert_eq!(calc.stop_distance, dec!(5));
    assert_eq!(calc.rr_text, "1 : 1.25");
    assert_eq!(calc.bars, 200);

    let sizing = calc.sizing.unwrap();
    assert_eq!(sizing.stop_distance, dec!(5));
    assert_eq!(sizing.risk_amount, dec!(10));
    assert_eq!(sizing.notional_by_risk, dec!(200));
    assert_eq!(sizing.max_notional_by_lev, dec!(10000));
    assert_eq!(sizing.final_notional, dec!(200));
    assert_eq!(sizing.qty, dec!(2));
}

#[tokio::test]
async fn test_short_calculation_without_account() {
    let server = MockServer::start().await;
    serve_klines(&server, klines_body(50, dec!(2))).await;

    let calculator = Calculator::new(client_for(&server), &Config::default().calculator);
    let request = CalculationRequest::new("BTCUSDT", "1h", Direction::Short)
        .with_entry_price(dec!(100))
        .with_atr_period(14)
        .with_atr_multiplier(dec!(1.5));

    let calc = calculator.calculate(&request).await.unwrap();
    assert_eq!(calc.stop_loss_price, dec!(103));
    assert_eq!(calc.stop_distance, dec!(3));
    assert!(calc.sizing.is_none());
}

#[tokio::test]
async fn test_insufficient_bars() {
    let server = MockServer::start().await;
    serve_klines(&server, klines_body(10, dec!(2))).await;

    let calculator = Calculator::new(client_for(&server), &Config::default().calculator);
    let request = CalculationRequest::new("BTCUSDT", "1h", Direction::Long)
        .with_entry_price(dec!(100))
        .with_atr_period(14)
        .with_atr_multiplier(dec!(1.5));

    let err = calculator.calculate(&request).await.unwrap_err();
    assert_eq!(err, CalcError::InsufficientData { bars: 10, required: 15 });
}

#[tokio::test]
async fn test_provider_error_is_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let calculator = Calculator::new(client_for(&server), &Config::default().calculator);
    let request = CalculationRequest::new("BTCUSDT", "1h", Direction::Long)
        .with_entry_price(dec!(100))
        .with_atr_period(14)
        .with_atr_multiplier(dec!(1.5));

    let err = calculator.calculate(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DataFetchFailed);
}

#[tokio::test]
async fn test_invalid_input_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let calculator = Calculator::new(client_for(&server), &Config::default().calculator);
    let request = CalculationRequest::new("BTCUSDT", "1h", Direction::Long)
        .with_entry_price(dec!(100))
        .with_atr_period(0)
        .with_atr_multiplier(dec!(1.5));

    let err = calculator.calculate(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_price_board_against_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"symbol":"BTCUSDT","price":"42000"}"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/fapi/v1/ticker/price"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = fetch_prices(client.as_ref(), "BTCUSDT").await.unwrap_err();
    assert!(err.reasons.starts_with("futures:"));
}
