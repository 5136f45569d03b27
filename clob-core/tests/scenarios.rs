mod common;

use clob_core::prelude::*;
use common::{fok_order, ioc_order, limit_order, market_order, symbol};
use rust_decimal::Decimal;

#[test]
fn s1_limit_rests_and_is_later_hit() {
    let engine = Engine::new(EngineConfig::default());

    let rest = engine
        .submit(limit_order(Side::Sell, "50000", "1.0", 1))
        .unwrap();
    assert_eq!(rest.status, Status::Pending);
    assert!(rest.trades.is_empty());
    assert_eq!(engine.bbo(&symbol()).unwrap().best_ask, Some("50000".parse().unwrap()));

    let hit = engine.submit(market_order(Side::Buy, "1.0", 2)).unwrap();
    assert_eq!(hit.status, Status::Filled);
    assert_eq!(hit.trades.len(), 1);
    assert_eq!(hit.trades[0].price, "50000".parse().unwrap());
    assert_eq!(hit.trades[0].quantity, "1.0".parse().unwrap());
    assert_eq!(engine.bbo(&symbol()).unwrap().best_ask, None);
}

#[test]
fn s2_price_improvement_for_crossing_limit() {
    let engine = Engine::new(EngineConfig::default());
    engine
        .submit(limit_order(Side::Sell, "50000", "1.0", 1))
        .unwrap();
    let result = engine
        .submit(limit_order(Side::Buy, "51000", "1.0", 2))
        .unwrap();
    assert_eq!(result.trades[0].price, "50000".parse().unwrap());
}

#[test]
fn s3_partial_fill_across_levels_in_price_order() {
    let engine = Engine::new(EngineConfig::default());
    engine
        .submit(limit_order(Side::Sell, "50000", "2.0", 1))
        .unwrap();
    engine
        .submit(limit_order(Side::Sell, "50100", "3.0", 2))
        .unwrap();
    engine
        .submit(limit_order(Side::Sell, "50200", "5.0", 3))
        .unwrap();

    let result = engine.submit(market_order(Side::Buy, "10.0", 4)).unwrap();
    assert_eq!(result.status, Status::Filled);
    assert_eq!(result.trades.len(), 3);
    let expected: Vec<(Decimal, Decimal)> = vec![
        ("50000".parse().unwrap(), "2.0".parse().unwrap()),
        ("50100".parse().unwrap(), "3.0".parse().unwrap()),
        ("50200".parse().unwrap(), "5.0".parse().unwrap()),
    ];
    let actual: Vec<(Decimal, Decimal)> = result
        .trades
        .iter()
        .map(|t| (t.price, t.quantity))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn s4_ioc_partial_remainder_cancelled() {
    let engine = Engine::new(EngineConfig::default());
    engine
        .submit(limit_order(Side::Sell, "50000", "7.0", 1))
        .unwrap();

    let result = engine
        .submit(ioc_order(Side::Buy, "50000", "10.0", 2))
        .unwrap();
    assert_eq!(result.status, Status::Partial);
    assert_eq!(result.trades.len(), 1);
    assert_eq!(result.trades[0].quantity, "7.0".parse().unwrap());
    assert_eq!(engine.bbo(&symbol()).unwrap().best_bid, None);
}

#[test]
fn s5_fok_kill_on_insufficient_liquidity() {
    let engine = Engine::new(EngineConfig::default());
    engine
        .submit(limit_order(Side::Sell, "50000", "9.0", 1))
        .unwrap();

    let result = engine
        .submit(fok_order(Side::Buy, "50000", "10.0", 2))
        .unwrap();
    assert_eq!(result.status, Status::Cancelled);
    assert!(result.trades.is_empty());

    let view = engine.book_view(&symbol(), 10);
    assert_eq!(view.asks, vec![("50000".parse().unwrap(), "9.0".parse().unwrap())]);
}

#[test]
fn s6_fifo_within_a_level() {
    let engine = Engine::new(EngineConfig::default());
    let a = engine
        .submit(limit_order(Side::Sell, "50000", "1.0", 1))
        .unwrap();
    let b = engine
        .submit(limit_order(Side::Sell, "50000", "1.0", 2))
        .unwrap();
    let c = engine
        .submit(limit_order(Side::Sell, "50000", "1.0", 3))
        .unwrap();

    let result = engine.submit(market_order(Side::Buy, "1.5", 4)).unwrap();
    assert_eq!(result.trades.len(), 2);
    assert_eq!(result.trades[0].maker_order_id, a.order_id);
    assert_eq!(result.trades[0].quantity, "1.0".parse().unwrap());
    assert_eq!(result.trades[1].maker_order_id, b.order_id);
    assert_eq!(result.trades[1].quantity, "0.5".parse().unwrap());

    assert_eq!(
        engine.order_status(b.order_id).unwrap().remaining(),
        "0.5".parse().unwrap()
    );
    assert_eq!(
        engine.order_status(c.order_id).unwrap().remaining(),
        "1.0".parse().unwrap()
    );
}

#[test]
fn cancel_then_resubmit_same_price_is_independent() {
    let engine = Engine::new(EngineConfig::default());
    let resting = engine
        .submit(limit_order(Side::Buy, "100", "1.0", 1))
        .unwrap();
    engine.cancel(resting.order_id).unwrap();
    assert_eq!(engine.bbo(&symbol()).unwrap().best_bid, None);

    let second = engine
        .submit(limit_order(Side::Buy, "100", "1.0", 2))
        .unwrap();
    assert_eq!(second.status, Status::Pending);
    assert_eq!(engine.bbo(&symbol()).unwrap().best_bid, Some("100".parse().unwrap()));
}
