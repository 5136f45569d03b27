use clob_core::prelude::*;

/// Build a validated limit order for test fixtures, with a distinguishable
/// submission timestamp for ordering assertions.
pub fn limit_order(side: Side, price: &str, qty: &str, ts: u64) -> Order {
    Order::new(
        OrderId::new(),
        Symbol::new("BTC-USDT").unwrap(),
        side,
        OrderType::Limit,
        qty.parse().unwrap(),
        Some(price.parse().unwrap()),
        ts,
    )
    .unwrap()
}

pub fn market_order(side: Side, qty: &str, ts: u64) -> Order {
    Order::new(
        OrderId::new(),
        Symbol::new("BTC-USDT").unwrap(),
        side,
        OrderType::Market,
        qty.parse().unwrap(),
        None,
        ts,
    )
    .unwrap()
}

pub fn ioc_order(side: Side, price: &str, qty: &str, ts: u64) -> Order {
    Order::new(
        OrderId::new(),
        Symbol::new("BTC-USDT").unwrap(),
        side,
        OrderType::Ioc,
        qty.parse().unwrap(),
        Some(price.parse().unwrap()),
        ts,
    )
    .unwrap()
}

pub fn fok_order(side: Side, price: &str, qty: &str, ts: u64) -> Order {
    Order::new(
        OrderId::new(),
        Symbol::new("BTC-USDT").unwrap(),
        side,
        OrderType::Fok,
        qty.parse().unwrap(),
        Some(price.parse().unwrap()),
        ts,
    )
    .unwrap()
}

pub fn symbol() -> Symbol {
    Symbol::new("BTC-USDT").unwrap()
}
