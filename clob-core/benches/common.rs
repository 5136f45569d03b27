use clob_core::prelude::*;

pub fn limit_order(side: Side, price: u64, qty: u64, ts: u64) -> Order {
    Order::new(
        OrderId::new(),
        Symbol::new("BTC-USDT").unwrap(),
        side,
        OrderType::Limit,
        qty.into(),
        Some(price.into()),
        ts,
    )
    .unwrap()
}

pub fn market_order(side: Side, qty: u64, ts: u64) -> Order {
    Order::new(
        OrderId::new(),
        Symbol::new("BTC-USDT").unwrap(),
        side,
        OrderType::Market,
        qty.into(),
        None,
        ts,
    )
    .unwrap()
}
