//! Bounded in-memory trade history.

use crate::engine::types::Trade;
use std::collections::VecDeque;

/// A fixed-capacity ring buffer of the most recent trades. Once full, the
/// oldest trade is evicted to make room for the newest. A recent-activity
/// window, not a durable trade log.
pub struct TradeJournal {
    capacity: usize,
    trades: VecDeque<Trade>,
}

impl TradeJournal {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            trades: VecDeque::with_capacity(capacity.min(1024)),
        }
    }

    pub fn record(&mut self, trade: Trade) {
        if self.trades.len() == self.capacity {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Most recent `n` trades, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Trade> {
        self.trades.iter().rev().take(n)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{OrderId, Side, Symbol, TradeId};
    use rust_decimal::Decimal;

    fn trade(price: &str) -> Trade {
        Trade::new(
            TradeId::new(),
            Symbol::new("BTC-USDT").unwrap(),
            price.parse().unwrap(),
            Decimal::ONE,
            1,
            Side::Buy,
            OrderId::new(),
            OrderId::new(),
            Decimal::ZERO,
            Decimal::ZERO,
        )
        .unwrap()
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut journal = TradeJournal::new(2);
        journal.record(trade("1"));
        journal.record(trade("2"));
        journal.record(trade("3"));
        let prices: Vec<Decimal> = journal.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec!["2".parse().unwrap(), "3".parse().unwrap()]);
    }

    #[test]
    fn recent_returns_newest_first() {
        let mut journal = TradeJournal::new(10);
        journal.record(trade("1"));
        journal.record(trade("2"));
        let recent: Vec<Decimal> = journal.recent(2).map(|t| t.price).collect();
        assert_eq!(recent, vec!["2".parse().unwrap(), "1".parse().unwrap()]);
    }

    #[test]
    fn empty_journal_reports_empty() {
        let journal = TradeJournal::new(10);
        assert!(journal.is_empty());
    }
}
