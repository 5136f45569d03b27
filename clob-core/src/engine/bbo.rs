//! Best bid/offer tracking and change notification.
//!
//! Mirrors the observer pattern of the original implementation's BBO
//! manager: every time the touch changes, registered observers are
//! notified with the new snapshot. A failing observer is isolated; it
//! never prevents the others from running, nor does it propagate back
//! into the matching path.

use crate::engine::types::Symbol;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A point-in-time best bid/offer snapshot for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BboSnapshot {
    pub symbol: Symbol,
    pub best_bid: Option<Decimal>,
    pub best_ask: Option<Decimal>,
    pub spread: Option<Decimal>,
    pub mid_price: Option<Decimal>,
}

impl BboSnapshot {
    #[must_use]
    pub fn new(symbol: Symbol, best_bid: Option<Decimal>, best_ask: Option<Decimal>) -> Self {
        let spread = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        };
        let mid_price = match (best_bid, best_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        };
        Self {
            symbol,
            best_bid,
            best_ask,
            spread,
            mid_price,
        }
    }
}

/// A callback invoked whenever the touch changes for a symbol.
pub type BboObserver = Box<dyn Fn(&BboSnapshot) + Send + Sync>;

/// Tracks current and previous BBO per symbol and fans out change
/// notifications to registered observers.
#[derive(Default)]
pub struct BboManager {
    current: std::collections::HashMap<Symbol, BboSnapshot>,
    previous: std::collections::HashMap<Symbol, BboSnapshot>,
    observers: Vec<BboObserver>,
}

impl BboManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_observer(&mut self, observer: BboObserver) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn current(&self, symbol: &Symbol) -> Option<&BboSnapshot> {
        self.current.get(symbol)
    }

    /// Update the touch for `symbol`. If it differs from the prior
    /// snapshot, notify every observer; a panicking or erroring observer
    /// is logged and skipped rather than allowed to abort the update.
    pub fn update(&mut self, symbol: &Symbol, best_bid: Option<Decimal>, best_ask: Option<Decimal>) {
        let snapshot = BboSnapshot::new(symbol.clone(), best_bid, best_ask);
        let changed = self
            .current
            .get(symbol)
            .is_none_or(|previous| previous != &snapshot);

        if let Some(old) = self.current.insert(symbol.clone(), snapshot.clone()) {
            self.previous.insert(symbol.clone(), old);
        }

        if changed {
            self.notify(&snapshot);
        }
    }

    fn notify(&self, snapshot: &BboSnapshot) {
        for observer in &self.observers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                observer(snapshot);
            }));
            if result.is_err() {
                warn!(symbol = %snapshot.symbol, "BBO observer panicked; isolating and continuing");
            }
        }
    }
}
