//! Synchronous order submission and price-time priority matching.
//!
//! Every public operation acquires the engine's single `Mutex` for its
//! whole duration and returns only once matching has fully settled. This
//! coarse-grained concurrency model trades away finer-grained lock-free
//! structures for a simpler invariant: a submission can never interleave
//! with another mutation of the same book.

use crate::config::EngineConfig;
use crate::engine::bbo::{BboManager, BboObserver, BboSnapshot};
use crate::engine::book::{BookView, OrderBook};
use crate::engine::error::EngineError;
use crate::engine::journal::TradeJournal;
use crate::engine::types::{Order, OrderId, OrderType, Side, Status, Symbol, Trade, TradeId};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// A callback invoked synchronously for every trade the engine executes,
/// alongside the id of the taker order whose submission produced it.
pub type TradeCallback = Box<dyn Fn(&Trade, OrderId) + Send + Sync>;

/// Running counters across the engine's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub orders_processed: u64,
    pub orders_filled: u64,
    pub orders_partial: u64,
    pub orders_cancelled: u64,
    pub trades_executed: u64,
    pub total_volume: Decimal,
}

/// The outcome of a single [`Engine::submit`] call.
#[derive(Debug, Clone)]
pub struct OrderResult {
    pub order_id: OrderId,
    pub status: Status,
    pub filled_quantity: Decimal,
    pub remaining_quantity: Decimal,
    pub trades: Vec<Trade>,
    pub message: String,
}

impl OrderResult {
    #[must_use]
    pub fn is_successful(&self) -> bool {
        !matches!(self.status, Status::Rejected)
    }
}

struct EngineState {
    books: HashMap<Symbol, OrderBook>,
    orders: HashMap<OrderId, Order>,
    bbo: BboManager,
    journal: TradeJournal,
    trade_callbacks: HashMap<u64, TradeCallback>,
    next_callback_id: u64,
    statistics: Statistics,
}

impl EngineState {
    fn new(config: &EngineConfig) -> Self {
        Self {
            books: HashMap::new(),
            orders: HashMap::new(),
            bbo: BboManager::new(),
            journal: TradeJournal::new(config.journal_capacity),
            trade_callbacks: HashMap::new(),
            next_callback_id: 0,
            statistics: Statistics::default(),
        }
    }

    fn book_mut(&mut self, symbol: &Symbol) -> &mut OrderBook {
        self.books.entry(symbol.clone()).or_default()
    }

    fn refresh_bbo(&mut self, symbol: &Symbol) {
        let (best_bid, best_ask) = self
            .books
            .get(symbol)
            .map_or((None, None), |book| (book.best_bid(), book.best_ask()));
        self.bbo.update(symbol, best_bid, best_ask);
    }

    fn emit_trade(&mut self, trade: Trade, taker_order_id: OrderId) {
        for callback in self.trade_callbacks.values() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                callback(&trade, taker_order_id);
            }));
            if result.is_err() {
                warn!(trade_id = %trade.id, "trade callback panicked; isolating and continuing");
            }
        }
        self.statistics.trades_executed += 1;
        self.statistics.total_volume += trade.quantity;
        self.journal.record(trade);
    }
}

/// The in-memory matching engine for all symbols it has seen an order for.
///
/// Books are created lazily per symbol on first submission. All state
/// lives behind a single lock; there is no sharding by symbol, trading
/// lock contention for simplicity and straightforward invariants.
pub struct Engine {
    config: EngineConfig,
    state: Mutex<EngineState>,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: Mutex::new(EngineState::new(&config)),
            config,
        }
    }

    /// Evict terminated (Filled/Cancelled/Rejected) registry entries whose
    /// submission timestamp predates `now_micros` by more than the
    /// configured retention window. A no-op when
    /// `registry_retention_micros` is `None` (the default: retain
    /// forever, matching the original implementation).
    pub fn evict_older_than(&self, now_micros: u64) {
        let Some(retention) = self.config.registry_retention_micros else {
            return;
        };
        let mut state = self.state.lock();
        state.orders.retain(|_, order| {
            let terminal = matches!(
                order.status(),
                Status::Filled | Status::Cancelled | Status::Rejected
            );
            !(terminal && now_micros.saturating_sub(order.timestamp) > retention)
        });
    }

    /// Register a callback invoked for every executed trade. Returns a
    /// handle usable with [`Engine::unregister_trade_callback`].
    pub fn register_trade_callback(&self, callback: TradeCallback) -> u64 {
        let mut state = self.state.lock();
        let id = state.next_callback_id;
        state.next_callback_id += 1;
        state.trade_callbacks.insert(id, callback);
        id
    }

    pub fn unregister_trade_callback(&self, id: u64) {
        self.state.lock().trade_callbacks.remove(&id);
    }

    pub fn register_bbo_observer(&self, observer: BboObserver) {
        self.state.lock().bbo.register_observer(observer);
    }

    #[must_use]
    pub fn bbo(&self, symbol: &Symbol) -> Option<BboSnapshot> {
        self.state.lock().bbo.current(symbol).cloned()
    }

    #[must_use]
    pub fn statistics(&self) -> Statistics {
        self.state.lock().statistics
    }

    #[must_use]
    pub fn order_status(&self, order_id: OrderId) -> Option<Order> {
        self.state.lock().orders.get(&order_id).cloned()
    }

    #[must_use]
    pub fn book_view(&self, symbol: &Symbol, depth: usize) -> BookView {
        self.state
            .lock()
            .books
            .get(symbol)
            .map_or_else(BookView::default, |book| book.depth(depth))
    }

    /// Submit a new order for matching. Returns the immediate result of
    /// matching it against the resting book; unmatched remainder is
    /// either left resting (Limit) or discarded (Market, IOC, FOK) per
    /// each order type's semantics.
    ///
    /// # Errors
    /// Returns [`EngineError::DuplicateOrder`] if `order.id` has already
    /// been submitted.
    #[instrument(skip(self, order), fields(order_id = %order.id, symbol = %order.symbol))]
    pub fn submit(&self, mut order: Order) -> Result<OrderResult, EngineError> {
        order.validate()?;
        let mut state = self.state.lock();

        if state.orders.contains_key(&order.id) {
            return Err(EngineError::DuplicateOrder(order.id));
        }

        state.statistics.orders_processed += 1;
        let symbol = order.symbol.clone();
        let mut killed = false;

        let trades = match order.order_type {
            OrderType::Market | OrderType::Ioc | OrderType::Limit => {
                Self::match_taker(&mut state, &mut order, &symbol)
            }
            OrderType::Fok => {
                if Self::can_fill_fok(&mut state, &order, &symbol) {
                    Self::match_taker(&mut state, &mut order, &symbol)
                } else {
                    killed = true;
                    Vec::new()
                }
            }
        };

        if killed {
            order.set_status(Status::Cancelled);
        } else if order.order_type.can_rest() && !order.is_fully_filled() {
            state.book_mut(&symbol).add_resting(order.clone());
        } else if !order.is_fully_filled() {
            // Market/IOC remainder never rests: it is implicitly cancelled.
            order.set_status(if order.filled() > Decimal::ZERO {
                Status::Partial
            } else {
                Status::Cancelled
            });
        }

        if order.is_fully_filled() {
            state.statistics.orders_filled += 1;
        } else if order.status() == Status::Partial {
            state.statistics.orders_partial += 1;
        } else if order.status() == Status::Cancelled {
            state.statistics.orders_cancelled += 1;
        }

        state.refresh_bbo(&symbol);

        let message = Self::describe(&order, &trades);
        debug!(status = ?order.status(), fills = trades.len(), "order submitted");
        state.orders.insert(order.id, order.clone());

        Ok(OrderResult {
            order_id: order.id,
            status: order.status(),
            filled_quantity: order.filled(),
            remaining_quantity: order.remaining(),
            trades,
            message,
        })
    }

    /// Cancel a resting order. No-op failure if the order isn't currently
    /// resting (already filled, cancelled, rejected, or unknown).
    ///
    /// # Errors
    /// Returns [`EngineError::OrderNotFound`] if no such order was ever
    /// submitted, or [`EngineError::NotCancellable`] if it exists but
    /// isn't currently resting on a book.
    #[instrument(skip(self))]
    pub fn cancel(&self, order_id: OrderId) -> Result<Order, EngineError> {
        let mut state = self.state.lock();
        let Some(tracked) = state.orders.get(&order_id).cloned() else {
            return Err(EngineError::OrderNotFound(order_id));
        };

        let symbol = tracked.symbol.clone();
        let Some(mut removed) = state.book_mut(&symbol).remove(order_id) else {
            return Err(EngineError::NotCancellable(order_id));
        };

        removed.set_status(Status::Cancelled);
        state.statistics.orders_cancelled += 1;
        state.orders.insert(order_id, removed.clone());
        state.refresh_bbo(&symbol);
        info!(order_id = %order_id, "order cancelled");
        Ok(removed)
    }

    /// Sum of resting opposite-side volume this taker could legally
    /// cross at, without mutating the book. The FOK feasibility check.
    fn can_fill_fok(state: &mut EngineState, taker: &Order, symbol: &Symbol) -> bool {
        let Some(book) = state.books.get(symbol) else {
            return false;
        };
        let opposite = taker.side.opposite();
        let view = book.depth(usize::MAX);
        let levels = match opposite {
            Side::Buy => &view.bids,
            Side::Sell => &view.asks,
        };
        let mut available = Decimal::ZERO;
        for (price, volume) in levels {
            let crosses = match taker.side {
                Side::Buy => *price <= taker.price.unwrap_or(Decimal::MAX),
                Side::Sell => *price >= taker.price.unwrap_or(Decimal::ZERO),
            };
            if !crosses {
                break;
            }
            available += *volume;
            if available >= taker.remaining() {
                return true;
            }
        }
        false
    }

    /// Walk the opposite side of the book from best price outward,
    /// executing trades at each maker's resting price (price improvement
    /// for the taker) until the taker is filled, it is no longer
    /// marketable against the remaining touch, or the book is exhausted.
    /// Best-price-first traversal is what prevents trade-throughs: a
    /// taker can never execute against a worse price while a better one
    /// remains available.
    fn match_taker(state: &mut EngineState, taker: &mut Order, symbol: &Symbol) -> Vec<Trade> {
        let mut trades = Vec::new();
        let opposite_side = taker.side.opposite();

        loop {
            if taker.is_fully_filled() {
                break;
            }

            let book = state.book_mut(symbol);
            let (best_bid, best_ask) = (book.best_bid(), book.best_ask());
            if !taker.is_marketable(best_bid, best_ask) {
                break;
            }

            let Some(level) = book.best_level_mut(opposite_side) else {
                break;
            };
            let level_price = level.price();
            let Some(maker) = level.front_mut() else {
                break;
            };

            let fill_quantity = taker.remaining().min(maker.remaining());
            maker.apply_fill(fill_quantity).expect("fill bounded by maker.remaining()");
            taker.apply_fill(fill_quantity).expect("fill bounded by taker.remaining()");
            let maker_id = maker.id;
            let maker_fully_filled = maker.is_fully_filled();

            book.note_fill(opposite_side, level_price, fill_quantity);

            let trade = Trade::new(
                TradeId::new(),
                symbol.clone(),
                level_price,
                fill_quantity,
                taker.timestamp,
                taker.side,
                maker_id,
                taker.id,
                Decimal::ZERO,
                Decimal::ZERO,
            )
            .expect("trade fields are positive by construction");

            if maker_fully_filled {
                if let Some(popped) = book.pop_filled(opposite_side, level_price) {
                    state.orders.insert(popped.id, popped);
                }
            } else {
                // partial maker fill left resting; sync its recorded state.
                let synced = state
                    .book_mut(symbol)
                    .best_level_mut(opposite_side)
                    .and_then(|level| level.front())
                    .cloned();
                if let Some(front) = synced {
                    state.orders.insert(front.id, front);
                }
            }

            state.emit_trade(trade.clone(), taker.id);
            trades.push(trade);
        }

        trades
    }

    fn describe(order: &Order, trades: &[Trade]) -> String {
        match order.status() {
            Status::Filled => format!("order fully filled across {} trade(s)", trades.len()),
            Status::Partial => format!(
                "order partially filled ({} of {}) across {} trade(s)",
                order.filled(),
                order.quantity,
                trades.len()
            ),
            Status::Pending => "order resting on book, unmatched".to_string(),
            Status::Cancelled => "order unfilled (or fill-or-kill unsatisfiable); cancelled".to_string(),
            Status::Rejected => "order rejected during validation".to_string(),
        }
    }
}
