use crate::engine::error::OrderValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an order, stable for the engine's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// Generate a fresh, random order id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(pub Uuid);

impl TradeId {
    /// Generate a fresh, random trade id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TradeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A trading pair symbol, normalized to uppercase. The engine treats it as
/// an opaque key once it passes non-empty validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize `value` to uppercase and validate it is non-empty.
    pub fn new(value: impl Into<String>) -> Result<Self, OrderValidationError> {
        let normalized = value.into().trim().to_uppercase();
        if normalized.is_empty() {
            return Err(OrderValidationError::EmptySymbol);
        }
        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Side indicates the direction of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side of the book this order draws liquidity from when matching.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// OrderType determines how the order is matched and whether it may rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Executes immediately at best available prices; never rests.
    Market,
    /// Executes at its price or better; unfilled remainder rests.
    Limit,
    /// Immediate-Or-Cancel: matches what it can, cancels the rest.
    Ioc,
    /// Fill-Or-Kill: fills the whole requested quantity atomically or not at all.
    Fok,
}

impl OrderType {
    /// Limit, IOC, and FOK all require a price; Market doesn't.
    #[must_use]
    pub fn requires_price(self) -> bool {
        !matches!(self, OrderType::Market)
    }

    /// Only Limit orders rest on the book; the rest are fully transient.
    #[must_use]
    pub fn can_rest(self) -> bool {
        matches!(self, OrderType::Limit)
    }
}

/// Status reflects an order's position in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Pending,
    Partial,
    Filled,
    Cancelled,
    Rejected,
}

/// A mutable order for the lifetime of its submission.
///
/// `symbol`, `side`, `order_type`, `quantity`, `price`, and `timestamp` are
/// immutable after construction; `filled` and `status` evolve as the
/// engine applies fills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub symbol: Symbol,
    pub side: Side,
    pub order_type: OrderType,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub timestamp: u64,
    filled: Decimal,
    status: Status,
}

impl Order {
    /// Construct and validate a new order. `timestamp` is microseconds
    /// since the epoch, supplied by the caller so the engine stays free of
    /// wall-clock reads in its hot path.
    pub fn new(
        id: OrderId,
        symbol: Symbol,
        side: Side,
        order_type: OrderType,
        quantity: Decimal,
        price: Option<Decimal>,
        timestamp: u64,
    ) -> Result<Self, OrderValidationError> {
        let order = Self {
            id,
            symbol,
            side,
            order_type,
            quantity,
            price,
            timestamp,
            filled: Decimal::ZERO,
            status: Status::Pending,
        };
        order.validate()?;
        Ok(order)
    }

    /// Re-run construction-time validation.
    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.quantity <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositiveQuantity(self.quantity));
        }
        if self.filled < Decimal::ZERO {
            return Err(OrderValidationError::NegativeFilled(self.filled));
        }
        if self.filled > self.quantity {
            return Err(OrderValidationError::FilledExceedsTotal {
                filled: self.filled,
                total: self.quantity,
            });
        }
        if self.order_type.requires_price() {
            match self.price {
                None => return Err(OrderValidationError::MissingPrice),
                Some(p) if p <= Decimal::ZERO => {
                    return Err(OrderValidationError::NonPositivePrice(p));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn filled(&self) -> Decimal {
        self.filled
    }

    #[must_use]
    pub fn remaining(&self) -> Decimal {
        self.quantity - self.filled
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn is_fully_filled(&self) -> bool {
        self.remaining() == Decimal::ZERO
    }

    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == Side::Buy
    }

    /// Apply a fill of `quantity`, updating `filled`/`status`.
    ///
    /// # Errors
    /// Returns [`OrderValidationError::InvalidFill`] if `quantity` is not
    /// in `(0, remaining]`, an internal invariant violation that should
    /// be unreachable from correctly-written matching code.
    pub fn apply_fill(&mut self, quantity: Decimal) -> Result<(), OrderValidationError> {
        if quantity <= Decimal::ZERO || quantity > self.remaining() {
            return Err(OrderValidationError::InvalidFill {
                attempted: quantity,
                remaining: self.remaining(),
            });
        }
        self.filled += quantity;
        self.status = if self.remaining() == Decimal::ZERO {
            Status::Filled
        } else {
            Status::Partial
        };
        Ok(())
    }

    pub(crate) fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Whether this order, against the given touch, would cross and can
    /// execute immediately.
    #[must_use]
    pub fn is_marketable(&self, best_bid: Option<Decimal>, best_ask: Option<Decimal>) -> bool {
        if self.order_type == OrderType::Market {
            return true;
        }
        let Some(price) = self.price else {
            return false;
        };
        match self.side {
            Side::Buy => best_ask.is_some_and(|ask| price >= ask),
            Side::Sell => best_bid.is_some_and(|bid| price <= bid),
        }
    }
}

/// An immutable execution record. Once emitted, never modified or retracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub symbol: Symbol,
    pub price: Decimal,
    pub quantity: Decimal,
    pub timestamp: u64,
    pub aggressor_side: Side,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_fee: Decimal,
    pub taker_fee: Decimal,
}

impl Trade {
    /// Construct and validate a new trade.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TradeId,
        symbol: Symbol,
        price: Decimal,
        quantity: Decimal,
        timestamp: u64,
        aggressor_side: Side,
        maker_order_id: OrderId,
        taker_order_id: OrderId,
        maker_fee: Decimal,
        taker_fee: Decimal,
    ) -> Result<Self, OrderValidationError> {
        if price <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositivePrice(price));
        }
        if quantity <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositiveQuantity(quantity));
        }
        if maker_fee < Decimal::ZERO || taker_fee < Decimal::ZERO {
            return Err(OrderValidationError::NegativeFee);
        }
        Ok(Self {
            id,
            symbol,
            price,
            quantity,
            timestamp,
            aggressor_side,
            maker_order_id,
            taker_order_id,
            maker_fee,
            taker_fee,
        })
    }

    /// `price * quantity`, before fees.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.price * self.quantity
    }
}
