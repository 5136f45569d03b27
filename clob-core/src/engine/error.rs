use crate::engine::types::OrderId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Validation failures for a single [`crate::engine::Order`] or
/// [`crate::engine::Trade`], raised before either ever reaches the book.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),

    #[error("price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error("limit, IOC, and FOK orders require a price")]
    MissingPrice,

    #[error("filled quantity {filled} exceeds order total {total}")]
    FilledExceedsTotal { filled: Decimal, total: Decimal },

    #[error("filled quantity must not be negative, got {0}")]
    NegativeFilled(Decimal),

    #[error("attempted fill of {attempted} exceeds remaining {remaining}")]
    InvalidFill {
        attempted: Decimal,
        remaining: Decimal,
    },

    #[error("fee must not be negative")]
    NegativeFee,
}

/// Top-level errors surfaced by [`crate::engine::Engine`] operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderValidationError),

    #[error("order {0} already exists")]
    DuplicateOrder(OrderId),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("order {0} cannot be cancelled in its current state")]
    NotCancellable(OrderId),

    #[error("trade construction failed: {0}")]
    InvalidTrade(OrderValidationError),
}
