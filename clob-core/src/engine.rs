pub mod bbo;
pub mod book;
pub mod error;
pub mod journal;
pub mod matching;
pub mod types;

pub use bbo::{BboManager, BboObserver, BboSnapshot};
pub use book::{BookView, OrderBook, PriceLevel};
pub use error::{EngineError, OrderValidationError};
pub use journal::TradeJournal;
pub use matching::{Engine, OrderResult, Statistics, TradeCallback};
pub use types::{Order, OrderId, OrderType, Side, Status, Symbol, Trade, TradeId};
