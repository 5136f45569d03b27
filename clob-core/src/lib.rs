//! `clob-core`: a single-venue continuous limit order book matching engine.
//!
//! The crate owns the canonical sorted book, enforces price-time priority
//! and trade-through prevention, and executes the four supported order
//! types (Market, Limit, IOC, FOK) under a single engine-wide lock. The
//! HTTP/websocket transport, request validation, and configuration loading
//! that would normally wrap this engine are external collaborators and are
//! not part of this crate.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub mod config;
pub mod engine;
pub mod logging;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::*;
}
