//! # Limit Order Book
//!
//! In-memory core of a limit order book with deterministic price-time
//! priority.
//!
//! ## Architecture
//!
//! - **Types**: Order, Side, Fill, Execution and error types
//! - **OrderBook**: per-side AVL trees of price levels, each level a FIFO
//!   queue of orders, all stored in slab arenas
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical command sequences give identical books
//!    (see [`Book::state_root`])
//! 2. **Integer ticks**: prices and shares are plain integers
//! 3. **Arena storage**: nodes link by slab key, never by reference
//! 4. **Synchronous execution**: every operation runs to completion; share a
//!    book across threads only behind a single lock
//! 5. **No auto-crossing**: limit orders always rest; only market orders
//!    consume liquidity
//!
//! The core never prints. It emits `tracing` events that stay inert unless
//! the embedding application installs a subscriber.

// ============================================================================
// Module declarations
// ============================================================================

/// Core value types: Order, Side, Fill, Execution, errors
pub mod types;

/// Order book: price trees, levels and the book itself
pub mod orderbook;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use orderbook::{Book, Limit, LimitTree, OrderNode};
pub use types::{BookError, Execution, Fill, InvariantViolation, Order, Side};
