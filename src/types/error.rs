//! Error types returned by the order book.
//!
//! [`BookError`] covers caller-recoverable conditions. [`InvariantViolation`]
//! is only produced by [`Book::check_invariants`](crate::Book::check_invariants)
//! and always indicates a defect in the book itself.

use thiserror::Error;

use crate::types::Side;

/// Recoverable errors signalled by book operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    /// An order with this id is already resting.
    #[error("order id {0} is already resting on the book")]
    DuplicateOrderId(u64),

    /// Share counts must be positive.
    #[error("invalid quantity {0}: shares must be positive")]
    InvalidQuantity(u64),

    /// Adding the order would overflow the level's total volume.
    #[error("{side} limit {price}: adding {shares} shares overflows total volume")]
    VolumeOverflow { side: Side, price: u64, shares: u64 },

    /// No resting order has this id.
    #[error("no resting order with id {0}")]
    OrderNotFound(u64),

    /// No live price level exists at this side and price.
    #[error("no {side} limit at price {price}")]
    LimitNotFound { side: Side, price: u64 },

    /// SSZ encoding failed while computing the state root.
    #[error("failed to encode book state: {0}")]
    Encoding(String),
}

/// A broken structural invariant, reported by the invariant checker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{side} tree: price {price} out of order")]
    Ordering { side: Side, price: u64 },

    #[error("{side} tree: broken parent link at price {price}")]
    ParentLink { side: Side, price: u64 },

    #[error("{side} tree: stale height {stored} (expected {expected}) at price {price}")]
    Height {
        side: Side,
        price: u64,
        stored: i32,
        expected: i32,
    },

    #[error("{side} tree: balance factor {factor} at price {price}")]
    Unbalanced { side: Side, price: u64, factor: i32 },

    #[error("{side} edge is {actual:?}, expected {expected:?}")]
    Edge {
        side: Side,
        actual: Option<u64>,
        expected: Option<u64>,
    },

    #[error("{side} limit {price}: aggregates do not match its queue")]
    Aggregate { side: Side, price: u64 },

    #[error("{side} limit {price} is live but empty")]
    EmptyLimit { side: Side, price: u64 },

    #[error("order index out of sync: {0}")]
    Index(String),
}
