//! Order types for the limit order book.
//!
//! ## SSZ Serialization
//!
//! `Order` derives `SimpleSerialize` from ssz_rs so that the book's state
//! root is computed over a deterministic byte encoding:
//! - Basic types (u64, u8): direct little-endian encoding
//! - Fixed-size composites: concatenated little-endian fields
//!
//! Prices and share counts are plain integer ticks.

use std::fmt;

use ssz_rs::prelude::*;

use crate::types::BookError;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Buy or Sell
///
/// Represented as u8 for SSZ compatibility:
/// - Buy = 0
/// - Sell = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    /// Buy order (bid)
    #[default]
    Buy,
    /// Sell order (ask)
    Sell,
}

impl Side {
    /// Convert to u8 for serialization
    pub fn to_u8(self) -> u8 {
        match self {
            Side::Buy => 0,
            Side::Sell => 1,
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Side::Buy),
            1 => Some(Side::Sell),
            _ => None,
        }
    }

    /// Map the `isBuy` flag used at the order-entry boundary
    pub fn from_is_buy(is_buy: bool) -> Self {
        if is_buy {
            Side::Buy
        } else {
            Side::Sell
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("buy"),
            Side::Sell => f.write_str("sell"),
        }
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A resting limit order.
///
/// ## SSZ Layout
///
/// Fixed-size container of 33 bytes (8+1+8+8+8).
///
/// ## Example
///
/// ```
/// use limit_order_book::types::{Order, Side};
///
/// let order = Order::new(357, Side::Buy, 27, 100).unwrap();
/// assert_eq!(order.shares(), 27);
/// assert_eq!(order.side(), Side::Buy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Caller-supplied order identifier, unique among resting orders
    pub id: u64,

    /// Order side as u8 (0=Buy, 1=Sell)
    pub side_raw: u8,

    /// Limit price in ticks
    pub price: u64,

    /// Shares at submission
    pub quantity: u64,

    /// Remaining shares, decremented by partial fills
    pub remaining: u64,
}

impl Order {
    /// Create a new limit order
    ///
    /// # Errors
    ///
    /// [`BookError::InvalidQuantity`] if `shares` is zero.
    pub fn new(id: u64, side: Side, shares: u64, price: u64) -> Result<Self, BookError> {
        if shares == 0 {
            return Err(BookError::InvalidQuantity(shares));
        }
        Ok(Self {
            id,
            side_raw: side.to_u8(),
            price,
            quantity: shares,
            remaining: shares,
        })
    }

    /// Get the order side
    pub fn side(&self) -> Side {
        Side::from_u8(self.side_raw).unwrap_or(Side::Buy)
    }

    /// Remaining shares
    #[inline]
    pub fn shares(&self) -> u64 {
        self.remaining
    }

    /// Check if the order is fully filled
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    /// Shares filled so far
    pub fn filled_quantity(&self) -> u64 {
        self.quantity.saturating_sub(self.remaining)
    }

    /// Partially fill this order.
    ///
    /// Returns the shares actually taken, which is less than `shares` only
    /// when the order has fewer remaining. The owning level's aggregate is
    /// maintained by [`Limit::reduce_order`](crate::orderbook::Limit::reduce_order).
    pub fn reduce(&mut self, shares: u64) -> u64 {
        let applied = shares.min(self.remaining);
        self.remaining -= applied;
        applied
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "order {} {} {} @ {}",
            self.id,
            self.side(),
            self.remaining,
            self.price
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
