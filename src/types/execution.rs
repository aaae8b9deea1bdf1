//! Market order execution reports.
//!
//! A market order consumes resting liquidity and is never stored. The book
//! reports what happened as an [`Execution`]: one [`Fill`] per resting
//! (maker) order touched, in price-time order.

use ssz_rs::prelude::*;

use crate::types::Side;

/// A single match between a resting order and an incoming market order.
///
/// The fill always executes at the resting order's price.
///
/// ## Example
///
/// ```
/// use limit_order_book::types::Fill;
///
/// let fill = Fill::new(7, 99, 80, 20);
/// assert_eq!(fill.notional(), 1_600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Fill {
    /// Resting order that supplied the liquidity
    pub maker_order_id: u64,

    /// Incoming market order
    pub taker_order_id: u64,

    /// Execution price (the maker's limit price)
    pub price: u64,

    /// Shares exchanged
    pub quantity: u64,
}

impl Fill {
    pub fn new(maker_order_id: u64, taker_order_id: u64, price: u64, quantity: u64) -> Self {
        Self {
            maker_order_id,
            taker_order_id,
            price,
            quantity,
        }
    }

    /// Price times quantity, saturating
    pub fn notional(&self) -> u64 {
        self.price.saturating_mul(self.quantity)
    }
}

/// Outcome of one market order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Id of the incoming market order
    pub order_id: u64,

    /// Side of the incoming market order
    pub side: Side,

    /// Shares requested
    pub requested: u64,

    /// Fills in execution order
    pub fills: Vec<Fill>,
}

impl Execution {
    pub fn new(order_id: u64, side: Side, requested: u64) -> Self {
        Self {
            order_id,
            side,
            requested,
            fills: Vec::new(),
        }
    }

    /// Total shares filled
    pub fn filled(&self) -> u64 {
        self.fills.iter().map(|fill| fill.quantity).sum()
    }

    /// Shares dropped because the opposite side ran out of liquidity
    pub fn unfilled(&self) -> u64 {
        self.requested.saturating_sub(self.filled())
    }

    pub fn is_fully_filled(&self) -> bool {
        self.unfilled() == 0
    }
}
