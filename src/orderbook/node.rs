//! Order node for slab-based storage.
//!
//! ## Design
//!
//! `OrderNode` wraps an `Order` with doubly-linked list pointers for its
//! price level queue, plus the slab key of the owning [`Limit`]. All links
//! are slab keys, never references, so unlinking a node can not leave a
//! dangling pointer behind.
//!
//! ## Linked List
//!
//! Orders at the same price level form a doubly-linked list:
//! - `next`: the next (newer) order in the queue
//! - `prev`: the previous (older) order in the queue
//!
//! [`Limit`]: crate::orderbook::Limit

use crate::types::Order;

/// Order node stored in the order slab.
#[derive(Debug, Clone)]
pub struct OrderNode {
    /// The order data
    pub order: Order,

    /// Next order in the queue, None at the tail
    pub next: Option<usize>,

    /// Previous order in the queue, None at the head
    pub prev: Option<usize>,

    /// Slab key of the owning price level, set on append
    pub limit: Option<usize>,
}

impl OrderNode {
    /// Create a new, unlinked order node
    ///
    /// # Example
    ///
    /// ```
    /// use limit_order_book::orderbook::OrderNode;
    /// use limit_order_book::types::{Order, Side};
    ///
    /// let order = Order::new(1, Side::Buy, 80, 20).unwrap();
    /// let node = OrderNode::new(order);
    ///
    /// assert!(node.is_unlinked());
    /// assert!(node.limit.is_none());
    /// ```
    #[inline]
    pub fn new(order: Order) -> Self {
        Self {
            order,
            next: None,
            prev: None,
            limit: None,
        }
    }

    /// Check if this node has no queue neighbours
    #[inline]
    pub fn is_unlinked(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }

    #[inline]
    pub fn order_id(&self) -> u64 {
        self.order.id
    }

    #[inline]
    pub fn price(&self) -> u64 {
        self.order.price
    }

    #[inline]
    pub fn remaining(&self) -> u64 {
        self.order.remaining
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
