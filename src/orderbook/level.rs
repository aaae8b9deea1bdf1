//! Price level management for orders at the same price.
//!
//! ## Design
//!
//! A `Limit` represents all resting orders at a single price on one side.
//! It plays two roles:
//!
//! 1. A FIFO queue of orders (doubly-linked through the order slab) with
//!    its aggregates `total_volume` and `size`.
//! 2. A node of its side's AVL tree (`parent`, `left`, `right`, `height`),
//!    linked through the limit slab. See [`LimitTree`](super::LimitTree).
//!
//! ## Queue Structure
//!
//! ```text
//! head (oldest) <-> order2 <-> order3 <-> tail (newest)
//! ```
//!
//! - New orders are appended at the tail
//! - Market orders consume from the head
//! - Any order can be removed in O(1) using its slab key

use std::fmt;

use slab::Slab;

use crate::orderbook::OrderNode;
use crate::types::Side;

/// A price level: an order queue and an AVL tree node.
#[derive(Debug, Clone)]
pub struct Limit {
    /// Slab key of this level in the limit slab
    pub key: usize,

    /// Side this level rests on
    pub side: Side,

    /// Price for this level
    pub price: u64,

    /// Sum of remaining shares over the queue
    pub total_volume: u64,

    /// Number of orders in the queue
    pub size: usize,

    /// Oldest order (slab key), first to be filled
    pub head: Option<usize>,

    /// Newest order (slab key)
    pub tail: Option<usize>,

    /// Tree parent (limit slab key), None at the root
    pub parent: Option<usize>,

    /// Lower-priced child
    pub left: Option<usize>,

    /// Higher-priced child
    pub right: Option<usize>,

    /// Subtree height; a leaf is 1 and an absent child counts as 0
    pub height: i32,
}

impl Limit {
    /// Create a new empty, unlinked level
    pub fn new(key: usize, side: Side, price: u64) -> Self {
        Self {
            key,
            side,
            price,
            total_volume: 0,
            size: 0,
            head: None,
            tail: None,
            parent: None,
            left: None,
            right: None,
            height: 1,
        }
    }

    /// Check if the queue is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    // ========================================================================
    // Order queue
    // ========================================================================

    /// Append an order to the tail of the queue.
    ///
    /// Records this level as the order's parent and adds its shares to
    /// `total_volume`.
    ///
    /// The caller guarantees `total_volume` can hold the order's shares.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not present in `orders`.
    pub fn append(&mut self, key: usize, orders: &mut Slab<OrderNode>) {
        let node = &mut orders[key];
        let shares = node.remaining();

        node.prev = self.tail;
        node.next = None;
        node.limit = Some(self.key);

        if let Some(tail_key) = self.tail {
            orders[tail_key].next = Some(key);
        } else {
            self.head = Some(key);
        }

        self.tail = Some(key);
        debug_assert!(
            self.total_volume.checked_add(shares).is_some(),
            "level {} volume overflow",
            self.price
        );
        self.size += 1;
        self.total_volume += shares;
    }

    /// Unlink an order from anywhere in the queue.
    ///
    /// Returns the remaining shares of the removed order. The node stays in
    /// the slab; freeing it is the caller's job.
    pub fn remove_order(&mut self, key: usize, orders: &mut Slab<OrderNode>) -> u64 {
        let node = &orders[key];
        debug_assert_eq!(node.limit, Some(self.key), "order is not queued at this level");
        let shares = node.remaining();
        let prev_key = node.prev;
        let next_key = node.next;

        match prev_key {
            Some(prev) => orders[prev].next = next_key,
            None => self.head = next_key,
        }
        match next_key {
            Some(next) => orders[next].prev = prev_key,
            None => self.tail = prev_key,
        }

        let node = &mut orders[key];
        node.prev = None;
        node.next = None;
        node.limit = None;

        debug_assert!(self.size > 0, "level {} size underflow", self.price);
        debug_assert!(self.total_volume >= shares, "level {} volume underflow", self.price);
        self.size -= 1;
        self.total_volume -= shares;

        shares
    }

    /// Dequeue the head order, returning its slab key
    pub fn pop_head(&mut self, orders: &mut Slab<OrderNode>) -> Option<usize> {
        let head = self.head?;
        self.remove_order(head, orders);
        Some(head)
    }

    /// Get the head order's slab key (oldest order)
    #[inline]
    pub fn peek_head(&self) -> Option<usize> {
        self.head
    }

    /// Partially fill a queued order and keep `total_volume` in step.
    ///
    /// Returns the shares actually taken from the order.
    pub fn reduce_order(&mut self, key: usize, shares: u64, orders: &mut Slab<OrderNode>) -> u64 {
        let node = &mut orders[key];
        debug_assert_eq!(node.limit, Some(self.key), "order is not queued at this level");
        let applied = node.order.reduce(shares);
        self.total_volume -= applied;
        applied
    }

    /// Iterate the queue from head to tail, yielding slab keys
    pub fn queue<'a>(&self, orders: &'a Slab<OrderNode>) -> impl Iterator<Item = usize> + 'a {
        std::iter::successors(self.head, move |&key| orders[key].next)
    }

    // ========================================================================
    // Tree node
    // ========================================================================

    /// `height(left) - height(right)`
    pub fn balance_factor(&self, limits: &Slab<Limit>) -> i32 {
        height_of(limits, self.left) - height_of(limits, self.right)
    }
}

/// Height of an optional subtree; absent subtrees have height 0
#[inline]
pub(crate) fn height_of(limits: &Slab<Limit>, key: Option<usize>) -> i32 {
    key.map_or(0, |k| limits[k].height)
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} limit {}: {} orders, {} shares",
            self.side, self.price, self.size, self.total_volume
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
