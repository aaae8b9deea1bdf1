//! The limit order book.
//!
//! ## Architecture
//!
//! - **Order slab**: every resting order, linked into its level's queue
//! - **Limit slab**: every live price level, linked into its side's tree
//! - **Two AVL trees**: bid and ask levels ordered by price
//! - **HashMaps**: order id → order key, and per side price → level key
//! - **Edges**: cached keys of the highest bid and lowest ask levels
//!
//! ## Price Ordering
//!
//! Both trees are ordered by ascending price. The bid edge is the maximum of
//! the buy tree; the ask edge is the minimum of the sell tree. When an edge
//! level is retired, the replacement is its in-order neighbour, computed
//! before the level is unlinked.
//!
//! ## Example
//!
//! ```
//! use limit_order_book::{Book, Side};
//!
//! let mut book = Book::with_capacity(1_000, 100);
//!
//! book.add_order(1, Side::Buy, 80, 20).unwrap();
//! book.add_order(2, Side::Sell, 100, 25).unwrap();
//!
//! assert_eq!(book.best_bid(), Some(20));
//! assert_eq!(book.best_ask(), Some(25));
//! assert_eq!(book.spread(), Some(5));
//! ```

use std::collections::HashMap;

use slab::Slab;
use tracing::{debug, trace};

use crate::orderbook::{Limit, LimitTree, OrderNode};
use crate::types::{BookError, Execution, Fill, InvariantViolation, Order, Side};

/// Limit order book with AVL-indexed price levels.
#[derive(Debug)]
pub struct Book {
    /// Resting orders
    orders: Slab<OrderNode>,

    /// Live price levels of both sides
    limits: Slab<Limit>,

    buy_tree: LimitTree,
    sell_tree: LimitTree,

    /// Order id to order slab key
    order_map: HashMap<u64, usize>,

    /// Price to limit slab key, per side
    limit_buy_map: HashMap<u64, usize>,
    limit_sell_map: HashMap<u64, usize>,

    /// Highest bid level
    highest_buy: Option<usize>,

    /// Lowest ask level
    lowest_sell: Option<usize>,

    bid_count: usize,
    ask_count: usize,
}

impl Default for Book {
    fn default() -> Self {
        Self::new()
    }
}

impl Book {
    /// Create a new empty book
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create a book with pre-allocated arenas and indexes
    ///
    /// # Arguments
    ///
    /// * `order_capacity` - Resting orders to pre-allocate for
    /// * `level_capacity` - Price levels (both sides) to pre-allocate for
    pub fn with_capacity(order_capacity: usize, level_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            limits: Slab::with_capacity(level_capacity),
            buy_tree: LimitTree::new(Side::Buy),
            sell_tree: LimitTree::new(Side::Sell),
            order_map: HashMap::with_capacity(order_capacity),
            limit_buy_map: HashMap::with_capacity(level_capacity / 2),
            limit_sell_map: HashMap::with_capacity(level_capacity / 2),
            highest_buy: None,
            lowest_sell: None,
            bid_count: 0,
            ask_count: 0,
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Pre-allocated order slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    /// Total number of resting orders
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bid_count(&self) -> usize {
        self.bid_count
    }

    #[inline]
    pub fn ask_count(&self) -> usize {
        self.ask_count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of live price levels on one side
    pub fn level_count(&self, side: Side) -> usize {
        self.limit_map(side).len()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Rest a new limit order at the tail of its price level.
    ///
    /// Creates (and tree-inserts) the level if the price is new. Never
    /// matches, even when the order crosses the opposite edge.
    ///
    /// # Errors
    ///
    /// - [`BookError::InvalidQuantity`] if `shares` is zero
    /// - [`BookError::DuplicateOrderId`] if `order_id` is already resting
    /// - [`BookError::VolumeOverflow`] if the level's total volume cannot
    ///   hold `shares` more
    pub fn add_order(
        &mut self,
        order_id: u64,
        side: Side,
        shares: u64,
        price: u64,
    ) -> Result<(), BookError> {
        let order = Order::new(order_id, side, shares, price)?;
        if self.order_map.contains_key(&order_id) {
            debug!(order_id, "rejected add: duplicate order id");
            return Err(BookError::DuplicateOrderId(order_id));
        }

        let existing = self.limit_map(side).get(&price).copied();
        if let Some(key) = existing {
            if self.limits[key].total_volume.checked_add(shares).is_none() {
                debug!(order_id, %side, shares, price, "rejected add: level volume overflow");
                return Err(BookError::VolumeOverflow { side, price, shares });
            }
        }
        let limit_key = match existing {
            Some(key) => key,
            None => self.add_limit(side, price),
        };

        let key = self.orders.insert(OrderNode::new(order));
        self.limits[limit_key].append(key, &mut self.orders);
        self.order_map.insert(order_id, key);
        match side {
            Side::Buy => self.bid_count += 1,
            Side::Sell => self.ask_count += 1,
        }

        trace!(order_id, %side, shares, price, "order added");
        Ok(())
    }

    /// Remove a resting order, retiring its level if it empties.
    ///
    /// # Errors
    ///
    /// [`BookError::OrderNotFound`] if no order with `order_id` is resting.
    ///
    /// # Example
    ///
    /// ```
    /// use limit_order_book::{Book, BookError, Side};
    ///
    /// let mut book = Book::new();
    /// book.add_order(5, Side::Buy, 80, 20).unwrap();
    ///
    /// let cancelled = book.cancel_order(5).unwrap();
    /// assert_eq!(cancelled.id, 5);
    /// assert_eq!(book.best_bid(), None);
    /// assert_eq!(book.cancel_order(5), Err(BookError::OrderNotFound(5)));
    /// ```
    pub fn cancel_order(&mut self, order_id: u64) -> Result<Order, BookError> {
        let Some(key) = self.order_map.remove(&order_id) else {
            debug!(order_id, "rejected cancel: order not resting");
            return Err(BookError::OrderNotFound(order_id));
        };

        let limit_key = self.orders[key]
            .limit
            .unwrap_or_else(|| unreachable!("resting order {order_id} has no level"));
        let limit = &mut self.limits[limit_key];
        limit.remove_order(key, &mut self.orders);
        if limit.is_empty() {
            self.retire_limit(limit_key);
        }

        let order = self.orders.remove(key).order;
        self.decrement_side_count(order.side());

        trace!(order_id, side = %order.side(), shares = order.remaining, "order cancelled");
        Ok(order)
    }

    /// Execute a market order against the opposite side's best levels.
    ///
    /// A buy drains from the lowest ask upward, a sell from the highest bid
    /// downward, filling each level's queue in arrival order. Quantity left
    /// when the opposite side runs dry is dropped; the market order itself
    /// never rests.
    ///
    /// # Errors
    ///
    /// [`BookError::InvalidQuantity`] if `shares` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use limit_order_book::{Book, Side};
    ///
    /// let mut book = Book::new();
    /// book.add_order(1, Side::Sell, 100, 80).unwrap();
    ///
    /// let execution = book.market_order(2, Side::Buy, 20).unwrap();
    /// assert_eq!(execution.filled(), 20);
    /// assert_eq!(book.find_order(1).unwrap().shares(), 80);
    /// ```
    pub fn market_order(
        &mut self,
        order_id: u64,
        side: Side,
        shares: u64,
    ) -> Result<Execution, BookError> {
        if shares == 0 {
            return Err(BookError::InvalidQuantity(shares));
        }

        let mut execution = Execution::new(order_id, side, shares);
        let mut remaining = shares;

        while remaining > 0 {
            let Some(limit_key) = self.edge(side.opposite()) else {
                break;
            };
            let limit = &mut self.limits[limit_key];
            let Some(head) = limit.peek_head() else {
                debug_assert!(false, "edge level {} is empty", limit.price);
                break;
            };

            let maker = &self.orders[head];
            let fill_qty = maker.remaining().min(remaining);
            execution
                .fills
                .push(Fill::new(maker.order_id(), order_id, limit.price, fill_qty));
            remaining -= fill_qty;

            if fill_qty < maker.remaining() {
                limit.reduce_order(head, fill_qty, &mut self.orders);
                break;
            }

            limit.pop_head(&mut self.orders);
            if limit.is_empty() {
                self.retire_limit(limit_key);
            }
            let filled = self.orders.remove(head).order;
            self.order_map.remove(&filled.id);
            self.decrement_side_count(filled.side());
        }

        debug!(
            order_id,
            %side,
            requested = shares,
            filled = execution.filled(),
            fills = execution.fills.len(),
            "market order executed"
        );
        Ok(execution)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up a resting order
    pub fn find_order(&self, order_id: u64) -> Result<&Order, BookError> {
        self.order_map
            .get(&order_id)
            .map(|&key| &self.orders[key].order)
            .ok_or(BookError::OrderNotFound(order_id))
    }

    #[inline]
    pub fn contains_order(&self, order_id: u64) -> bool {
        self.order_map.contains_key(&order_id)
    }

    /// Look up the live level at `(side, price)`
    pub fn find_limit(&self, side: Side, price: u64) -> Result<&Limit, BookError> {
        self.limit_map(side)
            .get(&price)
            .map(|&key| &self.limits[key])
            .ok_or(BookError::LimitNotFound { side, price })
    }

    /// Follow a tree link (`parent`, `left`, `right`) of a [`Limit`]
    pub fn limit(&self, key: usize) -> Option<&Limit> {
        self.limits.get(key)
    }

    /// Orders queued at `(side, price)`, head first
    pub fn level_orders(&self, side: Side, price: u64) -> Result<Vec<&Order>, BookError> {
        let limit = self.find_limit(side, price)?;
        Ok(limit
            .queue(&self.orders)
            .map(|key| &self.orders[key].order)
            .collect())
    }

    /// Root level of one side's tree
    pub fn root(&self, side: Side) -> Option<&Limit> {
        self.tree(side).root().map(|key| &self.limits[key])
    }

    // ========================================================================
    // Best Bid/Ask
    // ========================================================================

    /// Highest bid price
    #[inline]
    pub fn best_bid(&self) -> Option<u64> {
        self.best_bid_limit().map(|limit| limit.price)
    }

    /// Lowest ask price
    #[inline]
    pub fn best_ask(&self) -> Option<u64> {
        self.best_ask_limit().map(|limit| limit.price)
    }

    pub fn best_bid_limit(&self) -> Option<&Limit> {
        self.highest_buy.map(|key| &self.limits[key])
    }

    pub fn best_ask_limit(&self) -> Option<&Limit> {
        self.lowest_sell.map(|key| &self.limits[key])
    }

    /// `best_ask - best_bid`, None if either side is empty or the book is
    /// crossed
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask >= bid => Some(ask - bid),
            _ => None,
        }
    }

    // ========================================================================
    // Traversals
    // ========================================================================

    /// Prices of one side in ascending order
    pub fn in_order(&self, side: Side) -> Vec<u64> {
        self.tree(side).in_order(&self.limits)
    }

    pub fn pre_order(&self, side: Side) -> Vec<u64> {
        self.tree(side).pre_order(&self.limits)
    }

    pub fn post_order(&self, side: Side) -> Vec<u64> {
        self.tree(side).post_order(&self.limits)
    }

    /// Remove every order and level
    pub fn clear(&mut self) {
        self.orders.clear();
        self.limits.clear();
        self.buy_tree.clear();
        self.sell_tree.clear();
        self.order_map.clear();
        self.limit_buy_map.clear();
        self.limit_sell_map.clear();
        self.highest_buy = None;
        self.lowest_sell = None;
        self.bid_count = 0;
        self.ask_count = 0;
    }

    // ========================================================================
    // Level lifecycle
    // ========================================================================

    /// Create a level, index it, insert it into its tree and extend the
    /// edge if it is the new best price.
    fn add_limit(&mut self, side: Side, price: u64) -> usize {
        let entry = self.limits.vacant_entry();
        let key = entry.key();
        entry.insert(Limit::new(key, side, price));

        let (tree, limit_map, edge) = match side {
            Side::Buy => (&mut self.buy_tree, &mut self.limit_buy_map, &mut self.highest_buy),
            Side::Sell => (&mut self.sell_tree, &mut self.limit_sell_map, &mut self.lowest_sell),
        };
        limit_map.insert(price, key);
        tree.insert(key, &mut self.limits);

        let extends_edge = match edge.map(|edge_key| self.limits[edge_key].price) {
            None => true,
            Some(edge_price) => match side {
                Side::Buy => price > edge_price,
                Side::Sell => price < edge_price,
            },
        };
        if extends_edge {
            *edge = Some(key);
        }

        debug!(%side, price, "price level created");
        key
    }

    /// Unlink an emptied level from the edge, tree and index, then free it.
    fn retire_limit(&mut self, key: usize) {
        let Limit { side, price, .. } = self.limits[key];
        debug_assert!(self.limits[key].is_empty(), "retiring non-empty level {price}");

        let (tree, limit_map, edge) = match side {
            Side::Buy => (&mut self.buy_tree, &mut self.limit_buy_map, &mut self.highest_buy),
            Side::Sell => (&mut self.sell_tree, &mut self.limit_sell_map, &mut self.lowest_sell),
        };
        if *edge == Some(key) {
            *edge = match side {
                Side::Buy => tree.predecessor(key, &self.limits),
                Side::Sell => tree.successor(key, &self.limits),
            };
        }
        tree.remove(key, &mut self.limits);
        limit_map.remove(&price);
        self.limits.remove(key);

        debug!(%side, price, "price level retired");
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn tree(&self, side: Side) -> &LimitTree {
        match side {
            Side::Buy => &self.buy_tree,
            Side::Sell => &self.sell_tree,
        }
    }

    fn limit_map(&self, side: Side) -> &HashMap<u64, usize> {
        match side {
            Side::Buy => &self.limit_buy_map,
            Side::Sell => &self.limit_sell_map,
        }
    }

    fn edge(&self, side: Side) -> Option<usize> {
        match side {
            Side::Buy => self.highest_buy,
            Side::Sell => self.lowest_sell,
        }
    }

    fn decrement_side_count(&mut self, side: Side) {
        match side {
            Side::Buy => self.bid_count -= 1,
            Side::Sell => self.ask_count -= 1,
        }
    }

    /// Orders of both sides, bids best first then asks best first, FIFO
    /// within each level.
    pub(crate) fn resting_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        let bids = self.in_order(Side::Buy).into_iter().rev().map(|p| (Side::Buy, p));
        let asks = self.in_order(Side::Sell).into_iter().map(|p| (Side::Sell, p));
        bids.chain(asks).flat_map(move |(side, price)| {
            let limit = &self.limits[self.limit_map(side)[&price]];
            limit.queue(&self.orders).map(move |key| &self.orders[key].order)
        })
    }

    // ========================================================================
    // Invariant checking
    // ========================================================================

    /// Verify every structural invariant of both sides.
    ///
    /// Any violation is a defect in the book; this is meant for tests and
    /// debugging, and walks the whole book.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut resting = 0;
        for side in [Side::Buy, Side::Sell] {
            let tree = self.tree(side);
            let mut levels = 0;
            self.check_subtree(tree.root(), None, side, None, None, &mut levels, &mut resting)?;
            if levels != self.limit_map(side).len() {
                return Err(InvariantViolation::Index(format!(
                    "{side} tree has {levels} levels, price index has {}",
                    self.limit_map(side).len()
                )));
            }

            let expected = match side {
                Side::Buy => tree.max(&self.limits),
                Side::Sell => tree.min(&self.limits),
            };
            let actual = self.edge(side);
            if actual != expected {
                return Err(InvariantViolation::Edge {
                    side,
                    actual: actual.map(|k| self.limits[k].price),
                    expected: expected.map(|k| self.limits[k].price),
                });
            }
        }

        if resting != self.order_map.len() || resting != self.orders.len() {
            return Err(InvariantViolation::Index(format!(
                "{resting} queued orders, {} indexed, {} stored",
                self.order_map.len(),
                self.orders.len()
            )));
        }
        if self.bid_count + self.ask_count != resting {
            return Err(InvariantViolation::Index(format!(
                "side counts {} + {} do not add up to {resting}",
                self.bid_count, self.ask_count
            )));
        }
        Ok(())
    }

    /// Returns the subtree height.
    #[allow(clippy::too_many_arguments)]
    fn check_subtree(
        &self,
        key: Option<usize>,
        parent: Option<usize>,
        side: Side,
        lower: Option<u64>,
        upper: Option<u64>,
        levels: &mut usize,
        resting: &mut usize,
    ) -> Result<i32, InvariantViolation> {
        let Some(key) = key else {
            return Ok(0);
        };
        let limit = self.limits.get(key).ok_or_else(|| {
            InvariantViolation::Index(format!("{side} tree links to freed level {key}"))
        })?;
        let price = limit.price;

        if limit.key != key || limit.side != side || limit.parent != parent {
            return Err(InvariantViolation::ParentLink { side, price });
        }
        if lower.is_some_and(|l| price <= l) || upper.is_some_and(|u| price >= u) {
            return Err(InvariantViolation::Ordering { side, price });
        }
        if self.limit_map(side).get(&price) != Some(&key) {
            return Err(InvariantViolation::Index(format!(
                "{side} level {price} missing from price index"
            )));
        }

        let left = self.check_subtree(limit.left, Some(key), side, lower, Some(price), levels, resting)?;
        let right = self.check_subtree(limit.right, Some(key), side, Some(price), upper, levels, resting)?;

        let expected = 1 + left.max(right);
        if limit.height != expected {
            return Err(InvariantViolation::Height {
                side,
                price,
                stored: limit.height,
                expected,
            });
        }
        let factor = left - right;
        if !(-1..=1).contains(&factor) {
            return Err(InvariantViolation::Unbalanced { side, price, factor });
        }

        if limit.is_empty() {
            return Err(InvariantViolation::EmptyLimit { side, price });
        }
        let (mut count, mut volume, mut prev) = (0usize, 0u64, None);
        for order_key in limit.queue(&self.orders) {
            let node = &self.orders[order_key];
            if node.prev != prev
                || node.limit != Some(key)
                || node.price() != price
                || node.order.side() != side
                || node.remaining() == 0
                || self.order_map.get(&node.order_id()) != Some(&order_key)
            {
                return Err(InvariantViolation::Aggregate { side, price });
            }
            count += 1;
            volume = volume
                .checked_add(node.remaining())
                .ok_or(InvariantViolation::Aggregate { side, price })?;
            prev = Some(order_key);
        }
        if count != limit.size || volume != limit.total_volume || prev != limit.tail {
            return Err(InvariantViolation::Aggregate { side, price });
        }

        *levels += 1;
        *resting += count;
        Ok(expected)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
