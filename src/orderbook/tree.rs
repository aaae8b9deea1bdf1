//! AVL tree of price levels for one side of the book.
//!
//! ## Design
//!
//! Nodes are [`Limit`]s living in a shared `Slab<Limit>`; `parent`, `left`
//! and `right` are slab keys. A `LimitTree` owns nothing but its root key,
//! so every operation takes the slab explicitly, the same way
//! [`Limit::append`] takes the order slab.
//!
//! Keys are stable: deleting a node with two children relinks the in-order
//! successor node into its place instead of copying the successor's
//! contents, so keys held elsewhere (price index, book edges) stay valid.
//!
//! ## Balancing
//!
//! After every insert and delete the path from the structural change to the
//! root is retraced. Each node's height is recomputed and, when its balance
//! factor leaves {-1, 0, 1}, one of the four rotations is applied:
//!
//! ```text
//! left-left:   rotate_right(z)
//! right-right: rotate_left(z)
//! left-right:  rotate_left(z.left),  rotate_right(z)
//! right-left:  rotate_right(z.right), rotate_left(z)
//! ```

use slab::Slab;

use crate::orderbook::level::height_of;
use crate::orderbook::Limit;
use crate::types::Side;

/// One side's AVL tree, identified by its root key.
#[derive(Debug, Clone, Default)]
pub struct LimitTree {
    side: Side,
    root: Option<usize>,
}

impl LimitTree {
    pub fn new(side: Side) -> Self {
        Self { side, root: None }
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
    }

    // ========================================================================
    // Insert / remove
    // ========================================================================

    /// Insert an unlinked level as a leaf and rebalance.
    ///
    /// The caller guarantees no level with the same price is in the tree.
    pub fn insert(&mut self, key: usize, limits: &mut Slab<Limit>) {
        debug_assert!(limits[key].is_leaf() && limits[key].parent.is_none());
        let price = limits[key].price;
        limits[key].height = 1;

        let Some(mut cur) = self.root else {
            self.root = Some(key);
            return;
        };

        loop {
            let node = &limits[cur];
            debug_assert_ne!(node.price, price, "duplicate price level {price}");
            let next = if price < node.price { node.left } else { node.right };
            match next {
                Some(child) => cur = child,
                None => break,
            }
        }

        if price < limits[cur].price {
            limits[cur].left = Some(key);
        } else {
            limits[cur].right = Some(key);
        }
        limits[key].parent = Some(cur);

        self.retrace(Some(cur), limits);
    }

    /// Unlink a level from the tree and rebalance.
    ///
    /// The node stays in the slab with all tree links cleared.
    pub fn remove(&mut self, key: usize, limits: &mut Slab<Limit>) {
        let Limit {
            parent,
            left,
            right,
            ..
        } = limits[key];

        let retrace_from = match (left, right) {
            (Some(left), Some(right)) => {
                let successor = Self::leftmost(right, limits);
                let retrace_from = if successor == right {
                    // Successor keeps its own right subtree.
                    successor
                } else {
                    let successor_parent = limits[successor]
                        .parent
                        .unwrap_or_else(|| unreachable!("successor below {right} has a parent"));
                    let successor_right = limits[successor].right;

                    limits[successor_parent].left = successor_right;
                    if let Some(child) = successor_right {
                        limits[child].parent = Some(successor_parent);
                    }

                    limits[successor].right = Some(right);
                    limits[right].parent = Some(successor);
                    successor_parent
                };

                limits[successor].left = Some(left);
                limits[left].parent = Some(successor);
                self.replace_child(parent, key, Some(successor), limits);
                Some(retrace_from)
            }
            (child, None) | (None, child) => {
                self.replace_child(parent, key, child, limits);
                parent
            }
        };

        let node = &mut limits[key];
        node.parent = None;
        node.left = None;
        node.right = None;
        node.height = 1;

        self.retrace(retrace_from, limits);
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Lowest-priced level
    pub fn min(&self, limits: &Slab<Limit>) -> Option<usize> {
        self.root.map(|root| Self::leftmost(root, limits))
    }

    /// Highest-priced level
    pub fn max(&self, limits: &Slab<Limit>) -> Option<usize> {
        self.root.map(|root| Self::rightmost(root, limits))
    }

    /// Next-lower level in price order
    pub fn predecessor(&self, key: usize, limits: &Slab<Limit>) -> Option<usize> {
        if let Some(left) = limits[key].left {
            return Some(Self::rightmost(left, limits));
        }
        let mut child = key;
        let mut parent = limits[key].parent;
        while let Some(p) = parent {
            if limits[p].right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = limits[p].parent;
        }
        None
    }

    /// Next-higher level in price order
    pub fn successor(&self, key: usize, limits: &Slab<Limit>) -> Option<usize> {
        if let Some(right) = limits[key].right {
            return Some(Self::leftmost(right, limits));
        }
        let mut child = key;
        let mut parent = limits[key].parent;
        while let Some(p) = parent {
            if limits[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = limits[p].parent;
        }
        None
    }

    fn leftmost(mut key: usize, limits: &Slab<Limit>) -> usize {
        while let Some(left) = limits[key].left {
            key = left;
        }
        key
    }

    fn rightmost(mut key: usize, limits: &Slab<Limit>) -> usize {
        while let Some(right) = limits[key].right {
            key = right;
        }
        key
    }

    // ========================================================================
    // Traversals
    // ========================================================================

    /// Prices in ascending order
    pub fn in_order(&self, limits: &Slab<Limit>) -> Vec<u64> {
        let mut prices = Vec::new();
        Self::walk_in_order(self.root, limits, &mut prices);
        prices
    }

    /// Prices in node, left, right order
    pub fn pre_order(&self, limits: &Slab<Limit>) -> Vec<u64> {
        let mut prices = Vec::new();
        Self::walk_pre_order(self.root, limits, &mut prices);
        prices
    }

    /// Prices in left, right, node order
    pub fn post_order(&self, limits: &Slab<Limit>) -> Vec<u64> {
        let mut prices = Vec::new();
        Self::walk_post_order(self.root, limits, &mut prices);
        prices
    }

    fn walk_in_order(key: Option<usize>, limits: &Slab<Limit>, out: &mut Vec<u64>) {
        if let Some(k) = key {
            Self::walk_in_order(limits[k].left, limits, out);
            out.push(limits[k].price);
            Self::walk_in_order(limits[k].right, limits, out);
        }
    }

    fn walk_pre_order(key: Option<usize>, limits: &Slab<Limit>, out: &mut Vec<u64>) {
        if let Some(k) = key {
            out.push(limits[k].price);
            Self::walk_pre_order(limits[k].left, limits, out);
            Self::walk_pre_order(limits[k].right, limits, out);
        }
    }

    fn walk_post_order(key: Option<usize>, limits: &Slab<Limit>, out: &mut Vec<u64>) {
        if let Some(k) = key {
            Self::walk_post_order(limits[k].left, limits, out);
            Self::walk_post_order(limits[k].right, limits, out);
            out.push(limits[k].price);
        }
    }

    // ========================================================================
    // Rebalancing
    // ========================================================================

    /// Walk from `start` to the root fixing heights and rotating.
    fn retrace(&mut self, start: Option<usize>, limits: &mut Slab<Limit>) {
        let mut cur = start;
        while let Some(key) = cur {
            let subtree_root = self.rebalance(key, limits);
            cur = limits[subtree_root].parent;
        }
    }

    /// Restore the AVL property at `key`, returning the subtree's new root.
    fn rebalance(&mut self, key: usize, limits: &mut Slab<Limit>) -> usize {
        Self::update_height(key, limits);
        let factor = limits[key].balance_factor(limits);

        if factor > 1 {
            if let Some(left) = limits[key].left {
                if limits[left].balance_factor(limits) < 0 {
                    self.rotate_left(left, limits);
                }
            }
            return self.rotate_right(key, limits);
        }
        if factor < -1 {
            if let Some(right) = limits[key].right {
                if limits[right].balance_factor(limits) > 0 {
                    self.rotate_right(right, limits);
                }
            }
            return self.rotate_left(key, limits);
        }
        key
    }

    /// ```text
    ///     x              y
    ///      \            / \
    ///       y    =>    x   c
    ///      / \          \
    ///     b   c          b
    /// ```
    fn rotate_left(&mut self, x: usize, limits: &mut Slab<Limit>) -> usize {
        let Some(y) = limits[x].right else {
            debug_assert!(false, "rotate_left without a right child");
            return x;
        };
        let parent = limits[x].parent;
        let inner = limits[y].left;

        limits[x].right = inner;
        if let Some(b) = inner {
            limits[b].parent = Some(x);
        }
        limits[y].left = Some(x);
        limits[x].parent = Some(y);
        self.replace_child(parent, x, Some(y), limits);

        Self::update_height(x, limits);
        Self::update_height(y, limits);
        y
    }

    /// Mirror image of [`Self::rotate_left`].
    fn rotate_right(&mut self, x: usize, limits: &mut Slab<Limit>) -> usize {
        let Some(y) = limits[x].left else {
            debug_assert!(false, "rotate_right without a left child");
            return x;
        };
        let parent = limits[x].parent;
        let inner = limits[y].right;

        limits[x].left = inner;
        if let Some(b) = inner {
            limits[b].parent = Some(x);
        }
        limits[y].right = Some(x);
        limits[x].parent = Some(y);
        self.replace_child(parent, x, Some(y), limits);

        Self::update_height(x, limits);
        Self::update_height(y, limits);
        y
    }

    /// Point `parent`'s link to `old` (or the root) at `new`.
    fn replace_child(
        &mut self,
        parent: Option<usize>,
        old: usize,
        new: Option<usize>,
        limits: &mut Slab<Limit>,
    ) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut limits[p];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    debug_assert_eq!(node.right, Some(old), "{old} is not a child of {p}");
                    node.right = new;
                }
            }
        }
        if let Some(n) = new {
            limits[n].parent = parent;
        }
    }

    fn update_height(key: usize, limits: &mut Slab<Limit>) {
        let height = 1 + height_of(limits, limits[key].left).max(height_of(limits, limits[key].right));
        limits[key].height = height;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
