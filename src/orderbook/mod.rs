//! Order book: AVL-indexed price levels with FIFO order queues.
//!
//! ## Architecture
//!
//! - **Slab-based storage**: orders and price levels live in two arenas and
//!   link to each other by slab key
//! - **Price levels**: one AVL tree per side, keyed by price
//! - **Price-time priority**: FIFO ordering at each price level
//!
//! ## Components
//!
//! - [`OrderNode`]: `Order` plus queue links and its parent level
//! - [`Limit`]: a price level, both order queue and tree node
//! - [`LimitTree`]: AVL insert/delete/rotations and traversals for one side
//! - [`Book`]: indexes, book edges and the add/cancel/market operations
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | Add order at existing level | O(1) |
//! | Add order at new level | O(log n) |
//! | Cancel order | O(1), O(log n) if the level empties |
//! | Best bid/ask | O(1) |
//! | Market order | O(k log n) for k levels drained |
//!
//! ## Example
//!
//! ```
//! use limit_order_book::orderbook::Book;
//! use limit_order_book::types::Side;
//!
//! let mut book = Book::new();
//! book.add_order(1, Side::Sell, 20, 101).unwrap();
//! book.add_order(2, Side::Sell, 20, 100).unwrap();
//!
//! assert_eq!(book.best_ask(), Some(100));
//! assert_eq!(book.in_order(Side::Sell), vec![100, 101]);
//! ```

pub mod book;
pub mod level;
pub mod node;
mod state;
pub mod tree;

pub use book::Book;
pub use level::Limit;
pub use node::OrderNode;
pub use tree::LimitTree;
