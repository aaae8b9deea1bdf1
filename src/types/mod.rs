//! Core value types for the limit order book
//!
//! ## Types
//!
//! - [`Order`]: A resting limit order
//! - [`Side`]: Buy or Sell
//! - [`Fill`] / [`Execution`]: Market order results
//! - [`BookError`]: Recoverable operation errors
//! - [`InvariantViolation`]: Structural defects found by the checker

mod error;
mod execution;
mod order;

pub use error::{BookError, InvariantViolation};
pub use execution::{Execution, Fill};
pub use order::{Order, Side};
