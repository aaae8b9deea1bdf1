//! Deterministic state root of the book.
//!
//! The root is the SHA-256 of the SSZ encoding of every resting order, bids
//! best first, then asks best first, FIFO within each level. Replaying the
//! same command sequence always yields the same root, and any difference in
//! price-time priority or remaining shares changes it.

use sha2::{Digest, Sha256};

use crate::orderbook::Book;
use crate::types::BookError;

impl Book {
    /// Compute the 32-byte state root
    ///
    /// # Errors
    ///
    /// [`BookError::Encoding`] if an order fails to serialize.
    pub fn state_root(&self) -> Result<[u8; 32], BookError> {
        let mut hasher = Sha256::new();
        for order in self.resting_orders() {
            let bytes = ssz_rs::serialize(order)
                .map_err(|e| BookError::Encoding(format!("{e:?}")))?;
            hasher.update(&bytes);
        }

        let mut root = [0u8; 32];
        root.copy_from_slice(&hasher.finalize());
        Ok(root)
    }

    /// State root as a hex string
    pub fn state_root_hex(&self) -> Result<String, BookError> {
        self.state_root().map(hex::encode)
    }
}
