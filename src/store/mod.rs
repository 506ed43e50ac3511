//! Coupon storage - keyed by coupon code.
//!
//! The store contract is deliberately narrow: look a coupon up by its code,
//! or save one. Implementations must be safe to share between threads; reads
//! may run in parallel, writes are exclusive.
//!
//! ## Example
//!
//! ```
//! use coupon_service::{Coupon, CouponStore, InMemoryCouponStore};
//!
//! let store = InMemoryCouponStore::new();
//! store.save(Coupon::new("WELCOME", 10, 50))?;
//! let found = store.find_by_code("WELCOME")?;
//! assert_eq!(found.discount, 10);
//! # Ok::<(), coupon_service::StoreError>(())
//! ```

mod in_memory;
mod store;

pub use in_memory::InMemoryCouponStore;
pub use store::CouponStore;

/// Error type for coupon store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No coupon is stored under this code.
    #[error("coupon not found: {code}")]
    NotFound { code: String },
    /// A coupon already exists under this code (only from `save_if_absent`).
    #[error("coupon already exists: {code}")]
    AlreadyExists { code: String },
    /// The storage lock was poisoned by a panicking writer.
    #[error("coupon store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Any other backend failure.
    #[error("coupon store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(code: impl Into<String>) -> Self {
        StoreError::NotFound { code: code.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
