//! CouponStore - abstract keyed storage for coupons.

use std::sync::Arc;

use super::StoreError;
use crate::coupon::Coupon;

/// Keyed storage for coupons.
///
/// `save` is an upsert: there is no compare-and-swap between a prior
/// `find_by_code` and the write, so concurrent saves of one code are
/// last-write-wins.
pub trait CouponStore: Send + Sync {
    /// Return the coupon stored under exactly `code`.
    fn find_by_code(&self, code: &str) -> Result<Coupon, StoreError>;

    /// Insert or overwrite the entry for `coupon.code`.
    fn save(&self, coupon: Coupon) -> Result<(), StoreError>;

    /// Insert `coupon` only if its code is not taken yet.
    ///
    /// The default implementation is a find followed by a save and is not
    /// atomic. Stores that can do better should override it.
    fn save_if_absent(&self, coupon: Coupon) -> Result<(), StoreError> {
        match self.find_by_code(&coupon.code) {
            Ok(_) => Err(StoreError::AlreadyExists { code: coupon.code }),
            Err(StoreError::NotFound { .. }) => self.save(coupon),
            Err(e) => Err(e),
        }
    }
}

impl<S: CouponStore + ?Sized> CouponStore for Arc<S> {
    fn find_by_code(&self, code: &str) -> Result<Coupon, StoreError> {
        (**self).find_by_code(code)
    }

    fn save(&self, coupon: Coupon) -> Result<(), StoreError> {
        (**self).save(coupon)
    }

    fn save_if_absent(&self, coupon: Coupon) -> Result<(), StoreError> {
        (**self).save_if_absent(coupon)
    }
}
