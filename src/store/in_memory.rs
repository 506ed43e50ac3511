//! InMemoryCouponStore - HashMap-backed coupon store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{CouponStore, StoreError};
use crate::coupon::Coupon;

/// In-memory coupon store backed by a HashMap keyed by code.
///
/// Lives for the process lifetime. Clone-friendly via Arc: clones share the
/// same storage.
#[derive(Clone, Default)]
pub struct InMemoryCouponStore {
    storage: Arc<RwLock<HashMap<String, Coupon>>>,
}

impl InMemoryCouponStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored coupons.
    pub fn len(&self) -> Result<usize, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("len"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl CouponStore for InMemoryCouponStore {
    fn find_by_code(&self, code: &str) -> Result<Coupon, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("find_by_code"))?;

        storage
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::not_found(code))
    }

    fn save(&self, coupon: Coupon) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("save"))?;

        storage.insert(coupon.code.clone(), coupon);
        Ok(())
    }

    fn save_if_absent(&self, coupon: Coupon) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("save_if_absent"))?;

        if storage.contains_key(&coupon.code) {
            return Err(StoreError::AlreadyExists { code: coupon.code });
        }

        storage.insert(coupon.code.clone(), coupon);
        Ok(())
    }
}
