//! Test stores wrapping `InMemoryCouponStore`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use coupon_service::{Coupon, CouponService, CouponStore, InMemoryCouponStore, StoreError};

/// Delays lookups per code and tracks how many run at once.
#[derive(Default)]
pub struct SlowStore {
    pub inner: InMemoryCouponStore,
    pub delays: HashMap<String, Duration>,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub finished: AtomicUsize,
}

impl SlowStore {
    pub fn with_delay(mut self, code: &str, delay: Duration) -> Self {
        self.delays.insert(code.to_string(), delay);
        self
    }
}

impl CouponStore for SlowStore {
    fn find_by_code(&self, code: &str) -> Result<Coupon, StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(code) {
            thread::sleep(*delay);
        }
        let result = self.inner.find_by_code(code);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.finished.fetch_add(1, Ordering::SeqCst);
        result
    }

    fn save(&self, coupon: Coupon) -> Result<(), StoreError> {
        self.inner.save(coupon)
    }
}

/// A backend that is always down.
pub struct BrokenStore;

impl CouponStore for BrokenStore {
    fn find_by_code(&self, _code: &str) -> Result<Coupon, StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }

    fn save(&self, _coupon: Coupon) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".into()))
    }
}

/// Service over an in-memory store holding `(code, discount, min_basket_value)` rows.
pub fn seeded_service(rows: &[(&str, i64, i64)]) -> CouponService<InMemoryCouponStore> {
    let service = CouponService::new(InMemoryCouponStore::new());
    for (code, discount, min) in rows {
        service.create_coupon(*discount, code, *min).unwrap();
    }
    service
}
