//! CouponService - coupon business rules over a `CouponStore`.
//!
//! The service is stateless apart from the store it owns. Code uniqueness
//! is not enforced by `create_coupon`: callers check with `find_by_code`
//! first, and two racing creates of one code are last-write-wins. Use
//! `create_coupon_if_absent` for an atomic create on stores that support it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, ScopedJoinHandle};

use tracing::{debug, warn};

use super::error::{BatchError, BatchFailure, ServiceError};
use crate::coupon::{Basket, Coupon};
use crate::store::{CouponStore, StoreError};

type Lookup = Result<Coupon, StoreError>;

/// Largest batch that gets one lookup thread per code when no concurrency
/// limit is configured. Bigger batches run on a pool of this many workers.
pub const MAX_FAN_OUT: usize = 256;

/// Result of a batch lookup.
///
/// `coupons[i]` corresponds to input code `i`. Slots whose lookup failed hold
/// an empty `Coupon::default()`; `error` lists exactly those slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchLookup {
    pub coupons: Vec<Coupon>,
    pub error: Option<BatchError>,
}

impl BatchLookup {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Drop the partial results if any lookup failed.
    pub fn into_result(self) -> Result<Vec<Coupon>, BatchError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.coupons),
        }
    }
}

/// Coupon business logic.
///
/// Generic over `S`, the store. Construct once and share it (for example
/// behind an `Arc`) with whatever serves requests.
pub struct CouponService<S> {
    store: S,
    max_concurrency: Option<usize>,
    lookup_stack_size: Option<usize>,
}

impl<S: CouponStore> CouponService<S> {
    /// Create a service over `store`.
    ///
    /// Batch lookups fan out one thread per code, up to `MAX_FAN_OUT` codes.
    pub fn new(store: S) -> Self {
        Self {
            store,
            max_concurrency: None,
            lookup_stack_size: None,
        }
    }

    /// Cap the number of lookups a single batch runs at once.
    ///
    /// `None` restores the default one-thread-per-code fan-out.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// Stack size in bytes of batch lookup threads; `None` uses the platform default.
    pub fn with_lookup_stack_size(mut self, bytes: Option<usize>) -> Self {
        self.lookup_stack_size = bytes;
        self
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create and save a coupon under a freshly generated id.
    ///
    /// Overwrites any coupon already saved under `code`.
    pub fn create_coupon(
        &self,
        discount: i64,
        code: &str,
        min_basket_value: i64,
    ) -> Result<Coupon, ServiceError> {
        let coupon = Coupon::new(code, discount, min_basket_value);
        self.store.save(coupon.clone())?;
        debug!(id = %coupon.id, code = %coupon.code, "coupon created");
        Ok(coupon)
    }

    /// Like `create_coupon`, but fails with `StoreError::AlreadyExists`
    /// instead of overwriting an existing code.
    pub fn create_coupon_if_absent(
        &self,
        discount: i64,
        code: &str,
        min_basket_value: i64,
    ) -> Result<Coupon, ServiceError> {
        let coupon = Coupon::new(code, discount, min_basket_value);
        self.store.save_if_absent(coupon.clone())?;
        debug!(id = %coupon.id, code = %coupon.code, "coupon created");
        Ok(coupon)
    }

    pub fn find_by_code(&self, code: &str) -> Result<Coupon, ServiceError> {
        Ok(self.store.find_by_code(code)?)
    }

    /// Look up every code concurrently, keeping input order.
    ///
    /// Blocks until all lookups finish. All coupons are returned even when
    /// some lookups fail; check `BatchLookup::error` before trusting them.
    /// If the OS refuses to start lookup threads, the remaining codes are
    /// looked up on the calling thread.
    pub fn get_coupons<C>(&self, codes: &[C]) -> BatchLookup
    where
        C: AsRef<str> + Sync,
    {
        let results = match self.max_concurrency {
            Some(limit) if limit < codes.len() => self.lookup_pooled(codes, limit),
            Some(_) => self.lookup_per_code(codes),
            None if codes.len() > MAX_FAN_OUT => self.lookup_pooled(codes, MAX_FAN_OUT),
            None => self.lookup_per_code(codes),
        };

        let mut coupons = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (index, (code, result)) in codes.iter().zip(results).enumerate() {
            match result {
                Ok(coupon) => coupons.push(coupon),
                Err(cause) => {
                    failures.push(BatchFailure {
                        index,
                        code: code.as_ref().to_string(),
                        cause,
                    });
                    coupons.push(Coupon::default());
                }
            }
        }

        debug!(
            requested = codes.len(),
            failed = failures.len(),
            "batch lookup finished"
        );

        BatchLookup {
            coupons,
            error: BatchError::from_failures(failures),
        }
    }

    /// Apply the coupon stored under `code` to `basket`.
    ///
    /// The discount factor is `1 - discount / 100` in integer arithmetic, so
    /// only discounts of 100 or more change the basket value; any smaller
    /// discount leaves it as is while still recording `applied_discount`.
    /// The coupon's minimum basket value is not checked here.
    pub fn apply_coupon(&self, mut basket: Basket, code: &str) -> Result<Basket, ServiceError> {
        let coupon = self.store.find_by_code(code)?;

        if basket.value <= 0 {
            return Err(ServiceError::InvalidBasketState);
        }

        let factor = 1i64.saturating_sub(coupon.discount / 100);
        basket.applied_discount = coupon.discount;
        basket.value = basket.value.saturating_mul(factor);
        basket.application_successful = true;
        Ok(basket)
    }

    fn lookup_per_code<C>(&self, codes: &[C]) -> Vec<Lookup>
    where
        C: AsRef<str> + Sync,
    {
        thread::scope(|scope| {
            let mut spawning = true;
            let handles: Vec<_> = codes
                .iter()
                .enumerate()
                .map(|(index, code)| {
                    if !spawning {
                        return None;
                    }
                    let lookup = move || self.store.find_by_code(code.as_ref());
                    match self.lookup_thread().spawn_scoped(scope, lookup) {
                        Ok(handle) => Some(handle),
                        Err(e) => {
                            warn!(
                                index,
                                error = %e,
                                "lookup thread spawn failed, finishing batch inline"
                            );
                            spawning = false;
                            None
                        }
                    }
                })
                .collect();

            // Codes without a thread are looked up here, after the spawned ones started.
            codes
                .iter()
                .zip(handles)
                .map(|(code, handle)| match handle {
                    Some(handle) => join_lookup(handle),
                    None => self.store.find_by_code(code.as_ref()),
                })
                .collect()
        })
    }

    /// Drain `codes` with `workers` workers, the calling thread being one of them.
    fn lookup_pooled<C>(&self, codes: &[C], workers: usize) -> Vec<Lookup>
    where
        C: AsRef<str> + Sync,
    {
        let cursor = &AtomicUsize::new(0);
        let drain = move || {
            let mut done = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(code) = codes.get(index) else {
                    break;
                };
                done.push((index, self.store.find_by_code(code.as_ref())));
            }
            done
        };
        let mut slots: Vec<Option<Lookup>> = (0..codes.len()).map(|_| None).collect();

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers.saturating_sub(1));
            for _ in 1..workers {
                match self.lookup_thread().spawn_scoped(scope, drain) {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        warn!(
                            spawned = handles.len(),
                            error = %e,
                            "lookup worker spawn failed, continuing with fewer workers"
                        );
                        break;
                    }
                }
            }

            let mut finished = vec![drain()];
            finished.extend(handles.into_iter().map(join_lookup));
            for (index, result) in finished.into_iter().flatten() {
                slots[index] = Some(result);
            }
        });

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| Err(StoreError::Backend("lookup was not run".into())))
            })
            .collect()
    }

    fn lookup_thread(&self) -> thread::Builder {
        let builder = thread::Builder::new().name("coupon-lookup".into());
        match self.lookup_stack_size {
            Some(size) => builder.stack_size(size),
            None => builder,
        }
    }
}

fn join_lookup<T>(handle: ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}
