//! Coupon service layer - create, look up, batch-get and apply coupons.

mod coupon_service;
mod error;

pub use coupon_service::{BatchLookup, CouponService, MAX_FAN_OUT};
pub use error::{BatchError, BatchFailure, ServiceError};
