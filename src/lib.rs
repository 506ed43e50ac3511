mod config;
mod coupon;
mod service;
mod store;

#[cfg(feature = "http")]
pub mod http;
#[cfg(feature = "http")]
pub mod telemetry;

pub use config::{ApiConfig, Config, ConfigError, ServiceConfig};
pub use coupon::{Basket, Coupon};
pub use service::{
    BatchError, BatchFailure, BatchLookup, CouponService, ServiceError, MAX_FAN_OUT,
};
pub use store::{CouponStore, InMemoryCouponStore, StoreError};
