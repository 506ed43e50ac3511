//! JSON request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::coupon::Basket;

/// `POST /api/apply`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub basket: Basket,
    pub code: String,
}

/// `POST /api/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub discount: i64,
    pub code: String,
    pub min_basket_value: i64,
}

/// `GET /api/coupons`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponsRequest {
    pub codes: Vec<String>,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
