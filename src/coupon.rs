//! Coupon and basket value types.

use serde::{Deserialize, Serialize};

/// A named discount rule, keyed externally by `code`.
///
/// `id` is generated once at creation and never changes. `discount` is a
/// whole percentage and is not range checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub code: String,
    pub discount: i64,
    pub min_basket_value: i64,
}

impl Coupon {
    /// Build a coupon with a freshly generated v4 UUID as its id.
    pub fn new(code: impl Into<String>, discount: i64, min_basket_value: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: code.into(),
            discount,
            min_basket_value,
        }
    }

    /// Whether `basket` meets this coupon's minimum value.
    pub fn accepts(&self, basket: &Basket) -> bool {
        basket.value >= self.min_basket_value
    }
}

/// A transient basket total that a coupon can be applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    pub value: i64,
    #[serde(default)]
    pub applied_discount: i64,
    #[serde(default)]
    pub application_successful: bool,
}

impl Basket {
    pub fn with_value(value: i64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }
}
