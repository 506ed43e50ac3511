//! Discount application.

use coupon_service::{Basket, ServiceError};

use crate::support::seeded_service;

#[test]
fn half_discount_leaves_value_unchanged() {
    let service = seeded_service(&[("HALF", 50, 0)]);
    let basket = service.apply_coupon(Basket::with_value(100), "HALF").unwrap();

    assert_eq!(
        basket,
        Basket {
            value: 100,
            applied_discount: 50,
            application_successful: true,
        }
    );
}

#[test]
fn full_discount_zeroes_value() {
    let service = seeded_service(&[("FREE", 100, 0)]);
    let basket = service.apply_coupon(Basket::with_value(100), "FREE").unwrap();

    assert_eq!(basket.value, 0);
    assert_eq!(basket.applied_discount, 100);
    assert!(basket.application_successful);
}

#[test]
fn discounts_above_one_hundred_follow_integer_factor() {
    let service = seeded_service(&[("OVER", 250, 0)]);
    let basket = service.apply_coupon(Basket::with_value(40), "OVER").unwrap();
    assert_eq!(basket.value, -40);
}

#[test]
fn zero_value_basket_is_rejected() {
    let service = seeded_service(&[("HALF", 50, 0)]);
    let err = service.apply_coupon(Basket::with_value(0), "HALF").unwrap_err();

    assert_eq!(err, ServiceError::InvalidBasketState);
    assert_eq!(
        err.to_string(),
        "tried to apply discount to negative or zero value"
    );
}

#[test]
fn unknown_code_is_not_found() {
    let service = seeded_service(&[]);
    let err = service
        .apply_coupon(Basket::with_value(100), "GHOST")
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn min_basket_value_is_not_checked_by_service() {
    let service = seeded_service(&[("BIG", 100, 1_000)]);
    let coupon = service.find_by_code("BIG").unwrap();
    let basket = Basket::with_value(10);

    assert!(!coupon.accepts(&basket));
    assert!(service.apply_coupon(basket, "BIG").unwrap().application_successful);
}
