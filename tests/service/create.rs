//! Coupon creation and lookup.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use coupon_service::{CouponService, CouponStore, InMemoryCouponStore, ServiceError, StoreError};

use crate::support::{seeded_service, BrokenStore};

#[test]
fn create_returns_record_with_generated_id() {
    let service = CouponService::new(InMemoryCouponStore::new());
    let coupon = service.create_coupon(25, "SPRING", 100).unwrap();

    assert!(!coupon.id.is_empty());
    assert_eq!(coupon.code, "SPRING");
    assert_eq!(coupon.discount, 25);
    assert_eq!(coupon.min_basket_value, 100);
    assert_eq!(service.find_by_code("SPRING").unwrap(), coupon);
}

#[test]
fn generated_ids_are_unique() {
    let service = CouponService::new(InMemoryCouponStore::new());
    let ids: HashSet<String> = (0..100)
        .map(|i| service.create_coupon(10, &format!("C{i}"), 0).unwrap().id)
        .collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn find_missing_code_is_not_found() {
    let service = seeded_service(&[("A", 10, 0)]);
    let err = service.find_by_code("B").unwrap_err();
    assert_eq!(err, ServiceError::Store(StoreError::not_found("B")));
    assert!(err.is_not_found());
}

#[test]
fn second_create_with_same_code_overwrites() {
    let service = CouponService::new(InMemoryCouponStore::new());
    let first = service.create_coupon(10, "DUP", 0).unwrap();
    let second = service.create_coupon(20, "DUP", 50).unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(service.find_by_code("DUP").unwrap(), second);
    assert_eq!(service.store().len().unwrap(), 1);
}

#[test]
fn create_if_absent_rejects_existing_code() {
    let service = CouponService::new(InMemoryCouponStore::new());
    let first = service.create_coupon_if_absent(10, "ONCE", 0).unwrap();

    let err = service.create_coupon_if_absent(20, "ONCE", 0).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Store(StoreError::AlreadyExists {
            code: "ONCE".into()
        })
    );
    assert_eq!(service.find_by_code("ONCE").unwrap(), first);
}

#[test]
fn concurrent_create_if_absent_has_one_winner() {
    let service = Arc::new(CouponService::new(InMemoryCouponStore::new()));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.create_coupon_if_absent(i, "RACE", 0).is_ok())
        })
        .collect();

    let winners = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|won| *won)
        .count();
    assert_eq!(winners, 1);
}

#[test]
fn storage_failures_propagate() {
    let service = CouponService::new(BrokenStore);

    let err = service.create_coupon(10, "X", 0).unwrap_err();
    assert_eq!(
        err,
        ServiceError::Store(StoreError::Backend("connection refused".into()))
    );
    assert!(!service.find_by_code("X").unwrap_err().is_not_found());
}

#[test]
fn default_save_if_absent_uses_find_then_save() {
    let store = BrokenStore;
    let err = store
        .save_if_absent(coupon_service::Coupon::new("X", 1, 0))
        .unwrap_err();
    assert_eq!(err, StoreError::Backend("connection refused".into()));
}
