//! End-to-end checkout against an in-memory store.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use hyno_commerce::prelude::*;
use hyno_store::Store;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
    ))
}

fn shipping_info() -> ShippingInfo {
    ShippingInfo {
        name: "Ravi Kumar".into(),
        address: "4 Lake View".into(),
        city: "Bengaluru".into(),
        state: "KA".into(),
        pincode: "560001".into(),
        phone: "9811111111".into(),
    }
}

fn details() -> CheckoutDetails {
    CheckoutDetails {
        shipping_info: shipping_info(),
        payment_method: PaymentMethod::Card,
        prescription: Some("rx-ravi.jpg".into()),
    }
}

#[test]
fn welcome10_on_1000_gives_900() {
    let store = Store::in_memory();
    let mut ledger = OrderLedger::open(store.clone(), clock(), TransitionPolicy::default());
    let offers = OfferEngine::open(store, clock(), true);

    let subtotal = Money::new(100_000, Currency::INR);
    let offer = offers.validate("WELCOME10", &subtotal).unwrap();
    let discount = offers.calculate_discount(Some(offer), &subtotal);
    assert_eq!(discount, Money::new(10_000, Currency::INR));

    let order = ledger
        .create_order(NewOrder {
            user_id: UserId::new(1),
            items: vec![LineItem::new(
                ProductId::new(2),
                "Insulin Glargine",
                1,
                subtotal,
            )],
            shipping_info: shipping_info(),
            payment_method: PaymentMethod::CashOnDelivery,
            discount,
            applied_offer: Some(offer.clone()),
            shipping_fee: Money::zero(Currency::INR),
            prescription: None,
        })
        .unwrap();

    assert_eq!(order.total, Money::new(90_000, Currency::INR));
    assert_eq!(order.shipment_history.len(), 1);
    assert_eq!(order.shipment_history[0].label, ORDER_PLACED);
}

#[test]
fn storefront_order_lifecycle() {
    let mut shop = Storefront::open(Store::in_memory(), CommerceConfig::default(), clock());
    shop.session()
        .sign_in(&Customer::new(UserId::new(7), "Ravi Kumar", "ravi@example.com"))
        .unwrap();

    let mut cart = shop.new_cart();
    let insulin = shop.catalog().get(ProductId::new(2)).unwrap().clone();
    cart.add(&insulin, 6).unwrap();

    // 6 x 7469.17 = 44815.02, above the free-shipping threshold.
    let quote = shop.apply_coupon("pharma15", &cart).unwrap();
    assert_eq!(quote.subtotal, Money::new(4_481_502, Currency::INR));
    assert_eq!(quote.discount, Money::new(150_000, Currency::INR));
    assert!(quote.shipping_fee.is_zero());

    let order = shop.place_order(&mut cart, details()).unwrap();
    assert_eq!(order.total, quote.total);
    assert_eq!(order.prescription.as_deref(), Some("rx-ravi.jpg"));
    assert_eq!(order.tracking_number.as_str(), format!("TRK{}", order.id));
    assert_eq!(shop.catalog().get(ProductId::new(2)).unwrap().stock, 24);

    let ledger = shop.ledger_mut();
    ledger
        .update_status(order.id, OrderStatus::Shipped, None)
        .unwrap();
    let shipped = ledger.get_order(order.id).unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(
        shipped.last_event().unwrap().description,
        "Order status updated to Shipped"
    );

    assert!(matches!(
        shop.cancel_my_order(order.id),
        Err(CommerceError::CancelNotAllowed(OrderStatus::Shipped))
    ));

    let tracked = shop.track(&format!("  TRK{}  ", order.id)).unwrap();
    assert_eq!(tracked.status, OrderStatus::Shipped);
}

#[test]
fn delivered_order_cannot_be_cancelled() {
    let mut shop = Storefront::open(Store::in_memory(), CommerceConfig::default(), clock());
    shop.session()
        .sign_in(&Customer::new(UserId::new(3), "Meera", "meera@example.com"))
        .unwrap();

    let mut cart = shop.new_cart();
    let paracetamol = shop.catalog().get(ProductId::new(3)).unwrap().clone();
    cart.add(&paracetamol, 2).unwrap();
    let order = shop.place_order(&mut cart, details()).unwrap();

    shop.ledger_mut()
        .update_status(order.id, OrderStatus::Delivered, None)
        .unwrap();

    let err = shop.ledger_mut().cancel_order(order.id).unwrap_err();
    assert!(matches!(err, CommerceError::CancelNotAllowed(OrderStatus::Delivered)));
    let order = shop.ledger().get_order(order.id).unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.shipment_history.len(), 2);
}

#[test]
fn offer_usage_limit_across_orders() {
    let mut shop = Storefront::open(Store::in_memory(), CommerceConfig::default(), clock());
    shop.session()
        .sign_in(&Customer::new(UserId::new(9), "Anil", "anil@example.com"))
        .unwrap();

    let limited = shop
        .offers_mut()
        .add_offer(NewOffer {
            code: "TWICE".into(),
            description: "Two uses only".into(),
            discount: DiscountValue::Percentage(5.0),
            min_order: Money::zero(Currency::INR),
            max_discount: None,
            expiry_date: chrono::NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            max_usage: 2,
        })
        .unwrap()
        .id;

    let vitamin = shop.catalog().get(ProductId::new(5)).unwrap().clone();
    for _ in 0..2 {
        let mut cart = shop.new_cart();
        cart.add(&vitamin, 1).unwrap();
        shop.apply_coupon("TWICE", &cart).unwrap();
        shop.place_order(&mut cart, details()).unwrap();
    }

    assert_eq!(shop.offers().get(limited).unwrap().usage_count, 2);

    let mut cart = shop.new_cart();
    cart.add(&vitamin, 1).unwrap();
    let err = shop.apply_coupon("TWICE", &cart).unwrap_err();
    assert!(matches!(
        err,
        CommerceError::OfferRejected(OfferRejection::UsageExceeded)
    ));
    assert_eq!(err.to_string(), "This coupon has reached its usage limit");
}

#[test]
fn new_customer_signs_up_and_tracks_an_order() {
    let mut shop = Storefront::open(Store::in_memory(), CommerceConfig::default(), clock());

    let err = shop
        .sign_up(Registration {
            name: "Ravi Kumar".into(),
            email: "ravi@example.com".into(),
            password: "insulin".into(),
            confirm_password: "insuline".into(),
            ..Default::default()
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match");

    let customer = shop
        .sign_up(Registration {
            name: "Ravi Kumar".into(),
            email: "ravi@example.com".into(),
            password: "insulin".into(),
            confirm_password: "insulin".into(),
            address: "4 Lake View".into(),
            ..Default::default()
        })
        .unwrap();

    let mut cart = shop.new_cart();
    let folic = shop.catalog().get(ProductId::new(7)).unwrap().clone();
    cart.add(&folic, 2).unwrap();
    let order = shop.place_order(&mut cart, details()).unwrap();
    assert_eq!(order.user_id, customer.id);

    shop.log_out().unwrap();
    assert!(shop.my_orders().is_err());
    assert_eq!(shop.track(order.tracking_number.as_str()).unwrap().id, order.id);

    shop.log_in("ravi@example.com", "insulin").unwrap();
    assert_eq!(shop.my_orders().unwrap().len(), 1);
}
