//! Offers installed when the store has none.

use chrono::NaiveDate;

use crate::ids::OfferId;
use crate::money::{Currency, Money};
use crate::offer::{DiscountValue, Offer};

fn inr(major: i64) -> Money {
    Money::new(major * 100, Currency::INR)
}

pub(crate) fn default_offers() -> Vec<Offer> {
    let expiry = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap_or(NaiveDate::MAX);
    vec![
        Offer {
            id: OfferId::new(1),
            code: "WELCOME10".to_string(),
            description: "10% off on orders above \u{20b9}500".to_string(),
            discount: DiscountValue::Percentage(10.0),
            min_order: inr(500),
            max_discount: Some(inr(1000)),
            expiry_date: expiry,
            active: true,
            usage_count: 0,
            max_usage: 100,
        },
        Offer {
            id: OfferId::new(2),
            code: "FLAT200".to_string(),
            description: "\u{20b9}200 off on orders above \u{20b9}1000".to_string(),
            discount: DiscountValue::Fixed(inr(200)),
            min_order: inr(1000),
            max_discount: None,
            expiry_date: expiry,
            active: true,
            usage_count: 0,
            max_usage: 50,
        },
        Offer {
            id: OfferId::new(3),
            code: "PHARMA15".to_string(),
            description: "15% off on pharmacy products above \u{20b9}750".to_string(),
            discount: DiscountValue::Percentage(15.0),
            min_order: inr(750),
            max_discount: Some(inr(1500)),
            expiry_date: expiry,
            active: true,
            usage_count: 0,
            max_usage: 200,
        },
    ]
}
