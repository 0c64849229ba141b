//! Offer (coupon) types and discount arithmetic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::OfferId;
use crate::money::Money;
use crate::CommerceError;

/// How an offer reduces the subtotal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum DiscountValue {
    /// Percentage off (0.0 - 100.0].
    Percentage(f64),
    /// Fixed amount off.
    Fixed(Money),
}

impl DiscountValue {
    /// Raw discount before any cap.
    pub fn calculate(&self, subtotal: &Money) -> Money {
        match self {
            DiscountValue::Percentage(percent) => subtotal.percentage(*percent),
            DiscountValue::Fixed(amount) => *amount,
        }
    }

    fn validate(&self) -> Result<(), CommerceError> {
        match self {
            DiscountValue::Percentage(p) if !(*p > 0.0 && *p <= 100.0) => Err(
                CommerceError::Validation(format!("percentage must be within (0, 100], got {p}")),
            ),
            DiscountValue::Fixed(amount) if !amount.is_positive() => Err(
                CommerceError::Validation("fixed discount must be positive".to_string()),
            ),
            _ => Ok(()),
        }
    }
}

/// A coupon definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    /// Coupon code, matched case-insensitively.
    pub code: String,
    pub description: String,
    pub discount: DiscountValue,
    /// Subtotal must reach this for the offer to apply.
    pub min_order: Money,
    /// Cap on the computed discount.
    #[serde(default)]
    pub max_discount: Option<Money>,
    /// Date the offer expires. It stops applying once 00:00 UTC on this
    /// date has passed, so the last full day of use is the day before.
    pub expiry_date: NaiveDate,
    pub active: bool,
    /// Orders that have used this offer. Never decremented.
    #[serde(default)]
    pub usage_count: u32,
    pub max_usage: u32,
}

impl Offer {
    /// Case-insensitive match, ignoring surrounding whitespace.
    pub fn matches_code(&self, code: &str) -> bool {
        self.code.to_lowercase() == code.trim().to_lowercase()
    }

    /// Instant after which the offer counts as expired: midnight UTC at the
    /// start of `expiry_date`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expiry_date.and_time(chrono::NaiveTime::MIN).and_utc()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at() < now
    }

    /// Usage limit reached.
    pub fn is_exhausted(&self) -> bool {
        self.usage_count >= self.max_usage
    }

    /// Discount this offer grants on `subtotal`: percentage or fixed value,
    /// capped at `max_discount`, never negative. Zero when `subtotal` is
    /// not in the offer's currency.
    pub fn calculate_discount(&self, subtotal: &Money) -> Money {
        if subtotal.currency != self.min_order.currency {
            return Money::zero(subtotal.currency);
        }
        let raw = self.discount.calculate(subtotal);
        let capped = match &self.max_discount {
            Some(cap) => raw.at_most(cap),
            None => raw,
        };
        capped.non_negative()
    }
}

/// Discount for an optional offer; zero when none is applied.
pub fn calculate_discount(offer: Option<&Offer>, subtotal: &Money) -> Money {
    match offer {
        Some(offer) => offer.calculate_discount(subtotal),
        None => Money::zero(subtotal.currency),
    }
}

/// Admin input for a new offer. Usage starts at zero and the offer starts
/// active.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOffer {
    pub code: String,
    pub description: String,
    pub discount: DiscountValue,
    pub min_order: Money,
    pub max_discount: Option<Money>,
    pub expiry_date: NaiveDate,
    pub max_usage: u32,
}

impl NewOffer {
    pub(crate) fn into_offer(self, id: OfferId) -> Offer {
        Offer {
            id,
            code: self.code.trim().to_string(),
            description: self.description,
            discount: self.discount,
            min_order: self.min_order,
            max_discount: self.max_discount,
            expiry_date: self.expiry_date,
            active: true,
            usage_count: 0,
            max_usage: self.max_usage,
        }
    }
}

/// Partial admin edit. `None` leaves a field unchanged; usage count is not
/// editable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferUpdate {
    pub code: Option<String>,
    pub description: Option<String>,
    pub discount: Option<DiscountValue>,
    pub min_order: Option<Money>,
    /// `Some(None)` removes the cap.
    pub max_discount: Option<Option<Money>>,
    pub expiry_date: Option<NaiveDate>,
    pub active: Option<bool>,
    pub max_usage: Option<u32>,
}

impl OfferUpdate {
    pub(crate) fn apply_to(self, offer: &mut Offer) {
        if let Some(code) = self.code {
            offer.code = code.trim().to_string();
        }
        if let Some(description) = self.description {
            offer.description = description;
        }
        if let Some(discount) = self.discount {
            offer.discount = discount;
        }
        if let Some(min_order) = self.min_order {
            offer.min_order = min_order;
        }
        if let Some(max_discount) = self.max_discount {
            offer.max_discount = max_discount;
        }
        if let Some(expiry_date) = self.expiry_date {
            offer.expiry_date = expiry_date;
        }
        if let Some(active) = self.active {
            offer.active = active;
        }
        if let Some(max_usage) = self.max_usage {
            offer.max_usage = max_usage;
        }
    }
}

/// Field checks shared by create and update.
pub(crate) fn validate_offer(offer: &Offer) -> Result<(), CommerceError> {
    if offer.code.is_empty() {
        return Err(CommerceError::Validation("coupon code is required".to_string()));
    }
    if offer.code.chars().any(char::is_whitespace) {
        return Err(CommerceError::Validation(
            "coupon code cannot contain spaces".to_string(),
        ));
    }
    offer.discount.validate()?;
    if offer.min_order.is_negative() {
        return Err(CommerceError::Validation(
            "minimum order cannot be negative".to_string(),
        ));
    }
    if offer.max_discount.is_some_and(|cap| cap.is_negative()) {
        return Err(CommerceError::Validation(
            "maximum discount cannot be negative".to_string(),
        ));
    }
    let currency = offer.min_order.currency;
    let fixed = match offer.discount {
        DiscountValue::Fixed(amount) => Some(amount),
        DiscountValue::Percentage(_) => None,
    };
    if fixed.into_iter().chain(offer.max_discount).any(|m| m.currency != currency) {
        return Err(CommerceError::Validation(format!(
            "offer amounts must all be in {currency}"
        )));
    }
    if offer.max_usage == 0 {
        return Err(CommerceError::Validation(
            "usage limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
