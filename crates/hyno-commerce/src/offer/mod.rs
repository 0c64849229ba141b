//! Offer module.
//!
//! Coupon definitions, discount arithmetic and the engine that validates
//! codes at checkout.

mod engine;
mod offer;
mod seed;

pub use engine::OfferEngine;
pub use offer::{calculate_discount, DiscountValue, NewOffer, Offer, OfferUpdate};
