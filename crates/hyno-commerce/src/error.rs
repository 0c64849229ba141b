//! Commerce error types.

use hyno_store::StoreError;
use thiserror::Error;

use crate::ids::{OfferId, OrderId, ProductId, UserId};
use crate::money::Money;
use crate::order::OrderStatus;

/// Why a coupon code could not be applied.
///
/// Display strings are the messages shown next to the coupon field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfferRejection {
    #[error("Invalid coupon code")]
    NotFound,

    #[error("This coupon is no longer active")]
    Inactive,

    #[error("This coupon has expired")]
    Expired,

    #[error("Minimum order amount is {minimum}")]
    BelowMinimum { minimum: Money },

    #[error("This coupon has reached its usage limit")]
    UsageExceeded,
}

/// Why a sign-up or sign-in attempt was refused.
///
/// Display strings are the messages shown on the login form.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters long")]
    WeakPassword,

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Missing or invalid input field.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Offer not found: {0}")]
    OfferNotFound(OfferId),

    #[error(transparent)]
    OfferRejected(#[from] OfferRejection),

    #[error(transparent)]
    AuthRejected(#[from] AuthRejection),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The password hasher failed; nothing was stored.
    #[error("Password hashing failed: {0}")]
    Credentials(String),

    /// Status change refused by the strict transition policy.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("Order cannot be cancelled while {0}")]
    CancelNotAllowed(OrderStatus),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    #[error("Configuration error: {0}")]
    Config(String),

    /// Store read or write failed; in-memory state was left unchanged.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl CommerceError {
    pub(crate) fn order_not_found(id: OrderId) -> Self {
        CommerceError::OrderNotFound(id.to_string())
    }
}
