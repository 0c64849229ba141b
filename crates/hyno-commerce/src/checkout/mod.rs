//! Checkout module.
//!
//! Cart, shipping rule, customer profile and the storefront that turns a
//! cart into an order.

mod cart;
mod customer;
mod shipping;
mod storefront;

pub use cart::{Cart, MAX_QUANTITY_PER_ITEM};
pub use customer::Customer;
pub use shipping::ShippingPolicy;
pub use storefront::{CheckoutDetails, Quote, Storefront};
