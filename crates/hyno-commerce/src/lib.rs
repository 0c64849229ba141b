//! Storefront domain logic for the Hyno online pharmacy.
//!
//! This crate holds everything between the cart page and the persisted
//! record of an order:
//!
//! - **Orders**: the ledger that creates orders and tracks their status history
//! - **Offers**: coupon validation, discount arithmetic and usage limits
//! - **Catalog**: products and stock levels
//! - **Checkout**: cart, shipping rule and the [`Storefront`] that places orders
//! - **Users**: sign-up, sign-in and account management
//!
//! All state is persisted through a [`hyno_store::Store`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hyno_commerce::prelude::*;
//! use hyno_store::Store;
//!
//! let store = Store::open_dir("./data")?;
//! let mut shop = Storefront::open(store, CommerceConfig::default(), Arc::new(SystemClock));
//! shop.log_in("asha@example.com", "paracetamol")?;
//!
//! let mut cart = shop.new_cart();
//! cart.add(shop.catalog().get(ProductId::new(1)).unwrap(), 2)?;
//! let quote = shop.apply_coupon("WELCOME10", &cart)?;
//! println!("Total: {}", quote.total);
//!
//! let order = shop.place_order(&mut cart, details)?;
//! println!("Track with {}", order.tracking_number);
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod checkout;
pub mod offer;
pub mod order;
pub mod users;

#[cfg(test)]
mod testing;

pub use checkout::Storefront;
pub use config::CommerceConfig;
pub use error::{AuthRejection, CommerceError, OfferRejection};
pub use ids::*;
pub use money::{Currency, Money, STORE_CURRENCY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{CommerceConfig, ShippingConfig};
    pub use crate::error::{AuthRejection, CommerceError, OfferRejection};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money, STORE_CURRENCY};

    // Catalog
    pub use crate::catalog::{Catalog, NewProduct, Product, ProductUpdate};

    // Checkout
    pub use crate::checkout::{
        Cart, CheckoutDetails, Customer, Quote, ShippingPolicy, Storefront,
    };

    // Offers
    pub use crate::offer::{DiscountValue, NewOffer, Offer, OfferEngine, OfferUpdate};

    // Orders
    pub use crate::order::{
        LineItem, NewOrder, Order, OrderLedger, OrderStatus, PaymentMethod, ShipmentEvent,
        ShippingInfo, TransitionPolicy, ORDER_PLACED,
    };

    // Users
    pub use crate::users::{ProfileUpdate, Registration, User, UserDirectory};
}
