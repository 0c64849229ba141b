//! Type-safe key-value persistence for the Hyno storefront.
//!
//! Everything the storefront keeps between visits lives in a flat
//! key → JSON store with whole-value replace semantics. This crate provides
//! the backend seam, an in-memory and a directory-backed implementation,
//! and a typed [`Store`] handle that handles serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use hyno_store::{keys, Store};
//!
//! let store = Store::open_dir("./data")?;
//!
//! // Replace the whole order collection
//! store.set(keys::ORDERS, &orders)?;
//!
//! // Read it back; missing keys yield None
//! let orders: Option<Vec<Order>> = store.get(keys::ORDERS)?;
//! ```

mod backend;
mod error;
mod kv;
mod session;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::StoreError;
pub use kv::{Records, Store};
pub use session::Session;

/// Keys recognised by the storefront.
pub mod keys {
    pub const ORDERS: &str = "orders";
    pub const PRODUCTS: &str = "products";
    pub const USERS: &str = "users";
    pub const OFFERS: &str = "offers";
    pub const CURRENT_USER: &str = "currentUser";
    pub const CURRENT_ADMIN: &str = "currentAdmin";
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{keys, KeyValueBackend, Records, Session, Store, StoreError};
}
