//! Signed-in user and admin slots.
//!
//! The signed-in customer is whatever record sits under `currentUser`, and
//! the admin area is reachable whenever a record sits under `currentAdmin`.
//! Credentials are checked before a record is written here; the slots
//! themselves are a navigation guard, not a security boundary.

use serde::{de::DeserializeOwned, Serialize};

use crate::{keys, Store, StoreError};

/// Session slots over a [`Store`].
///
/// # Example
///
/// ```rust,ignore
/// use hyno_store::{Session, Store};
///
/// let session = Session::new(Store::in_memory());
/// session.sign_in(&user)?;
/// let current: Option<User> = session.current_user()?;
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    store: Store,
}

impl Session {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The signed-in customer record, if any.
    pub fn current_user<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        self.store.get(keys::CURRENT_USER)
    }

    /// Record `user` as the signed-in customer.
    pub fn sign_in<T: Serialize>(&self, user: &T) -> Result<(), StoreError> {
        self.store.set(keys::CURRENT_USER, user)?;
        tracing::info!("customer signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CURRENT_USER)
    }

    /// The signed-in admin record, if any.
    pub fn current_admin<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        self.store.get(keys::CURRENT_ADMIN)
    }

    pub fn admin_sign_in<T: Serialize>(&self, admin: &T) -> Result<(), StoreError> {
        self.store.set(keys::CURRENT_ADMIN, admin)?;
        tracing::info!("admin signed in");
        Ok(())
    }

    pub fn admin_sign_out(&self) -> Result<(), StoreError> {
        self.store.remove(keys::CURRENT_ADMIN)
    }

    /// Whether the admin views should be reachable.
    pub fn is_admin(&self) -> Result<bool, StoreError> {
        self.store.exists(keys::CURRENT_ADMIN)
    }
}
