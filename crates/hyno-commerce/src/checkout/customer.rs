//! Signed-in customer profile.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

/// Profile kept under the `currentUser` slot while a customer is signed in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
}

impl Customer {
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: String::new(),
            address: String::new(),
            dob: String::new(),
            gender: String::new(),
        }
    }
}
