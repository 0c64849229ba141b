//! Account records and the forms that create and edit them.

use serde::{Deserialize, Serialize};

use crate::checkout::Customer;
use crate::ids::UserId;

/// A registered customer account, stored in the `users` list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Argon2 hash of the password. Demo accounts have none and cannot
    /// sign in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Plain password written by older storefront builds. Replaced by
    /// `password_hash` at the next successful sign-in.
    #[serde(default, rename = "password", skip_serializing_if = "Option::is_none")]
    pub(crate) legacy_password: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub dob: String,
    #[serde(default)]
    pub gender: String,
}

impl User {
    /// Case-insensitive match, ignoring surrounding whitespace.
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.trim().eq_ignore_ascii_case(email.trim())
    }

    /// The profile written to the session slot on sign-in. Never carries
    /// credentials.
    pub fn profile(&self) -> Customer {
        Customer {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            dob: self.dob.clone(),
            gender: self.gender.clone(),
        }
    }
}

/// The sign-up form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub address: String,
    pub dob: String,
    pub gender: String,
}

/// Profile edit. `None` leaves a field unchanged; passwords are not
/// editable here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn apply_to(self, user: &mut User) {
        let fields = [
            (self.name, &mut user.name),
            (self.email.map(|e| e.trim().to_string()), &mut user.email),
            (self.phone, &mut user.phone),
            (self.address, &mut user.address),
            (self.dob, &mut user.dob),
            (self.gender, &mut user.gender),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Demo accounts listed in the admin view of a fresh store. They carry no
/// password.
pub(crate) fn default_users() -> Vec<User> {
    [
        (
            1,
            "John Doe",
            "john@example.com",
            "123-456-7890",
            "123 Main St, City, State 12345",
            "1990-01-01",
            "Male",
        ),
        (
            2,
            "Jane Smith",
            "jane@example.com",
            "987-654-3210",
            "456 Oak Ave, City, State 12345",
            "1985-05-15",
            "Female",
        ),
    ]
    .into_iter()
    .map(|(id, name, email, phone, address, dob, gender)| User {
        id: UserId::new(id),
        name: name.to_string(),
        email: email.to_string(),
        password_hash: None,
        legacy_password: None,
        phone: phone.to_string(),
        address: address.to_string(),
        dob: dob.to_string(),
        gender: gender.to_string(),
    })
    .collect()
}
