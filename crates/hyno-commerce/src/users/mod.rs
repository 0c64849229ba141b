//! Customer accounts.
//!
//! Sign-up, sign-in, profile edits and admin removal over the `users`
//! list. Passwords are stored as Argon2 hashes.

mod password;
mod user;

pub use password::{PasswordHasher, MIN_PASSWORD_LENGTH};
pub use user::{ProfileUpdate, Registration, User};

use hyno_store::{keys, Records, Store};
use serde_json::Value;

use crate::error::AuthRejection;
use crate::ids::UserId;
use crate::CommerceError;

/// Registered accounts persisted under [`keys::USERS`].
///
/// Stored accounts that cannot be read are kept aside and written back
/// unchanged on every save.
pub struct UserDirectory {
    store: Store,
    hasher: PasswordHasher,
    users: Vec<User>,
    unreadable: Vec<Value>,
}

impl UserDirectory {
    /// Load accounts from `store`. When nothing is stored and `seed` is set,
    /// the demo accounts are installed and persisted.
    pub fn open(store: Store, seed: bool) -> Self {
        let mut records = Self::load(&store);
        if seed && records.items.is_empty() && records.unreadable.is_empty() {
            records.items = user::default_users();
            if let Err(e) = store.set(keys::USERS, &records.items) {
                tracing::error!(error = %e, "failed to persist seed users");
            }
        }
        tracing::debug!(
            count = records.items.len(),
            unreadable = records.unreadable.len(),
            "user directory opened"
        );
        Self {
            store,
            hasher: PasswordHasher,
            users: records.items,
            unreadable: records.unreadable,
        }
    }

    fn load(store: &Store) -> Records<User> {
        store.get_records(keys::USERS).unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to read users");
            Records::default()
        })
    }

    pub fn reload(&mut self) {
        let records = Self::load(&self.store);
        self.users = records.items;
        self.unreadable = records.unreadable;
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: UserId) -> Result<&User, CommerceError> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or(CommerceError::UserNotFound(id))
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.matches_email(email))
    }

    /// Create an account from the sign-up form.
    ///
    /// Name and email are required. Then, in order: the two passwords must
    /// match, the password must be long enough, and the email must not
    /// belong to another account.
    pub fn register(&mut self, form: Registration) -> Result<&User, CommerceError> {
        let name = form.name.trim();
        let email = form.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(CommerceError::Validation(
                "name and email are required".to_string(),
            ));
        }
        if form.password != form.confirm_password {
            return Err(AuthRejection::PasswordMismatch.into());
        }
        PasswordHasher::validate_password(&form.password)?;
        if self.find_by_email(email).is_some() {
            tracing::info!(email, "sign-up refused: email taken");
            return Err(AuthRejection::EmailTaken.into());
        }

        let id = UserId::new(self.users.iter().map(|u| u.id.get()).max().unwrap_or(0) + 1);
        let user = User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(self.hasher.hash(&form.password)?),
            legacy_password: None,
            phone: form.phone,
            address: form.address,
            dob: form.dob,
            gender: form.gender,
        };

        let mut next = self.users.clone();
        next.push(user);
        self.commit(next)?;

        tracing::info!(user_id = %id, "account created");
        let idx = self.users.len() - 1;
        Ok(&self.users[idx])
    }

    /// Check an email and password pair.
    ///
    /// Accounts still holding a plain password are moved to a hash on
    /// their first successful sign-in. If that write fails the sign-in
    /// still succeeds and the upgrade is retried next time.
    pub fn login(&mut self, email: &str, password: &str) -> Result<&User, CommerceError> {
        let Some(idx) = self.users.iter().position(|u| u.matches_email(email)) else {
            return Err(AuthRejection::InvalidCredentials.into());
        };

        let user = &self.users[idx];
        let verified = match (&user.password_hash, &user.legacy_password) {
            (Some(hash), _) => self.hasher.verify(password, hash),
            (None, Some(plain)) => plain == password,
            (None, None) => false,
        };
        if !verified {
            tracing::info!(user_id = %user.id, "sign-in refused");
            return Err(AuthRejection::InvalidCredentials.into());
        }

        if user.password_hash.is_none() {
            self.upgrade_legacy(idx, password);
        }
        tracing::info!(user_id = %self.users[idx].id, "signed in");
        Ok(&self.users[idx])
    }

    fn upgrade_legacy(&mut self, idx: usize, password: &str) {
        let id = self.users[idx].id;
        let hash = match self.hasher.hash(password) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "could not hash legacy password");
                return;
            }
        };
        let mut next = self.users.clone();
        next[idx].password_hash = Some(hash);
        next[idx].legacy_password = None;
        match self.commit(next) {
            Ok(()) => tracing::info!(user_id = %id, "legacy password replaced by hash"),
            Err(e) => tracing::warn!(user_id = %id, error = %e, "legacy password kept"),
        }
    }

    /// Edit profile fields. A new email must not belong to another account.
    pub fn update_profile(
        &mut self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<&User, CommerceError> {
        let idx = self.index_of(id)?;
        let mut user = self.users[idx].clone();
        update.apply_to(&mut user);
        if user.name.trim().is_empty() || user.email.trim().is_empty() {
            return Err(CommerceError::Validation(
                "name and email are required".to_string(),
            ));
        }
        if self
            .users
            .iter()
            .any(|u| u.id != id && u.matches_email(&user.email))
        {
            return Err(AuthRejection::EmailTaken.into());
        }

        let mut next = self.users.clone();
        next[idx] = user;
        self.commit(next)?;

        tracing::info!(user_id = %id, "profile updated");
        Ok(&self.users[idx])
    }

    /// Remove an account. Orders placed by it are kept.
    pub fn delete_user(&mut self, id: UserId) -> Result<User, CommerceError> {
        let idx = self.index_of(id)?;
        let mut next = self.users.clone();
        let removed = next.remove(idx);
        self.commit(next)?;

        tracing::info!(user_id = %id, "account deleted");
        Ok(removed)
    }

    fn index_of(&self, id: UserId) -> Result<usize, CommerceError> {
        self.users
            .iter()
            .position(|u| u.id == id)
            .ok_or(CommerceError::UserNotFound(id))
    }

    fn commit(&mut self, next: Vec<User>) -> Result<(), CommerceError> {
        if let Err(e) = self.store.set_records(keys::USERS, &next, &self.unreadable) {
            tracing::error!(error = %e, "failed to persist users");
            return Err(e.into());
        }
        self.users = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::QuotaBackend;

    fn directory() -> UserDirectory {
        UserDirectory::open(Store::in_memory(), true)
    }

    fn form(email: &str, password: &str, confirm: &str) -> Registration {
        Registration {
            name: "Kavya Iyer".into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
            phone: "9845012345".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_seeds_demo_accounts() {
        let directory = directory();
        assert_eq!(directory.users().len(), 2);
        assert!(directory.find_by_email("jane@example.com").is_some());
    }

    #[test]
    fn test_register_then_login() {
        let store = Store::in_memory();
        let mut directory = UserDirectory::open(store.clone(), true);
        let user = directory
            .register(form("kavya@example.com", "paracetamol", "paracetamol"))
            .unwrap();
        assert_eq!(user.id, UserId::new(3));
        assert!(user.password_hash.is_some());

        let mut reopened = UserDirectory::open(store, true);
        let user = reopened.login("Kavya@Example.com", "paracetamol").unwrap();
        assert_eq!(user.name, "Kavya Iyer");
    }

    #[test]
    fn test_register_checks_in_order() {
        let mut directory = directory();
        let rejection = |err: CommerceError| match err {
            CommerceError::AuthRejected(r) => r,
            other => panic!("unexpected error: {other}"),
        };

        let err = directory.register(form("john@example.com", "abc", "xyz")).unwrap_err();
        assert_eq!(rejection(err), AuthRejection::PasswordMismatch);

        let err = directory.register(form("john@example.com", "abc", "abc")).unwrap_err();
        assert_eq!(rejection(err), AuthRejection::WeakPassword);

        let err = directory
            .register(form(" JOHN@example.com", "abcdef", "abcdef"))
            .unwrap_err();
        assert_eq!(err.to_string(), "User with this email already exists");
        assert_eq!(directory.users().len(), 2);
    }

    #[test]
    fn test_register_requires_name() {
        let mut registration = form("new@example.com", "abcdef", "abcdef");
        registration.name = "  ".into();
        let err = directory().register(registration).unwrap_err();
        assert!(matches!(err, CommerceError::Validation(_)));
    }

    #[test]
    fn test_login_failures_share_a_message() {
        let mut directory = directory();
        directory
            .register(form("kavya@example.com", "paracetamol", "paracetamol"))
            .unwrap();

        for (email, password) in [
            ("kavya@example.com", "ibuprofen"),
            ("nobody@example.com", "paracetamol"),
            // Demo accounts have no password.
            ("john@example.com", ""),
        ] {
            let err = directory.login(email, password).unwrap_err();
            assert_eq!(err.to_string(), "Invalid email or password");
        }
    }

    #[test]
    fn test_plain_password_upgraded_on_login() {
        let store = Store::in_memory();
        store
            .set(
                keys::USERS,
                &serde_json::json!([{
                    "id": 8,
                    "name": "Rohit",
                    "email": "rohit@example.com",
                    "password": "insulin1",
                }]),
            )
            .unwrap();

        let mut directory = UserDirectory::open(store.clone(), true);
        assert_eq!(directory.users().len(), 1);
        directory.login("rohit@example.com", "insulin1").unwrap();

        let raw: Vec<Value> = store.get(keys::USERS).unwrap().unwrap();
        assert!(raw[0].get("password").is_none());
        assert!(raw[0]["passwordHash"]
            .as_str()
            .unwrap()
            .starts_with("$argon2id$"));

        let mut reopened = UserDirectory::open(store, true);
        assert!(reopened.login("rohit@example.com", "insulin1").is_ok());
        assert!(reopened.login("rohit@example.com", "insulin2").is_err());
    }

    #[test]
    fn test_update_profile_rejects_taken_email() {
        let mut directory = directory();
        let err = directory
            .update_profile(
                UserId::new(1),
                ProfileUpdate {
                    email: Some("jane@example.com".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CommerceError::AuthRejected(AuthRejection::EmailTaken)));

        let user = directory
            .update_profile(
                UserId::new(1),
                ProfileUpdate {
                    address: Some("7 Residency Road".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(user.address, "7 Residency Road");
    }

    #[test]
    fn test_delete_user() {
        let store = Store::in_memory();
        let mut directory = UserDirectory::open(store.clone(), true);
        let removed = directory.delete_user(UserId::new(1)).unwrap();
        assert_eq!(removed.name, "John Doe");
        assert!(matches!(
            directory.delete_user(UserId::new(1)),
            Err(CommerceError::UserNotFound(_))
        ));

        let reopened = UserDirectory::open(store, true);
        assert_eq!(reopened.users().len(), 1);
    }

    #[test]
    fn test_reload_sees_other_handle() {
        let store = Store::in_memory();
        let mut signup = UserDirectory::open(store.clone(), true);
        let mut admin = UserDirectory::open(store, true);
        signup
            .register(form("kavya@example.com", "paracetamol", "paracetamol"))
            .unwrap();

        assert!(admin.find_by_email("kavya@example.com").is_none());
        admin.reload();
        assert!(admin.find_by_email("kavya@example.com").is_some());
    }

    #[test]
    fn test_failed_write_keeps_accounts() {
        let backend = QuotaBackend::new();
        let mut directory = UserDirectory::open(backend.store(), true);
        backend.fill();

        let err = directory
            .register(form("kavya@example.com", "paracetamol", "paracetamol"))
            .unwrap_err();
        assert!(matches!(err, CommerceError::Persistence(_)));
        assert_eq!(directory.users().len(), 2);
        assert!(directory.delete_user(UserId::new(2)).is_err());
        assert!(directory.get(UserId::new(2)).is_ok());
    }
}
