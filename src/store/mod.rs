//! Storage traits for payments and credentials, and their two backends.
//!
//! The server picks one backend at start-up. Both backends serialise access
//! with a mutex, so the last write wins.

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

use crate::{
    Error,
    auth::PasswordHash,
    payment::{NewPayment, Payment, PaymentId},
};

/// Handles the creation, retrieval, update and deletion of payments.
pub trait PaymentStore: Send + Sync {
    /// All payments, newest payment date first with ties broken by the larger ID first.
    fn list(&self) -> Result<Vec<Payment>, Error>;

    /// Save `payment` and assign it a new, unique ID.
    fn create(&self, payment: NewPayment) -> Result<Payment, Error>;

    /// Retrieve a payment by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no payment with `id`.
    fn get(&self, id: PaymentId) -> Result<Payment, Error>;

    /// Replace every field of the stored payment with the same ID as `payment`.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingPayment] if there is no payment with that ID.
    fn update(&self, payment: Payment) -> Result<(), Error>;

    /// Remove the payment with `id`.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingPayment] if there is no payment with `id`.
    fn delete(&self, id: PaymentId) -> Result<(), Error>;
}

/// The single username and password pair that guards the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    /// The household's username.
    pub username: String,
    /// The bcrypt hash of the password.
    pub password_hash: PasswordHash,
}

/// Holds the household's credentials.
pub trait CredentialStore: Send + Sync {
    /// The stored credentials, `None` before they have been seeded.
    fn get_credentials(&self) -> Result<Option<Credentials>, Error>;

    /// Create or replace the stored credentials.
    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Error>;

    /// Replace the stored password hash, keeping the username.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no credentials have been saved.
    fn set_password_hash(&self, password_hash: &PasswordHash) -> Result<(), Error> {
        let mut credentials = self.get_credentials()?.ok_or(Error::NotFound)?;
        credentials.password_hash = password_hash.clone();
        self.save_credentials(&credentials)
    }
}
