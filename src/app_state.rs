//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_COOKIE_DURATION, PasswordHash, ensure_default_credentials},
    store::{CredentialStore, PaymentStore},
    timezone::get_local_offset,
};

/// The customers offered in the payment form when none are configured.
pub const DEFAULT_CUSTOMERS: [&str; 5] = [
    "John Smith",
    "Mary Johnson",
    "David Brown",
    "Sarah Wilson",
    "Michael Davis",
];

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Africa/Kigali".
    pub local_timezone: String,

    /// The bcrypt cost used when the password is changed.
    pub password_cost: u32,

    /// The customer names offered in the payment form.
    pub customers: Arc<Vec<String>>,

    /// Where payments are kept.
    pub payment_store: Arc<dyn PaymentStore>,

    /// Where the household's credentials are kept.
    pub credential_store: Arc<dyn CredentialStore>,
}

impl AppState {
    /// Create a new [AppState] around `store`, which holds both payments and credentials.
    ///
    /// Seeds the default credentials if the store has none. `local_timezone`
    /// should be a valid, canonical timezone name, e.g. "Africa/Kigali".
    /// An empty `customers` list falls back to [DEFAULT_CUSTOMERS].
    ///
    /// # Errors
    /// Returns an [Error::InvalidTimezoneError] for an unknown timezone, or
    /// an error if the credentials cannot be read or seeded.
    pub fn new<S>(
        store: Arc<S>,
        cookie_secret: &str,
        local_timezone: &str,
        customers: Vec<String>,
        password_cost: u32,
    ) -> Result<Self, Error>
    where
        S: PaymentStore + CredentialStore + 'static,
    {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        ensure_default_credentials(store.as_ref(), password_cost)?;

        let customers = if customers.is_empty() {
            DEFAULT_CUSTOMERS.iter().map(|name| name.to_string()).collect()
        } else {
            customers
        };

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            password_cost,
            customers: Arc::new(customers),
            payment_store: store.clone(),
            credential_store: store,
        })
    }
}

/// The default cost for hashing passwords.
pub const DEFAULT_PASSWORD_COST: u32 = PasswordHash::DEFAULT_COST;

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
