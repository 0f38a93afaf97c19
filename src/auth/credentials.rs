//! Operations on the household's single username and password pair.

use crate::{
    Error,
    auth::{PasswordHash, ValidatedPassword},
    store::{CredentialStore, Credentials},
};

/// The username used before anyone changes it.
pub const DEFAULT_USERNAME: &str = "family";
/// The password used before anyone changes it.
pub const DEFAULT_PASSWORD: &str = "rent2024";

/// Seed the default credentials if the store has none.
///
/// Existing credentials are left untouched.
///
/// # Errors
/// Returns an error if the store cannot be read or written, or the default password cannot be hashed.
pub fn ensure_default_credentials(store: &dyn CredentialStore, cost: u32) -> Result<(), Error> {
    if store.get_credentials()?.is_some() {
        return Ok(());
    }

    tracing::info!("No credentials found, creating the default credentials");
    let password_hash =
        PasswordHash::new(ValidatedPassword::new_unchecked(DEFAULT_PASSWORD), cost)?;

    store.save_credentials(&Credentials {
        username: DEFAULT_USERNAME.to_owned(),
        password_hash,
    })
}

/// Check `username` and `password` against the stored credentials.
///
/// Falls back to the default credentials if none have been saved yet.
/// Returns `false` for a wrong username or a wrong password without saying which.
pub fn log_in(store: &dyn CredentialStore, username: &str, password: &str) -> Result<bool, Error> {
    match store.get_credentials()? {
        Some(credentials) => {
            Ok(username == credentials.username && credentials.password_hash.verify(password)?)
        }
        None => Ok(username == DEFAULT_USERNAME && password == DEFAULT_PASSWORD),
    }
}

/// Replace the stored password with `new_password` if `current_password` is correct.
///
/// Returns `false`, leaving the store unchanged, if `current_password` is wrong.
pub fn change_password(
    store: &dyn CredentialStore,
    current_password: &str,
    new_password: ValidatedPassword,
    cost: u32,
) -> Result<bool, Error> {
    let username = match store.get_credentials()? {
        Some(credentials) => {
            if !credentials.password_hash.verify(current_password)? {
                return Ok(false);
            }

            credentials.username
        }
        None if current_password == DEFAULT_PASSWORD => DEFAULT_USERNAME.to_owned(),
        None => return Ok(false),
    };

    let password_hash = PasswordHash::new(new_password, cost)?;
    store.save_credentials(&Credentials {
        username,
        password_hash,
    })?;
    tracing::info!("Password changed");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, ValidatedPassword},
        store::{CredentialStore, SqliteStore},
    };

    use super::{change_password, ensure_default_credentials, log_in};

    fn get_store() -> SqliteStore {
        SqliteStore::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    fn get_seeded_store() -> SqliteStore {
        let store = get_store();
        ensure_default_credentials(&store, 4).unwrap();
        store
    }

    #[test]
    fn log_in_succeeds_with_defaults() {
        let store = get_seeded_store();

        assert_eq!(log_in(&store, "family", "rent2024"), Ok(true));
    }

    #[test]
    fn log_in_fails_with_wrong_password() {
        let store = get_seeded_store();

        assert_eq!(log_in(&store, "family", "wrong"), Ok(false));
    }

    #[test]
    fn log_in_fails_with_wrong_username() {
        let store = get_seeded_store();

        assert_eq!(log_in(&store, "someone", "rent2024"), Ok(false));
    }

    #[test]
    fn log_in_falls_back_to_defaults_on_empty_store() {
        let store = get_store();

        assert_eq!(log_in(&store, "family", "rent2024"), Ok(true));
        assert_eq!(log_in(&store, "family", "rent2025"), Ok(false));
    }

    #[test]
    fn ensure_default_credentials_keeps_existing_password() {
        let store = get_seeded_store();
        change_password(
            &store,
            "rent2024",
            ValidatedPassword::new_unchecked("newpass1"),
            4,
        )
        .unwrap();

        ensure_default_credentials(&store, 4).unwrap();

        assert_eq!(log_in(&store, "family", "newpass1"), Ok(true));
    }

    #[test]
    fn only_new_password_works_after_change() {
        let store = get_seeded_store();

        let changed = change_password(
            &store,
            "rent2024",
            ValidatedPassword::new_unchecked("newpass1"),
            4,
        );

        assert_eq!(changed, Ok(true));
        assert_eq!(log_in(&store, "family", "newpass1"), Ok(true));
        assert_eq!(log_in(&store, "family", "rent2024"), Ok(false));
    }

    #[test]
    fn change_password_fails_with_wrong_current_password() {
        let store = get_seeded_store();
        let before = store.get_credentials().unwrap();

        let changed = change_password(
            &store,
            "wrong",
            ValidatedPassword::new_unchecked("newpass1"),
            4,
        );

        assert_eq!(changed, Ok(false));
        assert_eq!(store.get_credentials().unwrap(), before);
    }

    #[test]
    fn stored_password_is_hashed() {
        let store = get_seeded_store();

        let credentials = store.get_credentials().unwrap().unwrap();

        assert_ne!(credentials.password_hash, PasswordHash::new_unchecked("rent2024"));
        assert_eq!(credentials.password_hash.verify("rent2024"), Ok(true));
    }
}
