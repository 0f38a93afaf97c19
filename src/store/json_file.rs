//! Implements a payment and credential store backed by a single JSON document on disk.
//!
//! The document has two top-level keys, `rentTracker_transactions` and
//! `rentTracker_credentials`. Every mutation rewrites the whole file by writing
//! a temporary sibling file and renaming it over the original.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::PasswordHash,
    payment::{NewPayment, Payment, PaymentId, sort_newest_first},
    store::{CredentialStore, Credentials, PaymentStore},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DataFile {
    #[serde(rename = "rentTracker_transactions", default)]
    transactions: Vec<Payment>,
    #[serde(rename = "rentTracker_credentials", default)]
    credentials: Option<StoredCredentials>,
    /// The ID for the next created payment. Files written before this key
    /// existed fall back to one past the largest stored ID.
    #[serde(rename = "rentTracker_nextId", default)]
    next_id: Option<PaymentId>,
}

impl DataFile {
    /// Reserve an ID that no payment has used, including deleted ones.
    fn allocate_id(&mut self) -> PaymentId {
        let after_largest = self
            .transactions
            .iter()
            .map(|payment| payment.id)
            .max()
            .unwrap_or(0)
            + 1;
        let id = match self.next_id {
            Some(next) => next.max(after_largest),
            None => after_largest,
        };
        self.next_id = Some(id + 1);

        id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredentials {
    username: String,
    password: PasswordHash,
}

/// Stores payments and credentials in a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<DataFile>,
}

impl JsonFileStore {
    /// Load the store from `path`.
    ///
    /// A missing file is treated as an empty store and is created on the first write.
    ///
    /// # Errors
    /// Returns an [Error::DataFileError] if the file exists but cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        } else {
            tracing::info!("No data file at {}, starting empty", path.display());
            DataFile::default()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, DataFile>, Error> {
        self.data.lock().map_err(|_| Error::DatabaseLockError)
    }

    /// Apply `change` to a copy of the document, persist the copy and only then
    /// make it the current state. A failed change or write leaves the store untouched.
    fn modify<T>(
        &self,
        change: impl FnOnce(&mut DataFile) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let mut data = self.lock()?;
        let mut updated = data.clone();

        let result = change(&mut updated)?;
        write_atomically(&self.path, &updated)?;
        *data = updated;

        Ok(result)
    }
}

fn write_atomically(path: &Path, data: &DataFile) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| Error::DataFileError(format!("invalid data file path {}", path.display())))?;
    let temp_path = path.with_file_name(format!("{file_name}.tmp"));

    fs::write(&temp_path, serde_json::to_string_pretty(data)?)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

impl PaymentStore for JsonFileStore {
    fn list(&self) -> Result<Vec<Payment>, Error> {
        let mut payments = self.lock()?.transactions.clone();
        sort_newest_first(&mut payments);

        Ok(payments)
    }

    fn create(&self, payment: NewPayment) -> Result<Payment, Error> {
        self.modify(|data| {
            let payment = payment.with_id(data.allocate_id());
            data.transactions.push(payment.clone());

            Ok(payment)
        })
    }

    fn get(&self, id: PaymentId) -> Result<Payment, Error> {
        self.lock()?
            .transactions
            .iter()
            .find(|payment| payment.id == id)
            .cloned()
            .ok_or(Error::NotFound)
    }

    fn update(&self, payment: Payment) -> Result<(), Error> {
        self.modify(|data| {
            let stored = data
                .transactions
                .iter_mut()
                .find(|stored| stored.id == payment.id)
                .ok_or(Error::UpdateMissingPayment)?;
            *stored = payment;

            Ok(())
        })
    }

    fn delete(&self, id: PaymentId) -> Result<(), Error> {
        self.modify(|data| {
            let index = data
                .transactions
                .iter()
                .position(|payment| payment.id == id)
                .ok_or(Error::DeleteMissingPayment)?;
            data.transactions.remove(index);

            Ok(())
        })
    }
}

impl CredentialStore for JsonFileStore {
    fn get_credentials(&self) -> Result<Option<Credentials>, Error> {
        Ok(self
            .lock()?
            .credentials
            .clone()
            .map(|stored| Credentials {
                username: stored.username,
                password_hash: stored.password,
            }))
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Error> {
        self.modify(|data| {
            data.credentials = Some(StoredCredentials {
                username: credentials.username.clone(),
                password: credentials.password_hash.clone(),
            });

            Ok(())
        })
    }
}
