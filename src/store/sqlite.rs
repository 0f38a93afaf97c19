//! Implements a SQLite backed payment and credential store.
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{
    Connection, Row, Transaction, TransactionBehavior,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};

use crate::{
    Error,
    auth::PasswordHash,
    payment::{NewPayment, Payment, PaymentId, PaymentMethod},
    store::{CredentialStore, Credentials, PaymentStore},
};

/// Stores payments and credentials in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Create a new store for the SQLite `connection`, creating the tables if needed.
    ///
    /// # Errors
    /// Returns an [Error::SqlError] if the tables cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

/// Create the payment and credential tables in a single exclusive transaction.
fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_payment_table(&transaction)?;
    create_credential_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn create_payment_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customername TEXT NOT NULL,
                paymentdate TEXT NOT NULL,
                monthpaidfor TEXT NOT NULL,
                paymentmethod TEXT NOT NULL CHECK (paymentmethod IN ('cash', 'mobilemoney')),
                amount REAL NOT NULL CHECK (amount >= 0),
                momotransactionid TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_payment_date ON payment(paymentdate);",
        (),
    )?;

    Ok(())
}

fn create_credential_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    // There is only ever one row.
    connection.execute(
        "CREATE TABLE IF NOT EXISTS credential (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                username TEXT NOT NULL,
                password TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_payment_row(row: &Row) -> Result<Payment, rusqlite::Error> {
    let id = row.get(0)?;
    let customer_name: String = row.get(1)?;
    let payment_date = row.get(2)?;
    let month_paid_for: String = row.get(3)?;
    let payment_method = row.get(4)?;
    let amount = row.get(5)?;
    let momo_transaction_id = row.get(6)?;

    Ok(NewPayment::build(
        &customer_name,
        payment_date,
        &month_paid_for,
        payment_method,
        amount,
    )
    .momo_transaction_id(momo_transaction_id)
    .with_id(id))
}

impl ToSql for PaymentMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for PaymentMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

impl PaymentStore for SqliteStore {
    fn list(&self) -> Result<Vec<Payment>, Error> {
        let connection = self.lock()?;

        let payments = connection
            .prepare(
                "SELECT id, customername, paymentdate, monthpaidfor, paymentmethod, amount, momotransactionid
                 FROM payment
                 ORDER BY paymentdate DESC, id DESC",
            )?
            .query_map([], map_payment_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(payments)
    }

    fn create(&self, payment: NewPayment) -> Result<Payment, Error> {
        let connection = self.lock()?;

        let payment = connection
            .prepare(
                "INSERT INTO payment (customername, paymentdate, monthpaidfor, paymentmethod, amount, momotransactionid)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, customername, paymentdate, monthpaidfor, paymentmethod, amount, momotransactionid",
            )?
            .query_row(
                (
                    &payment.customer_name,
                    payment.payment_date,
                    &payment.month_paid_for,
                    payment.payment_method,
                    payment.amount,
                    payment.get_momo_transaction_id(),
                ),
                map_payment_row,
            )?;

        Ok(payment)
    }

    fn get(&self, id: PaymentId) -> Result<Payment, Error> {
        let connection = self.lock()?;

        let payment = connection
            .prepare(
                "SELECT id, customername, paymentdate, monthpaidfor, paymentmethod, amount, momotransactionid
                 FROM payment WHERE id = :id",
            )?
            .query_one(&[(":id", &id)], map_payment_row)?;

        Ok(payment)
    }

    fn update(&self, payment: Payment) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute(
            "UPDATE payment
             SET customername = ?1, paymentdate = ?2, monthpaidfor = ?3,
                 paymentmethod = ?4, amount = ?5, momotransactionid = ?6
             WHERE id = ?7",
            (
                &payment.customer_name,
                payment.payment_date,
                &payment.month_paid_for,
                payment.payment_method,
                payment.amount,
                payment.momo_transaction_id(),
                payment.id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingPayment);
        }

        Ok(())
    }

    fn delete(&self, id: PaymentId) -> Result<(), Error> {
        let connection = self.lock()?;

        let rows_affected = connection.execute("DELETE FROM payment WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingPayment);
        }

        Ok(())
    }
}

impl CredentialStore for SqliteStore {
    fn get_credentials(&self) -> Result<Option<Credentials>, Error> {
        let connection = self.lock()?;

        let result = connection.query_row(
            "SELECT username, password FROM credential WHERE id = 1",
            [],
            |row| {
                let username = row.get(0)?;
                let password_hash: String = row.get(1)?;

                Ok(Credentials {
                    username,
                    password_hash: PasswordHash::new_unchecked(&password_hash),
                })
            },
        );

        match result {
            Ok(credentials) => Ok(Some(credentials)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn save_credentials(&self, credentials: &Credentials) -> Result<(), Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO credential (id, username, password) VALUES (1, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET username = excluded.username, password = excluded.password",
            (&credentials.username, credentials.password_hash.to_string()),
        )?;

        Ok(())
    }
}
