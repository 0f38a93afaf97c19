//! Defines the core data models for rent payments.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The store-assigned identifier of a payment.
pub type PaymentId = i64;

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid in cash, no reference number.
    Cash,
    /// Paid with mobile money, usually with a provider transaction reference.
    MobileMoney,
}

impl PaymentMethod {
    /// All payment methods in display order.
    pub const ALL: [PaymentMethod; 2] = [PaymentMethod::Cash, PaymentMethod::MobileMoney];

    /// The stored form of the method, e.g. "mobilemoney".
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::MobileMoney => "mobilemoney",
        }
    }

    /// The human readable form of the method, e.g. "Mobile Money".
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::MobileMoney => "Mobile Money",
        }
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cash" => Ok(PaymentMethod::Cash),
            "mobilemoney" => Ok(PaymentMethod::MobileMoney),
            other => Err(Error::InvalidPaymentMethod(other.to_owned())),
        }
    }
}

/// A rent payment that has not been saved yet.
///
/// To create a new `NewPayment`, use [NewPayment::build].
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    /// Who paid.
    pub customer_name: String,
    /// When the money was received.
    pub payment_date: Date,
    /// The rental period covered, e.g. "March 2025".
    pub month_paid_for: String,
    /// How the money was received.
    pub payment_method: PaymentMethod,
    /// The amount received, never negative.
    pub amount: f64,
    momo_transaction_id: Option<String>,
}

impl NewPayment {
    /// Create a payment without a mobile money reference.
    ///
    /// Use [NewPayment::momo_transaction_id] to attach one.
    pub fn build(
        customer_name: &str,
        payment_date: Date,
        month_paid_for: &str,
        payment_method: PaymentMethod,
        amount: f64,
    ) -> Self {
        Self {
            customer_name: customer_name.to_owned(),
            payment_date,
            month_paid_for: month_paid_for.to_owned(),
            payment_method,
            amount,
            momo_transaction_id: None,
        }
    }

    /// Set the mobile money reference.
    ///
    /// The reference is discarded for cash payments and when it is blank.
    pub fn momo_transaction_id(mut self, momo_transaction_id: Option<String>) -> Self {
        self.momo_transaction_id = match self.payment_method {
            PaymentMethod::Cash => None,
            PaymentMethod::MobileMoney => momo_transaction_id
                .map(|id| id.trim().to_owned())
                .filter(|id| !id.is_empty()),
        };
        self
    }

    /// The mobile money reference, always `None` for cash payments.
    pub fn get_momo_transaction_id(&self) -> Option<&str> {
        self.momo_transaction_id.as_deref()
    }

    /// Attach the store-assigned `id`.
    pub fn with_id(self, id: PaymentId) -> Payment {
        Payment {
            id,
            customer_name: self.customer_name,
            payment_date: self.payment_date,
            month_paid_for: self.month_paid_for,
            payment_method: self.payment_method,
            amount: self.amount,
            momo_transaction_id: self.momo_transaction_id,
        }
    }
}

/// A rent payment that has been saved in a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PaymentRecord")]
pub struct Payment {
    /// The ID assigned by the store.
    pub id: PaymentId,
    /// Who paid.
    pub customer_name: String,
    /// When the money was received.
    #[serde(with = "iso_date")]
    pub payment_date: Date,
    /// The rental period covered, e.g. "March 2025".
    pub month_paid_for: String,
    /// How the money was received.
    pub payment_method: PaymentMethod,
    /// The amount received, never negative.
    pub amount: f64,
    momo_transaction_id: Option<String>,
}

impl Payment {
    /// The mobile money reference, always `None` for cash payments.
    pub fn momo_transaction_id(&self) -> Option<&str> {
        self.momo_transaction_id.as_deref()
    }

    /// Split off the ID, e.g. to re-validate the fields through [NewPayment::momo_transaction_id].
    pub fn into_new(self) -> (PaymentId, NewPayment) {
        (
            self.id,
            NewPayment {
                customer_name: self.customer_name,
                payment_date: self.payment_date,
                month_paid_for: self.month_paid_for,
                payment_method: self.payment_method,
                amount: self.amount,
                momo_transaction_id: self.momo_transaction_id,
            },
        )
    }
}

/// The on-disk shape of a [Payment].
///
/// Routing deserialization through [NewPayment::momo_transaction_id] means a
/// hand-edited data file cannot produce a cash payment with a reference.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRecord {
    id: PaymentId,
    customer_name: String,
    #[serde(with = "iso_date")]
    payment_date: Date,
    month_paid_for: String,
    payment_method: PaymentMethod,
    amount: f64,
    #[serde(default)]
    momo_transaction_id: Option<String>,
}

impl From<PaymentRecord> for Payment {
    fn from(record: PaymentRecord) -> Self {
        NewPayment::build(
            &record.customer_name,
            record.payment_date,
            &record.month_paid_for,
            record.payment_method,
            record.amount,
        )
        .momo_transaction_id(record.momo_transaction_id)
        .with_id(record.id)
    }
}

/// Sort `payments` newest first, ties broken by the larger ID first.
pub fn sort_newest_first(payments: &mut [Payment]) {
    payments.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| b.id.cmp(&a.id))
    });
}

pub(crate) mod iso_date {
    //! Serializes a [time::Date] as "YYYY-MM-DD".
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

    pub const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Date::parse(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
