//! Rent payments: the data model, the form, the list, the summary cards and the CSV export.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod export;
mod form;
mod summary;
mod table;

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{AppState, store::PaymentStore};

pub use core::{NewPayment, Payment, PaymentId, PaymentMethod, sort_newest_first};
pub use create_endpoint::create_payment_endpoint;
pub use delete_endpoint::delete_payment_endpoint;
pub use edit_endpoint::edit_payment_endpoint;
pub use export::export_payments_endpoint;
pub use form::{PaymentForm, PaymentFormDefaults, month_label, month_options, payment_form};
pub use summary::PaymentSummary;
pub use table::payment_table;

/// The state needed by the payment pages and endpoints.
#[derive(Clone)]
pub struct PaymentState {
    /// Where payments are kept.
    pub payment_store: Arc<dyn PaymentStore>,
    /// The customer names offered in the payment form.
    pub customers: Arc<Vec<String>>,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Kigali".
    pub local_timezone: String,
}

impl FromRef<AppState> for PaymentState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            payment_store: state.payment_store.clone(),
            customers: state.customers.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use std::sync::Arc;

    use rusqlite::Connection;

    use crate::store::SqliteStore;

    use super::PaymentState;

    pub fn get_test_state() -> (PaymentState, Arc<SqliteStore>) {
        let store = Arc::new(
            SqliteStore::new(Connection::open_in_memory().unwrap())
                .expect("could not create test store"),
        );

        let state = PaymentState {
            payment_store: store.clone(),
            customers: Arc::new(vec!["John Smith".to_owned(), "Mary Johnson".to_owned()]),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, store)
    }
}
