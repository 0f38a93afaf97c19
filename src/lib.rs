//! Rent Tracker is a small web app for a household that lets tenants' rent
//! payments be recorded, reviewed, corrected and exported.
//!
//! This library provides a REST API that directly serves HTML pages. Payments
//! and the household's credentials are kept in either a SQLite database or a
//! JSON data file.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod dashboard;
mod endpoints;
mod error;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod payment;
mod routing;
mod store;
mod timezone;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_CUSTOMERS, DEFAULT_PASSWORD_COST};
pub use auth::{
    DEFAULT_PASSWORD, DEFAULT_USERNAME, PasswordHash, ValidatedPassword, ensure_default_credentials,
};
pub use error::Error;
pub use logging::logging_middleware;
pub use payment::{NewPayment, Payment, PaymentId, PaymentMethod, month_label};
pub use routing::build_router;
pub use store::{CredentialStore, Credentials, JsonFileStore, PaymentStore, SqliteStore};

/// The minimum number of characters a password must have.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
