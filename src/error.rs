//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerError, no_data_page},
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username and password did not match the stored credentials.
    ///
    /// Deliberately does not say which of the two was wrong.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The new password is shorter than [crate::MIN_PASSWORD_LENGTH] characters.
    #[error("password must be at least {0} characters long")]
    PasswordTooShort(usize),

    /// The new password and its confirmation differ.
    #[error("the new password and confirmation do not match")]
    PasswordMismatch,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth token cookie could not be parsed or its expiry could not be
    /// formatted.
    #[error("invalid auth token: {0}")]
    InvalidToken(String),

    /// The auth token has passed its expiry time.
    #[error("the auth token has expired")]
    ExpiredToken,

    /// A required payment form field was left blank.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// The amount could not be parsed as a number from zero to one billion.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// The payment date is not an ISO 8601 calendar date.
    #[error("\"{0}\" is not a valid date")]
    InvalidDate(String),

    /// The payment method is neither cash nor mobile money.
    #[error("\"{0}\" is not a valid payment method")]
    InvalidPaymentMethod(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The JSON data file could not be read, parsed or written.
    #[error("data file error: {0}")]
    DataFileError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a payment that does not exist
    #[error("tried to update a payment that is not in the store")]
    UpdateMissingPayment,

    /// Tried to delete a payment that does not exist
    #[error("tried to delete a payment that is not in the store")]
    DeleteMissingPayment,

    /// Tried to export an empty set of payments.
    #[error("no transactions to export")]
    NoDataToExport,

    /// The CSV writer failed while producing an export.
    #[error("could not export payments: {0}")]
    ExportFailed(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::DataFileError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::DataFileError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::NoDataToExport => no_data_page().into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing field".to_owned(),
                    details: format!("Please fill in the {field} before saving the payment."),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "\"{amount}\" is not a valid amount. \
                        Enter a number from zero to 1,000,000,000."
                    ),
                },
            ),
            Error::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid payment date".to_owned(),
                    details: format!(
                        "\"{date}\" is not a valid date. Pick a date from the calendar."
                    ),
                },
            ),
            Error::InvalidPaymentMethod(method) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid payment method".to_owned(),
                    details: format!(
                        "\"{method}\" is not a payment method. Choose cash or mobile money."
                    ),
                },
            ),
            Error::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid password".to_owned(),
                    details: "Current password is incorrect.".to_owned(),
                },
            ),
            Error::PasswordTooShort(min_length) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Password too short".to_owned(),
                    details: format!("Password must be at least {min_length} characters long."),
                },
            ),
            Error::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Password mismatch".to_owned(),
                    details: "New password and confirmation do not match.".to_owned(),
                },
            ),
            Error::UpdateMissingPayment => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update payment".to_owned(),
                    details: "The payment could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingPayment => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete payment".to_owned(),
                    details: "The payment could not be found. \
                    Try refreshing the page to see if the payment has already been deleted."
                        .to_owned(),
                },
            ),
            Error::NoDataToExport => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No Data".to_owned(),
                    details: "No transactions to export.".to_owned(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
