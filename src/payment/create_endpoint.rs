//! Defines the endpoint for recording a new payment.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    dashboard::{DashboardTab, dashboard_url},
    payment::{PaymentForm, PaymentState},
};

/// A route handler for recording a new payment, redirects to a fresh payment form on success.
pub async fn create_payment_endpoint(
    State(state): State<PaymentState>,
    Form(form): Form<PaymentForm>,
) -> Response {
    let intent = match form.into_intent(None) {
        Ok(intent) => intent,
        Err(error) => {
            tracing::debug!("rejected payment form: {error}");
            return error.into_alert_response();
        }
    };

    match intent.apply(state.payment_store.as_ref()) {
        Ok(payment) => tracing::info!(
            "recorded payment {} from {} for {}",
            payment.id,
            payment.customer_name,
            payment.month_paid_for
        ),
        Err(error) => {
            tracing::error!("could not create payment: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(dashboard_url(DashboardTab::AddPayment, None)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
