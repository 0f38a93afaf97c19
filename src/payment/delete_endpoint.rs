use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    dashboard::{DashboardTab, dashboard_url},
    payment::{PaymentId, PaymentState},
};

/// A route handler for deleting a payment, reloads the payment list on success.
pub async fn delete_payment_endpoint(
    State(state): State<PaymentState>,
    Path(payment_id): Path<PaymentId>,
) -> Response {
    match state.payment_store.delete(payment_id) {
        // The status code has to be 200 OK or HTMX will not follow the redirect.
        Ok(()) => (
            HxRedirect(dashboard_url(DashboardTab::Payments, None)),
            StatusCode::OK,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not delete payment {payment_id}: {error}");
            error.into_alert_response()
        }
    }
}
