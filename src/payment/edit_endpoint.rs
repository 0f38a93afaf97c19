use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    dashboard::{DashboardTab, dashboard_url},
    payment::{PaymentForm, PaymentId, PaymentState},
};

/// A route handler for replacing the fields of a payment, redirects to the payment list on success.
pub async fn edit_payment_endpoint(
    State(state): State<PaymentState>,
    Path(payment_id): Path<PaymentId>,
    Form(form): Form<PaymentForm>,
) -> Response {
    let intent = match form.into_intent(Some(payment_id)) {
        Ok(intent) => intent,
        Err(error) => {
            tracing::debug!("rejected payment form for payment {payment_id}: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = intent.apply(state.payment_store.as_ref()) {
        tracing::error!("Could not update payment {payment_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(dashboard_url(DashboardTab::Payments, None)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
