//! The page and endpoint for changing the household password.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, MIN_PASSWORD_LENGTH,
    alert::Alert,
    auth::{ValidatedPassword, credentials},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, base, loading_spinner, password_input,
    },
    navigation::NavBar,
    store::CredentialStore,
};

/// The state needed to change the password.
#[derive(Clone)]
pub struct PasswordState {
    /// Where the household's credentials live.
    pub credential_store: Arc<dyn CredentialStore>,
    /// The bcrypt cost used to hash the new password.
    pub password_cost: u32,
}

impl FromRef<AppState> for PasswordState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            credential_store: state.credential_store.clone(),
            password_cost: state.password_cost,
        }
    }
}

fn change_password_form() -> Markup {
    html! {
        form
            id="password-form"
            hx-post=(endpoints::PASSWORD_API)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            data-reset-on-success
            class="w-full space-y-4 md:space-y-6"
        {
            (password_input("current_password", "Current password", 0, None))
            (password_input("new_password", "New password", MIN_PASSWORD_LENGTH, None))
            (password_input("confirm_password", "Confirm new password", MIN_PASSWORD_LENGTH, None))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Change password"
            }
        }
    }
}

/// Display the change-password page.
pub async fn get_change_password_page() -> Response {
    let nav_bar = NavBar::new(endpoints::PASSWORD_VIEW).into_html();
    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold my-4" { "Change Password" }

            (change_password_form())
        }
    };

    base("Change Password", &content).into_response()
}

/// The raw data entered in the change-password form.
#[derive(Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Check the new password, then replace the stored password if the current one is correct.
///
/// Responds with an alert describing the outcome.
pub async fn post_change_password(
    State(state): State<PasswordState>,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    let new_password = match ValidatedPassword::new(&form.new_password, &form.confirm_password) {
        Ok(password) => password,
        Err(error) => return error.into_alert_response(),
    };

    match credentials::change_password(
        state.credential_store.as_ref(),
        &form.current_password,
        new_password,
        state.password_cost,
    ) {
        Ok(true) => (
            StatusCode::OK,
            Alert::Success {
                message: "Password Changed".to_owned(),
                details: "Your password has been updated successfully.".to_owned(),
            }
            .into_html(),
        )
            .into_response(),
        Ok(false) => Error::InvalidCredentials.into_alert_response(),
        Err(error) => error.into_alert_response(),
    }
}
