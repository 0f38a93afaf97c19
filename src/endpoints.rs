//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/payments/{payment_id}', use [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users with the summary, payment form and payment list.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page for changing the household password.
pub const PASSWORD_VIEW: &str = "/settings/password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for downloading the payments as a CSV file.
pub const EXPORT_PAYMENTS: &str = "/payments/export";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to log in.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route to log out.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to change the password.
pub const PASSWORD_API: &str = "/api/password";
/// The route to create a payment.
pub const PAYMENTS_API: &str = "/api/payments";
/// The route to update or delete a single payment.
pub const PAYMENT: &str = "/api/payments/{payment_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// Only the first `{...}` parameter is replaced. A path without a parameter is
/// returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.char_indices() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
