//! Session cookies, credential checks and the log-in, log-out and change-password routes.

mod change_password;
mod cookie;
mod credentials;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod token;

pub use change_password::{get_change_password_page, post_change_password};
pub use credentials::{
    DEFAULT_PASSWORD, DEFAULT_USERNAME, change_password, ensure_default_credentials, log_in,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};

pub(crate) use cookie::DEFAULT_COOKIE_DURATION;

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
