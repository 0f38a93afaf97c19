//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_change_password_page, get_log_in_page, get_log_out,
        post_change_password, post_log_in,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    payment::{
        create_payment_endpoint, delete_payment_endpoint, edit_payment_endpoint,
        export_payments_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PASSWORD_VIEW, get(get_change_password_page))
        .route(endpoints::EXPORT_PAYMENTS, get(export_payments_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(endpoints::PAYMENTS_API, post(create_payment_endpoint))
            .route(
                endpoints::PAYMENT,
                put(edit_payment_endpoint).delete(delete_payment_endpoint),
            )
            .route(endpoints::PASSWORD_API, post(post_change_password))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        auth::COOKIE_TOKEN,
        endpoints::{self, format_endpoint},
        store::{PaymentStore, SqliteStore},
    };

    use super::build_router;

    fn get_test_server() -> (TestServer, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::new(Connection::open_in_memory().unwrap()).unwrap());
        let state = AppState::new(store.clone(), "routing-test-secret", "Etc/UTC", vec![], 4)
            .expect("could not create app state");

        let server =
            TestServer::try_new(build_router(state)).expect("Could not create test server.");

        (server, store)
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("username", "family"), ("password", "rent2024")])
            .await;

        response.assert_status_see_other();
        response.cookie(COOKIE_TOKEN)
    }

    #[tokio::test]
    async fn dashboard_requires_log_in() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        assert!(
            response
                .header("location")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn api_requires_log_in() {
        let (server, store) = get_test_server();

        let response = server
            .post(endpoints::PAYMENTS_API)
            .form(&[("customer_name", "John Smith")])
            .await;

        assert!(response.maybe_header("hx-redirect").is_some());
        assert_eq!(store.list(), Ok(vec![]));
    }

    #[tokio::test]
    async fn payment_lifecycle() {
        let (server, store) = get_test_server();
        let cookie = log_in(&server).await;

        server
            .post(endpoints::PAYMENTS_API)
            .add_cookie(cookie.clone())
            .form(&[
                ("customer_name", "John Smith"),
                ("payment_date", "2025-03-01"),
                ("month_paid_for", "March 2025"),
                ("payment_method", "cash"),
                ("amount", "100"),
                ("momo_transaction_id", ""),
            ])
            .await
            .assert_status_see_other();

        let payments = store.list().unwrap();
        assert_eq!(payments.len(), 1);
        let id = payments[0].id;

        server
            .put(&format_endpoint(endpoints::PAYMENT, id))
            .add_cookie(cookie.clone())
            .form(&[
                ("customer_name", "John Smith"),
                ("payment_date", "2025-03-01"),
                ("month_paid_for", "March 2025"),
                ("payment_method", "mobilemoney"),
                ("amount", "150"),
                ("momo_transaction_id", "X1"),
            ])
            .await
            .assert_status_see_other();

        let payment = store.get(id).unwrap();
        assert_eq!(payment.amount, 150.0);
        assert_eq!(payment.momo_transaction_id(), Some("X1"));

        let export = server
            .get(endpoints::EXPORT_PAYMENTS)
            .add_cookie(cookie.clone())
            .await;
        export.assert_status_ok();
        assert!(export.text().contains("\"X1\""));

        server
            .delete(&format_endpoint(endpoints::PAYMENT, id))
            .add_cookie(cookie)
            .await
            .assert_status_ok();

        assert_eq!(store.list(), Ok(vec![]));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (server, _) = get_test_server();

        let response = server.get("/not-a-page").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
