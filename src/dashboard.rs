//! The dashboard: summary cards, the payment form and the payment list behind two tabs.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    alert::Alert,
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    payment::{
        Payment, PaymentFormDefaults, PaymentId, PaymentState, PaymentSummary, month_options,
        payment_form, payment_table,
    },
    timezone::local_today,
};

/// The tabs of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    /// The payment form, in create or edit mode.
    AddPayment,
    /// The list of payments.
    Payments,
}

impl DashboardTab {
    /// The value of the `tab` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            DashboardTab::AddPayment => "add-payment",
            DashboardTab::Payments => "payments",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            DashboardTab::AddPayment => "Add Payment",
            DashboardTab::Payments => "Payments",
        }
    }

    /// Read the `tab` query parameter, an unknown or missing value selects the form.
    fn from_query(tab: Option<&str>) -> Self {
        match tab {
            Some("payments") => DashboardTab::Payments,
            _ => DashboardTab::AddPayment,
        }
    }
}

/// The URL of the dashboard showing `tab`, optionally editing the payment `edit`.
pub fn dashboard_url(tab: DashboardTab, edit: Option<PaymentId>) -> String {
    match edit {
        Some(id) => format!("{}?tab={}&edit={id}", endpoints::DASHBOARD_VIEW, tab.as_str()),
        None => format!("{}?tab={}", endpoints::DASHBOARD_VIEW, tab.as_str()),
    }
}

/// The query parameters of the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
    /// The ID of the payment to edit.
    pub edit: Option<PaymentId>,
}

/// Display the dashboard.
///
/// Editing a payment always shows the form tab. If the payments cannot be
/// loaded the page is still shown, with no payments and an error banner.
pub async fn get_dashboard_page(
    State(state): State<PaymentState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let editing = match query.edit {
        Some(id) => {
            let payment = state.payment_store.get(id).inspect_err(|error| {
                tracing::error!("could not get payment {id} to edit: {error}")
            })?;
            Some(payment)
        }
        None => None,
    };

    let tab = if editing.is_some() {
        DashboardTab::AddPayment
    } else {
        DashboardTab::from_query(query.tab.as_deref())
    };

    let (payments, load_error) = match state.payment_store.list() {
        Ok(payments) => (payments, None),
        Err(error) => {
            tracing::error!("could not load payments: {error}");
            (
                Vec::new(),
                Some(Alert::Error {
                    message: "Could not load payments".to_owned(),
                    details: "The payment list may be incomplete. Try refreshing the page or \
                        check the server logs."
                        .to_owned(),
                }),
            )
        }
    };

    let content = match tab {
        DashboardTab::AddPayment => {
            let defaults = match &editing {
                Some(payment) => PaymentFormDefaults::from_payment(payment),
                None => PaymentFormDefaults::new_payment(today),
            };

            payment_form(
                editing.as_ref().map(|payment| payment.id),
                &defaults,
                &state.customers,
                &month_options(today),
            )
        }
        DashboardTab::Payments => payment_table(&payments),
    };

    Ok(dashboard_view(tab, editing.as_ref(), &payments, load_error, content).into_response())
}

fn tab_bar(active: DashboardTab) -> Markup {
    let tab_style = |tab: DashboardTab| {
        if tab == active {
            "inline-block p-4 text-blue-600 border-b-2 border-blue-600 rounded-t-lg \
            dark:text-blue-500 dark:border-blue-500"
        } else {
            "inline-block p-4 border-b-2 border-transparent rounded-t-lg \
            hover:text-gray-600 hover:border-gray-300 dark:hover:text-gray-300"
        }
    };

    html! {
        ul
            class="flex flex-wrap -mb-px text-sm font-medium text-center text-gray-500
                border-b border-gray-200 dark:text-gray-400 dark:border-gray-700"
        {
            @for tab in [DashboardTab::AddPayment, DashboardTab::Payments] {
                li class="me-2"
                {
                    a
                        href=(dashboard_url(tab, None))
                        class=(tab_style(tab))
                        aria-current=[(tab == active).then_some("page")]
                    {
                        (tab.title())
                    }
                }
            }
        }
    }
}

fn export_button(has_payments: bool) -> Markup {
    html! {
        @if has_payments {
            a href=(endpoints::EXPORT_PAYMENTS) download class=(BUTTON_SECONDARY_STYLE)
            {
                "Export CSV"
            }
        } @else {
            // Without payments there is no file, so ask for the alert instead.
            button
                type="button"
                hx-get=(endpoints::EXPORT_PAYMENTS)
                hx-swap="none"
                hx-target-error="#alert-container"
                class=(BUTTON_SECONDARY_STYLE)
            {
                "Export CSV"
            }
        }
    }
}

fn dashboard_view(
    tab: DashboardTab,
    editing: Option<&Payment>,
    payments: &[Payment],
    load_error: Option<Alert>,
    content: Markup,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();
    let summary = PaymentSummary::from_payments(payments).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-5xl space-y-6"
            {
                div class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Rent Payments" }

                    (export_button(!payments.is_empty()))
                }

                @if let Some(alert) = load_error {
                    div id="load-error" { (alert.into_html()) }
                }

                (summary)

                (tab_bar(tab))

                @if let Some(payment) = editing {
                    h2 class="text-lg font-semibold"
                    {
                        "Editing payment from " (payment.customer_name)
                    }
                }

                div class="rounded-lg bg-white p-6 shadow dark:bg-gray-800" { (content) }
            }
        }
    };

    base("Dashboard", &content)
}

#[cfg(test)]
mod dashboard_route_tests {
    use std::sync::Arc;

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        payment::{
            NewPayment, Payment, PaymentId, PaymentMethod, PaymentState,
            test_utils::get_test_state,
        },
        store::PaymentStore,
        test_utils::{
            assert_form_input, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_html_document,
        },
    };

    use super::{DashboardQuery, DashboardTab, dashboard_url, get_dashboard_page};

    #[test]
    fn builds_dashboard_urls() {
        assert_eq!(
            dashboard_url(DashboardTab::Payments, None),
            "/dashboard?tab=payments"
        );
        assert_eq!(
            dashboard_url(DashboardTab::AddPayment, Some(3)),
            "/dashboard?tab=add-payment&edit=3"
        );
    }

    #[tokio::test]
    async fn shows_form_by_default() {
        let (state, _) = get_test_state();

        let response = get_dashboard_page(State(state), Query(DashboardQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let form = must_get_form(&document);
        assert_hx_endpoint(&form, "/api/payments", "hx-post");
        assert_form_input(&form, "payment_date", "date");
        assert_form_input(&form, "amount", "number");
        let cards = document
            .select(&Selector::parse("[data-summary-card]").unwrap())
            .count();
        assert_eq!(cards, 4);
    }

    #[tokio::test]
    async fn shows_payment_list_tab() {
        let (state, store) = get_test_state();
        store
            .create(NewPayment::build(
                "John Smith",
                date!(2025 - 03 - 01),
                "March 2025",
                PaymentMethod::Cash,
                100.0,
            ))
            .unwrap();

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                tab: Some("payments".to_owned()),
                edit: None,
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let rows = document
            .select(&Selector::parse("tr[data-payment-row]").unwrap())
            .count();
        assert_eq!(rows, 1);
        assert!(
            document
                .select(&Selector::parse("form#payment-form").unwrap())
                .next()
                .is_none()
        );
        let export = document
            .select(&Selector::parse("a[download]").unwrap())
            .next()
            .expect("expected an export link");
        assert_eq!(export.value().attr("href"), Some("/payments/export"));
    }

    #[tokio::test]
    async fn empty_export_button_does_not_swap_response() {
        let (state, _) = get_test_state();

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                tab: Some("payments".to_owned()),
                edit: None,
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert!(
            document
                .select(&Selector::parse("a[download]").unwrap())
                .next()
                .is_none()
        );
        let button = document
            .select(&Selector::parse("button[hx-get]").unwrap())
            .next()
            .expect("expected an export button");
        assert_eq!(button.value().attr("hx-get"), Some("/payments/export"));
        assert_eq!(button.value().attr("hx-swap"), Some("none"));
        assert_eq!(
            button.value().attr("hx-target-error"),
            Some("#alert-container")
        );
    }

    #[tokio::test]
    async fn editing_selects_form_tab() {
        let (state, store) = get_test_state();
        let payment = store
            .create(NewPayment::build(
                "Mary Johnson",
                date!(2025 - 03 - 01),
                "March 2025",
                PaymentMethod::Cash,
                100.0,
            ))
            .unwrap();

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                tab: Some("payments".to_owned()),
                edit: Some(payment.id),
            }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let form = document
            .select(&Selector::parse("form#payment-form").unwrap())
            .next()
            .expect("expected the payment form");
        let want_url = format!("/api/payments/{}", payment.id);
        assert_eq!(form.value().attr("hx-put"), Some(want_url.as_str()));
    }

    #[tokio::test]
    async fn unknown_edit_id_is_not_found() {
        let (state, _) = get_test_state();

        let result = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                tab: None,
                edit: Some(404),
            }),
        )
        .await;

        assert_eq!(result.err(), Some(Error::NotFound));
    }

    struct BrokenStore;

    impl PaymentStore for BrokenStore {
        fn list(&self) -> Result<Vec<Payment>, Error> {
            Err(Error::DatabaseLockError)
        }

        fn create(&self, _: NewPayment) -> Result<Payment, Error> {
            Err(Error::DatabaseLockError)
        }

        fn get(&self, _: PaymentId) -> Result<Payment, Error> {
            Err(Error::DatabaseLockError)
        }

        fn update(&self, _: Payment) -> Result<(), Error> {
            Err(Error::DatabaseLockError)
        }

        fn delete(&self, _: PaymentId) -> Result<(), Error> {
            Err(Error::DatabaseLockError)
        }
    }

    #[tokio::test]
    async fn failed_load_shows_banner_and_empty_list() {
        let state = PaymentState {
            payment_store: Arc::new(BrokenStore),
            customers: Arc::new(vec![]),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_dashboard_page(
            State(state),
            Query(DashboardQuery {
                tab: Some("payments".to_owned()),
                edit: None,
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        let banner = document
            .select(&Selector::parse("#load-error").unwrap())
            .next()
            .expect("expected an error banner")
            .text()
            .collect::<String>();
        assert!(banner.contains("Could not load payments"));
        let rows = document
            .select(&Selector::parse("tr[data-payment-row]").unwrap())
            .count();
        assert_eq!(rows, 0);
    }
}
