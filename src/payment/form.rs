//! The payment form: its fields, validation and the create-or-update intent it produces.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::{
    Error,
    dashboard::{DashboardTab, dashboard_url},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    payment::core::{NewPayment, Payment, PaymentId, PaymentMethod, iso_date::DATE_FORMAT},
    store::PaymentStore,
};

/// The largest amount a single payment may record.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// The raw fields of the payment form.
///
/// Every field defaults to an empty string so that a missing field is
/// reported by [PaymentForm::validate] rather than by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub payment_date: String,
    #[serde(default)]
    pub month_paid_for: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub momo_transaction_id: String,
}

/// What saving the form should do.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentIntent {
    /// Save a new payment.
    Create(NewPayment),
    /// Replace the fields of an existing payment.
    Update(Payment),
}

impl PaymentIntent {
    /// Forward the intent to `store`, returning the saved payment.
    pub fn apply(self, store: &dyn PaymentStore) -> Result<Payment, Error> {
        match self {
            PaymentIntent::Create(payment) => store.create(payment),
            PaymentIntent::Update(payment) => {
                store.update(payment.clone())?;
                Ok(payment)
            }
        }
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, Error> {
    let value = value.trim();

    if value.is_empty() {
        Err(Error::MissingField(field))
    } else {
        Ok(value)
    }
}

impl PaymentForm {
    /// Check the fields and build the payment they describe.
    ///
    /// A cash payment never keeps a mobile money reference, and a blank
    /// reference becomes `None`.
    ///
    /// # Errors
    /// Returns [Error::MissingField] for a blank customer, date, month or amount,
    /// [Error::InvalidAmount] if the amount is not a number from zero to [MAX_AMOUNT],
    /// [Error::InvalidDate] if the date is not "YYYY-MM-DD", and
    /// [Error::InvalidPaymentMethod] for an unknown method.
    pub fn validate(&self) -> Result<NewPayment, Error> {
        let customer_name = required(&self.customer_name, "customer name")?;
        let payment_date = required(&self.payment_date, "payment date")?;
        let month_paid_for = required(&self.month_paid_for, "month paid for")?;
        let amount = required(&self.amount, "amount")?;

        let amount = amount
            .parse::<f64>()
            .ok()
            .filter(|amount| (0.0..=MAX_AMOUNT).contains(amount))
            .ok_or_else(|| Error::InvalidAmount(amount.to_owned()))?;
        let payment_date = Date::parse(payment_date, DATE_FORMAT)
            .map_err(|_| Error::InvalidDate(payment_date.to_owned()))?;
        let payment_method: PaymentMethod = self.payment_method.parse()?;

        Ok(NewPayment::build(
            customer_name,
            payment_date,
            month_paid_for,
            payment_method,
            amount,
        )
        .momo_transaction_id(Some(self.momo_transaction_id.clone())))
    }

    /// Validate the form and pair it with the payment being edited, if any.
    pub fn into_intent(self, editing: Option<PaymentId>) -> Result<PaymentIntent, Error> {
        let payment = self.validate()?;

        Ok(match editing {
            Some(id) => PaymentIntent::Update(payment.with_id(id)),
            None => PaymentIntent::Create(payment),
        })
    }
}

/// The month labels offered in the form: every month of the year of `today`
/// and of the following year, e.g. "January 2025" through "December 2026".
pub fn month_options(today: Date) -> Vec<String> {
    let mut options = Vec::with_capacity(24);

    for year in [today.year(), today.year() + 1] {
        let mut month = Month::January;

        for _ in 0..12 {
            options.push(format!("{month} {year}"));
            month = month.next();
        }
    }

    options
}

/// The label of the month containing `date`, e.g. "March 2025".
pub fn month_label(date: Date) -> String {
    format!("{} {}", date.month(), date.year())
}

/// The values shown in the form when it is first rendered.
pub struct PaymentFormDefaults<'a> {
    pub customer_name: Option<&'a str>,
    pub payment_date: Date,
    pub month_paid_for: Option<&'a str>,
    pub payment_method: PaymentMethod,
    pub amount: Option<f64>,
    pub momo_transaction_id: Option<&'a str>,
}

impl<'a> PaymentFormDefaults<'a> {
    /// An empty form for recording a cash payment made `today`.
    pub fn new_payment(today: Date) -> Self {
        Self {
            customer_name: None,
            payment_date: today,
            month_paid_for: None,
            payment_method: PaymentMethod::Cash,
            amount: None,
            momo_transaction_id: None,
        }
    }

    /// A form pre-filled with the fields of `payment`.
    pub fn from_payment(payment: &'a Payment) -> Self {
        Self {
            customer_name: Some(&payment.customer_name),
            payment_date: payment.payment_date,
            month_paid_for: Some(&payment.month_paid_for),
            payment_method: payment.payment_method,
            amount: Some(payment.amount),
            momo_transaction_id: payment.momo_transaction_id(),
        }
    }
}

/// A `<select>` over `options` that still offers `selected` when it is not one of them.
fn select_with_extra(
    name: &str,
    placeholder: &str,
    options: &[String],
    selected: Option<&str>,
) -> Markup {
    let extra = selected.filter(|selected| !options.iter().any(|option| option == selected));

    html! {
        select name=(name) id=(name) required class=(FORM_TEXT_INPUT_STYLE)
        {
            option value="" disabled selected[selected.is_none()] { (placeholder) }

            @if let Some(extra) = extra {
                option value=(extra) selected { (extra) }
            }

            @for option in options {
                option value=(option) selected[Some(option.as_str()) == selected] { (option) }
            }
        }
    }
}

pub fn payment_form_fields(
    defaults: &PaymentFormDefaults<'_>,
    customers: &[String],
    months: &[String],
) -> Markup {
    let is_cash = defaults.payment_method == PaymentMethod::Cash;
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="customer_name" class=(FORM_LABEL_STYLE) { "Customer Name" }

            (select_with_extra("customer_name", "Select customer", customers, defaults.customer_name))
        }

        div
        {
            label for="payment_date" class=(FORM_LABEL_STYLE) { "Payment Date" }

            input
                name="payment_date"
                id="payment_date"
                type="date"
                value=(defaults.payment_date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="month_paid_for" class=(FORM_LABEL_STYLE) { "Month Paid For" }

            (select_with_extra("month_paid_for", "Select month", months, defaults.month_paid_for))
        }

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Payment Method" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for method in PaymentMethod::ALL {
                    div class="flex items-center gap-3"
                    {
                        input
                            name="payment_method"
                            id={ "payment-method-" (method.as_str()) }
                            type="radio"
                            value=(method.as_str())
                            checked[method == defaults.payment_method]
                            required
                            tabindex="0"
                            data-momo-toggle
                            class=(FORM_RADIO_INPUT_STYLE);

                        label
                            for={ "payment-method-" (method.as_str()) }
                            class=(FORM_RADIO_LABEL_STYLE)
                        {
                            (method.label())
                        }
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount (RWF)" }

            input
                name="amount"
                id="amount"
                type="number"
                step="0.01"
                min="0"
                max=(MAX_AMOUNT)
                placeholder="0.00"
                required
                value=[amount_str.as_deref()]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div id="momo-field" class=[is_cash.then_some("hidden")]
        {
            label for="momo_transaction_id" class=(FORM_LABEL_STYLE) { "MoMo Transaction ID" }

            input
                name="momo_transaction_id"
                id="momo_transaction_id"
                type="text"
                placeholder="Enter MoMo transaction ID"
                value=[defaults.momo_transaction_id]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

/// The complete form. Posts a new payment, or puts an update when `editing` is set.
pub fn payment_form(
    editing: Option<PaymentId>,
    defaults: &PaymentFormDefaults<'_>,
    customers: &[String],
    months: &[String],
) -> Markup {
    let update_url = editing.map(|id| format_endpoint(endpoints::PAYMENT, id));
    let create_url = editing.is_none().then_some(endpoints::PAYMENTS_API);
    let cancel_url = dashboard_url(DashboardTab::Payments, None);

    html! {
        form
            id="payment-form"
            hx-post=[create_url]
            hx-put=[update_url]
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="w-full space-y-4 md:space-y-6"
        {
            (payment_form_fields(defaults, customers, months))

            div class="flex gap-4"
            {
                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="inline htmx-indicator" id="indicator"
                    {
                        (loading_spinner())
                    }

                    @if editing.is_some() { "Update Payment" } @else { "Add Payment" }
                }

                @if editing.is_some() {
                    a href=(cancel_url) class=(BUTTON_SECONDARY_STYLE) { "Cancel" }
                }
            }
        }
    }
}
