//! The list of recorded payments.

use maud::{Markup, html};

use crate::{
    dashboard::{DashboardTab, dashboard_url},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_amount,
    },
    payment::{Payment, PaymentMethod},
};

const METHOD_BADGE_STYLE: &str =
    "inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium";

fn method_badge(method: PaymentMethod) -> Markup {
    let colour = match method {
        PaymentMethod::Cash => "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300",
        PaymentMethod::MobileMoney => {
            "bg-blue-100 text-blue-800 dark:bg-blue-900 dark:text-blue-300"
        }
    };

    html! {
        span class={ (METHOD_BADGE_STYLE) " " (colour) } { (method.label()) }
    }
}

fn payment_row(payment: &Payment) -> Markup {
    let edit_url = dashboard_url(DashboardTab::AddPayment, Some(payment.id));
    let delete_url = format_endpoint(endpoints::PAYMENT, payment.id);

    html!(
        tr class=(TABLE_ROW_STYLE) data-payment-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (payment.customer_name) }
            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(payment.payment_date) { (payment.payment_date) }
            }
            td class=(TABLE_CELL_STYLE) { (payment.month_paid_for) }
            td class=(TABLE_CELL_STYLE) { (method_badge(payment.payment_method)) }
            td class="px-6 py-4 text-right tabular-nums" { (format_amount(payment.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(momo_id) = payment.momo_transaction_id() {
                    span class="font-mono" { (momo_id) }
                } @else {
                    span class="text-gray-400 dark:text-gray-500" { "-" }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE)
                    {
                        "Edit"
                    }

                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this payment?"
                        hx-target-error="#alert-container"
                        class=(BUTTON_DELETE_STYLE)
                    {
                       "Delete"
                    }
                }
            }
        }
    )
}

/// The payments as a table, in the order given.
pub fn payment_table(payments: &[Payment]) -> Markup {
    html!(
        div class="relative overflow-x-auto shadow-md sm:rounded-lg dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Customer" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Method" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "MoMo ID" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for payment in payments {
                        (payment_row(payment))
                    }

                    @if payments.is_empty() {
                        tr
                        {
                            td
                                colspan="7"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No payments recorded yet. "
                                a href=(dashboard_url(DashboardTab::AddPayment, None)) class=(LINK_STYLE)
                                {
                                    "Record the first payment"
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
