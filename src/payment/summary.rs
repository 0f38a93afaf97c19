//! Aggregates over the payment set, shown as cards above the dashboard tabs.

use std::collections::HashSet;

use maud::{Markup, html};

use crate::{
    html::format_amount,
    payment::{Payment, PaymentMethod},
};

/// The amount and number of payments made with one method.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MethodTotals {
    pub amount: f64,
    pub count: usize,
}

impl MethodTotals {
    fn add(&mut self, amount: f64) {
        self.amount += amount;
        self.count += 1;
    }
}

/// Totals over a set of payments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSummary {
    pub total_amount: f64,
    pub count: usize,
    pub cash: MethodTotals,
    pub mobile_money: MethodTotals,
    /// The number of distinct customer names.
    pub unique_customers: usize,
}

impl PaymentSummary {
    pub fn from_payments(payments: &[Payment]) -> Self {
        let mut summary = Self::default();
        let mut customers = HashSet::new();

        for payment in payments {
            customers.insert(payment.customer_name.as_str());

            match payment.payment_method {
                PaymentMethod::Cash => summary.cash.add(payment.amount),
                PaymentMethod::MobileMoney => summary.mobile_money.add(payment.amount),
            }
        }

        // The per-method subtotals must add up to the grand total exactly.
        summary.total_amount = summary.cash.amount + summary.mobile_money.amount;
        summary.count = summary.cash.count + summary.mobile_money.count;
        summary.unique_customers = customers.len();
        summary
    }

    pub fn into_html(self) -> Markup {
        let cards = [
            (
                "Total Revenue",
                format_amount(self.total_amount),
                format!("From {} customers", self.unique_customers),
                "text-gray-900 dark:text-white",
            ),
            (
                "Total Transactions",
                self.count.to_string(),
                "All payments".to_owned(),
                "text-gray-900 dark:text-white",
            ),
            (
                "Cash Payments",
                format_amount(self.cash.amount),
                format!("{} transactions", self.cash.count),
                "text-green-700 dark:text-green-300",
            ),
            (
                "Mobile Money",
                format_amount(self.mobile_money.amount),
                format!("{} transactions", self.mobile_money.count),
                "text-blue-700 dark:text-blue-300",
            ),
        ];

        html! {
            section class="grid w-full grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-4"
            {
                @for (title, value, caption, value_class) in cards {
                    div
                        class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm
                            dark:border-gray-700 dark:bg-gray-800"
                        data-summary-card=(title)
                    {
                        h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
                        p class={ "text-2xl font-bold tabular-nums " (value_class) } { (value) }
                        p class="text-xs text-gray-500 dark:text-gray-400" { (caption) }
                    }
                }
            }
        }
    }
}
