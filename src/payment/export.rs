//! The CSV export of all payments.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRequest, HxReswap, SwapOption};
use csv::{QuoteStyle, WriterBuilder};
use time::Date;

use crate::{
    Error,
    payment::{Payment, PaymentState, PaymentSummary},
    timezone::local_today,
};

/// The placeholder written for a payment without a mobile money reference.
const MISSING_MOMO_ID: &str = "N/A";

/// A rendered CSV report and the name it should be saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    /// e.g. "rent-payments-2025-03-01.csv".
    pub filename: String,
    pub content: String,
}

/// Render `payments` and their totals as a CSV report dated `report_date`.
///
/// The report opens with a summary block, then a blank row, then one row
/// per payment in the order given. Every field is quoted.
///
/// # Errors
/// Returns [Error::NoDataToExport] if `payments` is empty, or
/// [Error::ExportFailed] if the CSV writer fails.
pub fn export_csv(payments: &[Payment], report_date: Date) -> Result<CsvExport, Error> {
    if payments.is_empty() {
        return Err(Error::NoDataToExport);
    }

    let summary = PaymentSummary::from_payments(payments);
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .flexible(true)
        .from_writer(Vec::new());

    let write_error = |error: csv::Error| Error::ExportFailed(error.to_string());

    writer
        .write_record(["RENT PAYMENTS SUMMARY"])
        .map_err(write_error)?;
    writer
        .write_record(["Total Transactions", &summary.count.to_string()])
        .map_err(write_error)?;
    writer
        .write_record(["Total Amount", &format!("{:.2}", summary.total_amount)])
        .map_err(write_error)?;
    writer
        .write_record(["Unique Customers", &summary.unique_customers.to_string()])
        .map_err(write_error)?;
    writer
        .write_record(["Report Date", &report_date.to_string()])
        .map_err(write_error)?;
    writer.write_record([""]).map_err(write_error)?;
    writer
        .write_record([
            "Customer Name",
            "Payment Date",
            "Month Paid For",
            "Payment Method",
            "Amount",
            "MoMo Transaction ID",
        ])
        .map_err(write_error)?;

    for payment in payments {
        writer
            .write_record([
                payment.customer_name.as_str(),
                &payment.payment_date.to_string(),
                &payment.month_paid_for,
                payment.payment_method.label(),
                &format!("{:.2}", payment.amount),
                payment.momo_transaction_id().unwrap_or(MISSING_MOMO_ID),
            ])
            .map_err(write_error)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportFailed(error.to_string()))?;
    let content = String::from_utf8(bytes).map_err(|error| Error::ExportFailed(error.to_string()))?;

    Ok(CsvExport {
        filename: format!("rent-payments-{report_date}.csv"),
        content,
    })
}

/// A route handler for downloading every payment as a CSV file.
///
/// HTMX requests for an empty export get an alert, other requests get the full "No Data" page.
/// The export button does not swap its response, so the alert overrides the swap style.
pub async fn export_payments_endpoint(
    State(state): State<PaymentState>,
    HxRequest(is_htmx_request): HxRequest,
) -> Response {
    let result = local_today(&state.local_timezone).and_then(|today| {
        let payments = state.payment_store.list()?;
        export_csv(&payments, today)
    });

    match result {
        Ok(export) => {
            tracing::info!("exporting payments to {}", export.filename);

            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", export.filename),
                    ),
                ],
                export.content,
            )
                .into_response()
        }
        Err(error) if is_htmx_request => {
            (HxReswap(SwapOption::InnerHtml), error.into_alert_response()).into_response()
        }
        Err(error) => error.into_response(),
    }
}
