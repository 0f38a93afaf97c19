use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use rent_tracker::{
    CredentialStore, DEFAULT_CUSTOMERS, JsonFileStore, NewPayment, PaymentMethod, PaymentStore,
    SqliteStore, month_label,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Storage {
    Sqlite,
    Json,
}

/// A utility for creating a data file filled with sample payments for manual testing.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The storage backend.
    #[arg(long, value_enum, default_value_t = Storage::Sqlite)]
    storage: Storage,

    /// File path to save the SQLite database or JSON data file to.
    #[arg(long, short)]
    output_path: PathBuf,

    /// How many months of payments to create for each customer.
    #[arg(long, default_value_t = 6)]
    months: u32,
}

/// Create and populate a data file for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = args.output_path.as_path();
    validate_output_path(output_path);

    println!("Creating {:?} store at {output_path:#?}", args.storage);

    match args.storage {
        Storage::Sqlite => populate(
            &SqliteStore::new(Connection::open(output_path)?)?,
            args.months,
        )?,
        Storage::Json => populate(&JsonFileStore::open(output_path)?, args.months)?,
    }

    println!("Success! Log in with the default username and password.");

    Ok(())
}

fn validate_output_path(output_path: &Path) {
    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'rent.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'rent.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }
}

fn populate(
    store: &(impl PaymentStore + CredentialStore),
    months: u32,
) -> Result<(), rent_tracker::Error> {
    println!("Creating default credentials...");
    rent_tracker::ensure_default_credentials(store, rent_tracker::DEFAULT_PASSWORD_COST)?;

    println!("Creating sample payments...");
    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for month in 0..months {
        let payment_date = today - Duration::days(30 * i64::from(month));

        for (index, customer) in DEFAULT_CUSTOMERS.iter().enumerate() {
            let (payment_method, momo_transaction_id) = if index % 2 == 0 {
                (PaymentMethod::Cash, None)
            } else {
                (
                    PaymentMethod::MobileMoney,
                    Some(format!("MP{}{index:02}{month:02}", payment_date.year())),
                )
            };
            let amount = 50_000.0 + 5_000.0 * index as f64;

            store.create(
                NewPayment::build(
                    customer,
                    payment_date,
                    &month_label(payment_date),
                    payment_method,
                    amount,
                )
                .momo_transaction_id(momo_transaction_id),
            )?;
            count += 1;
        }
    }

    println!("Created {count} payments.");

    Ok(())
}
