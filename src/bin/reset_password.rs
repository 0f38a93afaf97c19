use std::{
    error::Error,
    io::{self},
    path::{Path, PathBuf},
    process::exit,
};

use clap::{Parser, ValueEnum};
use rusqlite::Connection;

use rent_tracker::{
    CredentialStore, Credentials, DEFAULT_USERNAME, JsonFileStore, PasswordHash, SqliteStore,
    ValidatedPassword,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Storage {
    Sqlite,
    Json,
}

/// A utility for resetting the household password when it has been forgotten.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The storage backend.
    #[arg(long, value_enum, default_value_t = Storage::Sqlite)]
    storage: Storage,

    /// File path to the SQLite database or JSON data file.
    #[arg(long)]
    data_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    validate_data_path(&args.data_path);

    println!("Loading credentials from {:#?}", args.data_path);

    let store: Box<dyn CredentialStore> = match args.storage {
        Storage::Sqlite => Box::new(SqliteStore::new(Connection::open(&args.data_path)?)?),
        Storage::Json => Box::new(JsonFileStore::open(&args.data_path)?),
    };

    let Some(password_hash) = get_new_password_hash() else {
        return Ok(());
    };

    update_password(store.as_ref(), password_hash)?;

    println!("Password updated successfully!");

    Ok(())
}

fn validate_data_path(data_path: &Path) {
    match data_path.extension() {
        None => {
            print_error("Data path must include a file extension (e.g., 'rent.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            print_error("Data path must include a file extension (e.g., 'rent.db').");
            exit(1);
        }
        _ => {}
    }

    if !data_path.is_file() {
        print_error(format!("File does not exist at {data_path:#?}!"));
        exit(1);
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn get_new_password_hash() -> Option<PasswordHash> {
    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;
        let second_password = prompt("Enter the same password again: ")?;

        let validated_password = match ValidatedPassword::new(&first_password, &second_password) {
            Ok(password) => password,
            Err(error) => {
                print_error(error);
                continue;
            }
        };

        match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn update_password(
    store: &dyn CredentialStore,
    password_hash: PasswordHash,
) -> Result<(), rent_tracker::Error> {
    match store.get_credentials()? {
        Some(credentials) => {
            println!("Resetting password for {}", credentials.username);
            store.set_password_hash(&password_hash)
        }
        None => {
            println!("No credentials saved yet, creating them for {DEFAULT_USERNAME}");
            store.save_credentials(&Credentials {
                username: DEFAULT_USERNAME.to_owned(),
                password_hash,
            })
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

/// From https://crates.io/crates/capitalize
fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
