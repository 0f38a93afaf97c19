use std::{
    env::{self},
    fs::OpenOptions,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::{Parser, ValueEnum};
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use rent_tracker::{
    AppState, DEFAULT_PASSWORD_COST, JsonFileStore, SqliteStore, build_router,
    graceful_shutdown, logging_middleware,
};

/// Where payments and credentials are kept.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Storage {
    /// A SQLite database file.
    Sqlite,
    /// A JSON data file.
    Json,
}

/// The web server for rent_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The storage backend.
    #[arg(long, value_enum, default_value_t = Storage::Sqlite)]
    storage: Storage,

    /// File path to the SQLite database or JSON data file.
    #[arg(long)]
    data_path: PathBuf,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// The canonical name of the local timezone, e.g. "Africa/Kigali".
    #[arg(long, default_value = "Africa/Kigali")]
    timezone: String,

    /// A customer name to offer in the payment form, may be repeated.
    #[arg(long = "customer")]
    customers: Vec<String>,

    /// Log every request and response body, with passwords redacted.
    #[arg(long)]
    log_bodies: bool,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let secret = env::var("SECRET").expect("The environment variable 'SECRET' must be set");

    let app_state = match args.storage {
        Storage::Sqlite => {
            let conn = Connection::open(&args.data_path).unwrap_or_else(|error| {
                panic!("Could not open the database at {:?}: {error}", args.data_path)
            });
            let store = SqliteStore::new(conn).expect("Could not initialize the database");

            AppState::new(
                Arc::new(store),
                &secret,
                &args.timezone,
                args.customers,
                DEFAULT_PASSWORD_COST,
            )
        }
        Storage::Json => {
            let store = JsonFileStore::open(&args.data_path).unwrap_or_else(|error| {
                panic!("Could not open the data file at {:?}: {error}", args.data_path)
            });

            AppState::new(
                Arc::new(store),
                &secret,
                &args.timezone,
                args.customers,
                DEFAULT_PASSWORD_COST,
            )
        }
    }
    .expect("Could not create the app state");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(app_state);

    let router = if args.log_bodies {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    };

    let router = add_tracing_layer(router);

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "HTTP server listening on {} using {:?} storage at {:?}",
        addr,
        args.storage,
        args.data_path
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
