use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{web, App, HttpServer};

use gear_rental_backend::store::{DocumentStore, MongoStore};
use gear_rental_backend::web_handlers;

#[rustfmt::skip]
async fn run() -> Result<(), String> {
    // Setup logger
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    if std::env::var("RUST_BACKTRACE").is_err() {
        std::env::set_var("RUST_BACKTRACE", "1");
    }
    env_logger::init();

    // Load user preferences from config file and environment.
    // Environment variables override the config file!
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::default())
        .build().map_err(|err| err.to_string())?;

    // Get port and host from config, or use the default port and host: 0.0.0.0:8000
    let host: String = settings.get_string("host").unwrap_or_else(|_| String::from("0.0.0.0"));
    let port: u16 = settings.get_int("port").unwrap_or(8000).try_into().map_err(|_| "Port number can't be over 65535!")?;
    let num_workers: usize = settings.get_int("workers").unwrap_or(2).try_into().map_err(|_| "Too many workers!")?;

    // Database config. The server still starts without it, every request
    // that needs the store then answers 502 and /info reports the gap.
    let store = match (settings.get_string("database_url"), settings.get_string("database_name")) {
        (Ok(url), Ok(name)) => MongoStore::connect(&url, &name).await.map_err(|err| err.to_string())?,
        _ => {
            log::warn!("DATABASE_URL or DATABASE_NAME is not set, starting without a database!");
            MongoStore::disconnected()
        }
    };
    let store: Arc<dyn DocumentStore> = Arc::new(store);
    let store = web::Data::from(store);

    // Setup server
    println!("Starting server on http://{host}:{port}", host = host, port = port);
    HttpServer::new(move || {
        // Create a simple logger that writes all incoming requests to the console
        let logger = Logger::default();

        // Cross-Origin Requests
        let cors = actix_cors::Cors::default().allow_any_header().allow_any_origin().allow_any_method().max_age(3600);

        App::new()
            .wrap(logger)
            .wrap(cors)

            // If an internal error occurs, remove the sensitive content from the response
            .wrap(ErrorHandlers::new().handler(StatusCode::INTERNAL_SERVER_ERROR, web_handlers::sanitize_internal_error))

            // Provide a clone of the reference to the document store
            // to enable services to access the database
            .app_data(store.clone())
            .configure(web_handlers::configure)
    })
    .bind((host, port)).map_err(|err| err.to_string())?
    .workers(num_workers)
    .run().await.map_err(|err| err.to_string())
}

#[actix_web::main]
async fn main() {
    let result = run().await;

    std::process::exit(match result {
        Ok(_) => 0,
        Err(error) => {
            eprintln!("[Error] {}", error);
            1
        }
    });
}
