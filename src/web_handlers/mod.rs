use std::collections::HashMap;

use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{error, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::collection;
use crate::store::{DocumentStore, StoreError};

pub(crate) mod gear;
pub(crate) mod message;
pub(crate) mod transaction;
pub(crate) mod user;

/// Registers every route of the api. `main` and the test suite both go
/// through this, so they always run the same surface.
pub fn configure(config: &mut web::ServiceConfig) {
    config
        .service(index)
        .service(get_server_info)
        .service(teapot)
        .service(
            web::scope("/api")
                .default_service(web::route().to(not_implemented))
                .service(gear::get_gear)
                .service(gear::post_gear)
                .service(transaction::get_transactions)
                .service(transaction::post_transaction)
                .service(message::get_messages)
                .service(message::post_message)
                .service(user::get_users)
                .service(user::post_user),
        );
}

#[actix_web::get("/")]
async fn index() -> web::Json<HashMap<&'static str, &'static str>> {
    web::Json(collection! {
        "message" => "Mountain Gear Rental API is running"
    })
}

#[derive(Serialize, Deserialize, Debug)]
struct ServerInfo {
    server_version: String,
    os: Option<String>,
    os_version: Option<String>,
    database: String,
    database_url_set: bool,
    database_name_set: bool,
    collections: Vec<String>,
}

/// Deployment diagnostics: reports whether the database settings are
/// present and whether the store answers, without leaking the raw values.
#[actix_web::get("/info")]
async fn get_server_info(store: web::Data<dyn DocumentStore>) -> web::Json<ServerInfo> {
    let (database, collections) = match store.collection_names().await {
        Ok(mut collections) => {
            collections.truncate(10);
            (String::from("connected"), collections)
        }
        Err(StoreError::Unavailable) => (String::from("not connected"), Vec::new()),
        Err(error) => {
            // The one place a store error is summarized instead of surfaced
            log::warn!("database diagnostics failed: {error}");
            (String::from("error"), Vec::new())
        }
    };

    web::Json(ServerInfo {
        server_version: String::from(option_env!("CARGO_PKG_VERSION").unwrap_or("unknown")),
        os: sysinfo::System::name(),
        os_version: sysinfo::System::os_version(),
        database,
        database_url_set: std::env::var("DATABASE_URL").is_ok(),
        database_name_set: std::env::var("DATABASE_NAME").is_ok(),
        collections,
    })
}

#[actix_web::get("/teapot")]
async fn teapot() -> HttpResponse {
    HttpResponse::from_error(error::ErrorImATeapot("Your coffee is in another castle!"))
}

pub(crate) async fn not_implemented() -> actix_web::Result<HttpResponse> {
    Ok(HttpResponse::NotImplemented().finish())
}

/// Strips the body from internal server errors before they leave the
/// process. Driver messages can contain connection details.
pub fn sanitize_internal_error<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (request, response) = res.into_parts();
    let response = ServiceResponse::new(request, response.set_body(()).map_into_boxed_body()).map_into_right_body();

    Ok(ErrorHandlerResponse::Response(response))
}

pub(crate) fn default_limit() -> i64 {
    50
}
