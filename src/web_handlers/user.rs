use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use mongodb::bson::Document;
use serde::Deserialize;

use crate::collection;
use crate::errors::ApiError;
use crate::models::{ListResponse, User};
use crate::store::DocumentStore;
use crate::web_handlers::default_limit;

#[derive(Deserialize, Debug)]
pub(crate) struct UserFilter {
    #[serde(default = "default_limit")]
    limit: i64,
}

#[actix_web::get("/users")]
async fn get_users(
    store: web::Data<dyn DocumentStore>,
    filter: web::Query<UserFilter>,
) -> Result<web::Json<ListResponse>, ApiError> {
    let documents = store.query("user", Document::new(), filter.limit).await?;

    Ok(web::Json(ListResponse::from_documents(documents)))
}

#[actix_web::post("/users")]
async fn post_user(
    store: web::Data<dyn DocumentStore>,
    payload: web::Json<User>,
) -> Result<HttpResponse, ApiError> {
    let id = store.insert("user", payload.to_document()).await?;

    let body: HashMap<&str, String> = collection! {
        "id" => id
    };
    Ok(HttpResponse::Created().json(body))
}
