use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use mongodb::bson::Document;
use serde::Deserialize;

use crate::collection;
use crate::errors::ApiError;
use crate::models::{ListResponse, Message};
use crate::store::DocumentStore;
use crate::web_handlers::default_limit;

#[derive(Deserialize, Debug)]
pub(crate) struct MessageFilter {
    user_id: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[actix_web::get("/messages")]
async fn get_messages(
    store: web::Data<dyn DocumentStore>,
    filter: web::Query<MessageFilter>,
) -> Result<web::Json<ListResponse>, ApiError> {
    let mut query = Document::new();
    if let Some(user_id) = &filter.user_id {
        query.insert("user_id", user_id.as_str());
    }

    let documents = store.query("message", query, filter.limit).await?;
    Ok(web::Json(ListResponse::from_documents(documents)))
}

#[actix_web::post("/messages")]
async fn post_message(
    store: web::Data<dyn DocumentStore>,
    payload: web::Json<Message>,
) -> Result<HttpResponse, ApiError> {
    let id = store.insert("message", payload.to_document()).await?;

    let body: HashMap<&str, String> = collection! {
        "id" => id
    };
    Ok(HttpResponse::Created().json(body))
}
