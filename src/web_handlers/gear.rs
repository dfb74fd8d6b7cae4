use std::collections::HashMap;

use actix_web::{web, HttpResponse};
use mongodb::bson::Document;
use serde::Deserialize;

use crate::collection;
use crate::errors::ApiError;
use crate::models::{Gear, ListResponse};
use crate::store::DocumentStore;
use crate::web_handlers::default_limit;

#[derive(Deserialize, Debug)]
pub(crate) struct GearFilter {
    category: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[actix_web::get("/gear")]
async fn get_gear(
    store: web::Data<dyn DocumentStore>,
    filter: web::Query<GearFilter>,
) -> Result<web::Json<ListResponse>, ApiError> {
    let mut query = Document::new();
    if let Some(category) = &filter.category {
        query.insert("category", category.as_str());
    }

    let documents = store.query("gear", query, filter.limit).await?;
    Ok(web::Json(ListResponse::from_documents(documents)))
}

#[actix_web::post("/gear")]
async fn post_gear(
    store: web::Data<dyn DocumentStore>,
    payload: web::Json<Gear>,
) -> Result<HttpResponse, ApiError> {
    let gear = payload.into_inner();
    gear.validate()?;

    let id = store.insert("gear", gear.to_document()).await?;
    let body: HashMap<&str, String> = collection! {
        "id" => id
    };
    Ok(HttpResponse::Created().json(body))
}
