use actix_web::{web, HttpResponse};
use mongodb::bson::Document;
use serde::Deserialize;

use crate::errors::ApiError;
use crate::models::{ListResponse, TransactionRequest};
use crate::pricing;
use crate::store::DocumentStore;
use crate::web_handlers::default_limit;

#[derive(Deserialize, Debug)]
pub(crate) struct TransactionFilter {
    user_id: Option<String>,
    status: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[actix_web::get("/transactions")]
async fn get_transactions(
    store: web::Data<dyn DocumentStore>,
    filter: web::Query<TransactionFilter>,
) -> Result<web::Json<ListResponse>, ApiError> {
    let mut query = Document::new();
    if let Some(user_id) = &filter.user_id {
        query.insert("user_id", user_id.as_str());
    }
    if let Some(status) = &filter.status {
        query.insert("status", status.as_str());
    }

    let documents = store.query("transaction", query, filter.limit).await?;
    Ok(web::Json(ListResponse::from_documents(documents)))
}

/// Prices the requested items and stores the resulting order. The
/// actual workflow lives in [`crate::pricing`], this handler only
/// translates between http and the workflow.
#[actix_web::post("/transactions")]
async fn post_transaction(
    store: web::Data<dyn DocumentStore>,
    payload: web::Json<TransactionRequest>,
) -> Result<HttpResponse, ApiError> {
    let receipt = pricing::create_transaction(store.get_ref(), payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(receipt))
}
