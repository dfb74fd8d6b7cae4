//! The transaction pricing workflow.
//!
//! Resolves every requested gear item against the catalog, sums up the
//! rental total and persists the order. Gear is looked up one item at a
//! time, which costs a store round-trip per item but keeps the flow easy
//! to follow. Nothing here retries and nothing reserves stock, the same
//! request submitted twice creates two independent orders.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};

use crate::errors::ApiError;
use crate::models::{Transaction, TransactionReceipt, TransactionRequest, TransactionStatus};
use crate::store::DocumentStore;

/// Prices `request` and stores it as a new pending transaction.
///
/// All gear ids are resolved before anything is written, so a request
/// naming an unknown gear id fails as a whole and leaves the store
/// untouched. The total is summed in the order the items were submitted.
pub async fn create_transaction(
    store: &dyn DocumentStore,
    request: TransactionRequest,
) -> Result<TransactionReceipt, ApiError> {
    request.validate()?;

    let mut total = 0.0_f64;
    for item in &request.items {
        let gear = find_gear(store, &item.gear_id).await?;
        total += price_per_day(&gear) * item.quantity as f64 * item.days as f64;
    }

    let transaction = Transaction {
        user_id: request.user_id,
        items: request.items,
        total_amount: total,
        status: TransactionStatus::Pending,
    };

    let id = store.insert("transaction", transaction.to_document()).await?;

    Ok(TransactionReceipt {
        id,
        total_amount: transaction.total_amount,
        status: transaction.status,
    })
}

async fn find_gear(store: &dyn DocumentStore, gear_id: &str) -> Result<Document, ApiError> {
    // An id that doesn't parse can't match any stored gear record,
    // so it fails the same way as an absent one.
    let id = ObjectId::parse_str(gear_id).map_err(|_| ApiError::GearNotFound(gear_id.to_string()))?;

    let mut matches = store.query("gear", doc! { "_id": id }, 1).await?;
    if matches.is_empty() {
        return Err(ApiError::GearNotFound(gear_id.to_string()));
    }

    Ok(matches.remove(0))
}

/// Stored gear documents are schema flexible. A missing or non-numeric
/// price counts as zero instead of failing the whole order.
fn price_per_day(gear: &Document) -> f64 {
    match gear.get("price_per_day") {
        Some(Bson::Double(price)) => *price,
        Some(Bson::Int32(price)) => f64::from(*price),
        Some(Bson::Int64(price)) => *price as f64,
        _ => 0.0,
    }
}
