use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

fn default_stock() -> i64 {
    1
}

fn default_rating() -> f64 {
    4.8
}

fn default_one() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

fn invalid(field: &'static str, message: &'static str) -> ApiError {
    ApiError::Validation { field, message }
}

/// A catalog entry. Gear is created once and never updated or deleted
/// through this api.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Gear {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_per_day: f64,
    /// Free-form taxonomy, e.g. "tenda", "sleeping bag" or "carrier".
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Informational only, bookings don't decrement it.
    #[serde(default = "default_stock")]
    pub stock: i64,
    #[serde(default = "default_rating")]
    pub rating: f64,
}

impl Gear {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.price_per_day < 0.0 {
            return Err(invalid("price_per_day", "must not be negative"));
        }
        if self.stock < 0 {
            return Err(invalid("stock", "must not be negative"));
        }
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(invalid("rating", "must be between 0 and 5"));
        }

        Ok(())
    }

    pub fn to_document(&self) -> Document {
        doc! {
            "title": &self.title,
            "description": self.description.clone(),
            "price_per_day": self.price_per_day,
            "category": &self.category,
            "image_url": self.image_url.clone(),
            "stock": self.stock,
            "rating": self.rating,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl User {
    pub fn to_document(&self) -> Document {
        doc! {
            "name": &self.name,
            "email": &self.email,
            "phone": self.phone.clone(),
            "address": self.address.clone(),
            "avatar_url": self.avatar_url.clone(),
            "is_active": self.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
}

impl Message {
    pub fn to_document(&self) -> Document {
        doc! {
            "user_id": &self.user_id,
            "content": &self.content,
            "is_read": self.is_read,
        }
    }
}

/// Lifecycle of a rental order. Every order starts out pending, and
/// nothing in this api moves it further (see DESIGN.md).
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Paid,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Paid => "paid",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

/// One line of a rental request. Only lives embedded in a transaction,
/// it has no identity of its own.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TransactionItem {
    pub gear_id: String,
    #[serde(default = "default_one")]
    pub quantity: i64,
    #[serde(default = "default_one")]
    pub days: i64,
}

impl TransactionItem {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.quantity < 1 {
            return Err(invalid("quantity", "must be at least 1"));
        }
        if self.days < 1 {
            return Err(invalid("days", "must be at least 1"));
        }

        Ok(())
    }

    pub fn to_document(&self) -> Document {
        doc! {
            "gear_id": &self.gear_id,
            "quantity": self.quantity,
            "days": self.days,
        }
    }
}

/// Body of `POST /api/transactions`. The total is computed server side,
/// clients never send one.
#[derive(Deserialize, Clone, Debug)]
pub struct TransactionRequest {
    pub user_id: String,
    pub items: Vec<TransactionItem>,
}

impl TransactionRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.items.is_empty() {
            return Err(invalid("items", "must not be empty"));
        }
        for item in &self.items {
            item.validate()?;
        }

        Ok(())
    }
}

/// A priced rental order the way it is stored. The total is a snapshot
/// taken at creation time, later price changes don't touch it.
#[derive(Serialize, Clone, Debug)]
pub struct Transaction {
    pub user_id: String,
    pub items: Vec<TransactionItem>,
    pub total_amount: f64,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn to_document(&self) -> Document {
        doc! {
            "user_id": &self.user_id,
            "items": self.items.iter().map(TransactionItem::to_document).collect::<Vec<Document>>(),
            "total_amount": self.total_amount,
            "status": self.status.as_str(),
        }
    }
}

/// What `POST /api/transactions` answers with.
#[derive(Serialize, Debug)]
pub struct TransactionReceipt {
    pub id: String,
    pub total_amount: f64,
    pub status: TransactionStatus,
}

/// Outward-facing view of a stored document. The storage identifier is
/// replaced by a plain string `id` field, so clients never see `_id` or
/// the driver's extended-json form of an ObjectId.
#[derive(Clone, Debug)]
pub struct PublicRecord(Document);

impl From<Document> for PublicRecord {
    fn from(mut document: Document) -> PublicRecord {
        if let Some(id) = document.remove("_id") {
            let id = match id {
                Bson::ObjectId(id) => id.to_hex(),
                Bson::String(id) => id,
                other => other.to_string(),
            };
            document.insert("id", id);
        }

        PublicRecord(document)
    }
}

impl Serialize for PublicRecord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Uniform shape of every list endpoint.
#[derive(Serialize, Debug)]
pub struct ListResponse {
    pub items: Vec<PublicRecord>,
}

impl ListResponse {
    pub fn from_documents(documents: Vec<Document>) -> ListResponse {
        ListResponse {
            items: documents.into_iter().map(PublicRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;

    use super::*;

    #[test]
    fn gear_defaults_apply_when_fields_are_absent() {
        let gear: Gear = serde_json::from_value(json!({
            "title": "Alpine tent",
            "price_per_day": 10.0,
            "category": "tenda",
        }))
        .unwrap();

        assert_eq!(gear.stock, 1);
        assert_eq!(gear.rating, 4.8);
        assert!(gear.description.is_none());
        assert!(gear.validate().is_ok());
    }

    #[test]
    fn gear_bounds_are_enforced_by_field() {
        let mut gear: Gear = serde_json::from_value(json!({
            "title": "Alpine tent",
            "price_per_day": -1.0,
            "category": "tenda",
        }))
        .unwrap();

        match gear.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "price_per_day"),
            other => panic!("unexpected error: {other:?}"),
        }

        gear.price_per_day = 10.0;
        gear.rating = 5.5;
        match gear.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "rating"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn transaction_items_default_to_one_of_each() {
        let item: TransactionItem = serde_json::from_value(json!({ "gear_id": "abc" })).unwrap();

        assert_eq!(item.quantity, 1);
        assert_eq!(item.days, 1);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn zero_quantity_and_zero_days_are_rejected() {
        let item: TransactionItem =
            serde_json::from_value(json!({ "gear_id": "abc", "quantity": 0 })).unwrap();
        match item.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "quantity"),
            other => panic!("unexpected error: {other:?}"),
        }

        let item: TransactionItem =
            serde_json::from_value(json!({ "gear_id": "abc", "days": 0 })).unwrap();
        match item.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "days"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn a_transaction_request_needs_at_least_one_item() {
        let request: TransactionRequest =
            serde_json::from_value(json!({ "user_id": "U1", "items": [] })).unwrap();

        match request.validate().unwrap_err() {
            ApiError::Validation { field, .. } => assert_eq!(field, "items"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn user_and_message_defaults_apply() {
        let user: User =
            serde_json::from_value(json!({ "name": "Ana", "email": "ana@example.com" })).unwrap();
        assert!(user.is_active);
        assert!(user.phone.is_none());

        let message: Message =
            serde_json::from_value(json!({ "user_id": "U1", "content": "hi" })).unwrap();
        assert!(!message.is_read);
    }

    #[test]
    fn public_records_rename_the_storage_id() {
        let id = ObjectId::new();
        let record = PublicRecord::from(doc! { "_id": id, "title": "Alpine tent" });

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(id.to_hex()));
        assert_eq!(value["title"], json!("Alpine tent"));
        assert!(value.get("_id").is_none());
    }

    #[test]
    fn statuses_serialize_lowercase() {
        assert_eq!(serde_json::to_value(TransactionStatus::Pending).unwrap(), json!("pending"));
        assert_eq!(TransactionStatus::Cancelled.as_str(), "cancelled");
    }
}
