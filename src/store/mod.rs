//! Document store collaborator.
//!
//! Records are schemaless JSON objects keyed by a store-assigned
//! [`DocumentId`]. The identifier lives beside the document, never inside it.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::filter::{OrderDirective, Predicate};

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

pub type Document = Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
#[error("Invalid document id: {0}")]
pub struct InvalidDocumentId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self).map_err(|_| InvalidDocumentId(s.to_string()))
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub document: Document,
}

/// Serializes a typed value into a document. Fails unless it is a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Query(format!("expected a JSON object, got {}", other))),
    }
}

/// Each call is a single store operation; the handle is shared across requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        order: Option<&OrderDirective>,
    ) -> Result<Vec<StoredDocument>, StoreError>;

    async fn find_one(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError>;

    async fn insert_one(&self, collection: &str, document: Document) -> Result<DocumentId, StoreError>;

    /// Returns how many documents were removed (0 or 1).
    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<u64, StoreError>;

    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Collection names double as table names, so they must be plain identifiers.
pub fn validate_collection_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidCollection(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_uuid_ids_only() {
        let id = DocumentId::new();
        assert_eq!(id.to_string().parse::<DocumentId>().unwrap(), id);
        assert!("bad".parse::<DocumentId>().is_err());
        assert!("58af3a600343927e48e87335".parse::<DocumentId>().is_err());
    }

    #[test]
    fn validates_collection_names() {
        assert!(validate_collection_name("todos").is_ok());
        assert!(validate_collection_name("_users_2").is_ok());
        assert!(validate_collection_name("").is_err());
        assert!(validate_collection_name("2users").is_err());
        assert!(validate_collection_name("users; DROP TABLE users").is_err());
    }

    #[test]
    fn to_document_requires_object() {
        assert!(to_document(&json!({"owner": "Sam"})).is_ok());
        assert!(to_document(&json!([1, 2])).is_err());
    }
}
