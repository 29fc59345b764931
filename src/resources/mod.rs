//! The two resource collections and the controller they share.

pub mod controller;
pub mod todo;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::filter::{FilterError, QueryField};
use crate::store::{to_document, Document, DocumentId, StoreError, StoredDocument};
use crate::validation::{Rule, Violation};

pub use controller::ResourceController;
pub use todo::{NewTodo, Todo};
pub use user::{NewUser, Role, User};

/// Key under which records expose their store-assigned identifier.
pub const ID_FIELD: &str = "_id";

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("The requested {resource} id wasn't a legal id: {id}")]
    MalformedId { resource: &'static str, id: String },

    #[error("The requested {resource} was not found")]
    NotFound { resource: &'static str, id: DocumentId },

    #[error(transparent)]
    BadFilterValue(#[from] FilterError),

    #[error("{}", first_message(.0))]
    ValidationFailed(Vec<Violation>),

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn first_message(violations: &[Violation]) -> &str {
    violations.first().map(|v| v.message.as_str()).unwrap_or("Validation failed")
}

/// A record variant: where it lives, how it is filtered, sorted and
/// validated, and how a validated draft becomes a stored document.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Client-supplied fields of a new record.
    type Draft: Serialize + DeserializeOwned + Send;

    const COLLECTION: &'static str;
    /// Singular name used in error messages.
    const NAME: &'static str;
    const DEFAULT_SORT: &'static str;
    const QUERY_FIELDS: &'static [QueryField];
    const RULES: &'static [Rule];

    fn prepare(draft: Self::Draft) -> Result<Document, StoreError> {
        to_document(&draft)
    }

    fn from_stored(stored: StoredDocument) -> Result<Self, StoreError> {
        let mut document = stored.document;
        document.insert(ID_FIELD.to_string(), Value::String(stored.id.to_string()));
        Ok(serde_json::from_value(Value::Object(document))?)
    }
}
