use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use regex::RegexBuilder;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{validate_collection_name, Document, DocumentId, DocumentStore, StoreError, StoredDocument};
use crate::filter::{Clause, Condition, OrderDirective, Predicate};

type Collections = Arc<RwLock<HashMap<String, Vec<StoredDocument>>>>;

/// In-process store. Collections keep insertion order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Collections,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document under a caller-chosen id, for fixtures.
    pub async fn insert_with_id(&self, collection: &str, id: DocumentId, document: Document) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { id, document });
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        order: Option<&OrderDirective>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        validate_collection_name(collection)?;
        let matcher = Matcher::compile(predicate)?;
        let collections = self.collections.read().await;
        let mut found: Vec<StoredDocument> = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| matcher.matches(&d.document)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = order {
            found.sort_by(|a, b| {
                let ordering = compare_field(a, b, &order.field);
                if order.is_descending() { ordering.reverse() } else { ordering }
            });
        }
        Ok(found)
    }

    async fn find_one(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
        validate_collection_name(collection)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == *id).cloned()))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new();
        self.insert_with_id(collection, id, document).await?;
        Ok(id)
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<u64, StoreError> {
        validate_collection_name(collection)?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match docs.iter().position(|d| d.id == *id) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        self.collections.write().await.remove(collection);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Predicate with its patterns compiled once per query.
struct Matcher<'a> {
    clauses: Vec<(&'a Clause, Option<regex::Regex>)>,
}

impl<'a> Matcher<'a> {
    fn compile(predicate: &'a Predicate) -> Result<Self, StoreError> {
        let mut clauses = Vec::with_capacity(predicate.clauses.len());
        for clause in &predicate.clauses {
            let regex = match &clause.condition {
                Condition::Matches { pattern, case_insensitive } => Some(
                    RegexBuilder::new(pattern)
                        .case_insensitive(*case_insensitive)
                        .build()
                        .map_err(|e| StoreError::Query(format!("invalid pattern for {}: {}", clause.field, e)))?,
                ),
                Condition::Equals(_) => None,
            };
            clauses.push((clause, regex));
        }
        Ok(Self { clauses })
    }

    fn matches(&self, document: &Document) -> bool {
        self.clauses.iter().all(|(clause, regex)| {
            let value = document.get(&clause.field);
            match (&clause.condition, regex) {
                (Condition::Equals(expected), _) => value == Some(expected),
                (Condition::Matches { .. }, Some(regex)) => {
                    value.and_then(Value::as_str).is_some_and(|s| regex.is_match(s))
                }
                (Condition::Matches { .. }, None) => false,
            }
        })
    }
}

fn compare_field(a: &StoredDocument, b: &StoredDocument, field: &str) -> Ordering {
    if field == "_id" {
        return a.id.as_uuid().cmp(b.id.as_uuid());
    }
    compare_values(a.document.get(field), b.document.get(field))
}

/// absent/null < bool < number < string < array < object
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
