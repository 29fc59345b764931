use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Resource, ResourceError};
use crate::filter::Filter;
use crate::store::{DocumentId, DocumentStore};
use crate::validation::{validate_body, Violation};

/// Read, list, create and delete for one collection. Holds no state besides
/// the shared store handle.
pub struct ResourceController<R: Resource> {
    store: Arc<dyn DocumentStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceController<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceController<R> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _resource: PhantomData,
        }
    }

    pub async fn get(&self, id: &str) -> Result<R, ResourceError> {
        let id = Self::parse_id(id)?;
        match self.store.find_one(R::COLLECTION, &id).await? {
            Some(stored) => Ok(R::from_stored(stored)?),
            None => Err(ResourceError::NotFound { resource: R::NAME, id }),
        }
    }

    pub async fn list(&self, params: &HashMap<String, String>) -> Result<Vec<R>, ResourceError> {
        let filter = Filter::from_query(R::QUERY_FIELDS, R::DEFAULT_SORT, params).map_err(|e| {
            warn!("Rejected {} filter: {}", R::COLLECTION, e);
            e
        })?;
        debug!("Listing {} with {:?}", R::COLLECTION, filter);

        let stored = self
            .store
            .find(R::COLLECTION, &filter.predicate, Some(&filter.order))
            .await?;
        let records = stored.into_iter().map(R::from_stored).collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Validates before touching the store; nothing is persisted on failure.
    pub async fn create(&self, body: Value) -> Result<DocumentId, ResourceError> {
        let candidate = validate_body(&body, R::RULES).map_err(|violations| {
            warn!("Rejected new {}: {:?}", R::NAME, violations);
            ResourceError::ValidationFailed(violations)
        })?;

        let draft: R::Draft = serde_json::from_value(Value::Object(candidate.clone())).map_err(|e| {
            ResourceError::ValidationFailed(vec![Violation::new("body", format!("Malformed {}: {}", R::NAME, e))])
        })?;

        let document = R::prepare(draft)?;
        let id = self.store.insert_one(R::COLLECTION, document).await?;
        info!("Created {} {}", R::NAME, id);
        Ok(id)
    }

    /// Succeeds whether or not a record with this id existed.
    pub async fn delete(&self, id: &str) -> Result<(), ResourceError> {
        let id = Self::parse_id(id)?;
        let removed = self.store.delete_one(R::COLLECTION, &id).await?;
        info!("Deleted {} {} (removed {})", R::NAME, id, removed);
        Ok(())
    }

    fn parse_id(id: &str) -> Result<DocumentId, ResourceError> {
        id.parse().map_err(|_| ResourceError::MalformedId {
            resource: R::NAME,
            id: id.to_string(),
        })
    }
}
