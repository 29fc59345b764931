use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::{validate_collection_name, Document, DocumentId, DocumentStore, StoreError, StoredDocument};
use crate::config::StoreConfig;
use crate::filter::{Filter, OrderDirective, Predicate, SqlParam};

/// PostgreSQL-backed document store: one `(id UUID, doc JSONB)` table per
/// collection, created the first time the collection is touched.
pub struct PgDocumentStore {
    pool: PgPool,
    collections: Arc<RwLock<HashSet<String>>>,
    query_logging: bool,
}

impl PgDocumentStore {
    /// Connects and creates the tables for `collections` before serving.
    pub async fn connect(config: &StoreConfig, collections: &[&str]) -> Result<Self, StoreError> {
        let database_url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("DATABASE_URL is not set".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;

        info!("Connected document store at {}", redacted_url(database_url));
        let store = Self::from_pool(pool, config.enable_query_logging);
        for collection in collections {
            store.ensure_collection(collection).await?;
        }
        Ok(store)
    }

    pub fn from_pool(pool: PgPool, query_logging: bool) -> Self {
        Self {
            pool,
            collections: Arc::new(RwLock::new(HashSet::new())),
            query_logging,
        }
    }

    /// Creates the collection table if this handle has not seen it yet.
    async fn ensure_collection(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        {
            let known = self.collections.read().await;
            if known.contains(collection) {
                return Ok(());
            }
        }

        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (id UUID PRIMARY KEY, doc JSONB NOT NULL)",
            collection
        );
        self.log_query(&ddl);
        match sqlx::query(&ddl).execute(&self.pool).await {
            Ok(_) => {}
            Err(e) if is_already_exists(&e) => debug!("Collection table {} was created concurrently", collection),
            Err(e) => return Err(map_sqlx_error(e)),
        }

        self.collections.write().await.insert(collection.to_string());
        info!("Ensured collection table: {}", collection);
        Ok(())
    }

    fn log_query(&self, sql: &str) {
        if self.query_logging {
            debug!("SQL: {}", sql);
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find(
        &self,
        collection: &str,
        predicate: &Predicate,
        order: Option<&OrderDirective>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        self.ensure_collection(collection).await?;
        let sql = Filter::to_sql(predicate, order, collection);
        self.log_query(&sql.query);

        let rows = bind_params(sqlx::query(&sql.query), sql.params)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.iter().map(row_to_document).collect()
    }

    async fn find_one(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, StoreError> {
        self.ensure_collection(collection).await?;
        let sql = format!("SELECT id, doc FROM \"{}\" WHERE id = $1", collection);
        self.log_query(&sql);

        let row = sqlx::query(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        row.as_ref().map(row_to_document).transpose()
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<DocumentId, StoreError> {
        self.ensure_collection(collection).await?;
        let id = DocumentId::new();
        let sql = format!("INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)", collection);
        self.log_query(&sql);

        sqlx::query(&sql)
            .bind(*id.as_uuid())
            .bind(Json(document))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(id)
    }

    async fn delete_one(&self, collection: &str, id: &DocumentId) -> Result<u64, StoreError> {
        self.ensure_collection(collection).await?;
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", collection);
        self.log_query(&sql);

        let result = sqlx::query(&sql)
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn drop_collection(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        let sql = format!("DROP TABLE IF EXISTS \"{}\"", collection);
        self.log_query(&sql);

        sqlx::query(&sql).execute(&self.pool).await.map_err(map_sqlx_error)?;
        self.collections.write().await.remove(collection);
        info!("Dropped collection table: {}", collection);
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

fn bind_params<'q>(mut query: Query<'q, Postgres, PgArguments>, params: Vec<SqlParam>) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            SqlParam::Text(text) => query.bind(text),
            SqlParam::Json(value) => query.bind(Json(value)),
        };
    }
    query
}

fn row_to_document(row: &PgRow) -> Result<StoredDocument, StoreError> {
    let id: Uuid = row.try_get("id")?;
    let Json(document): Json<Document> = row.try_get("doc")?;
    Ok(StoredDocument { id: id.into(), document })
}

/// unique_violation on the catalog and duplicate_table, both raised when
/// another session wins a `CREATE TABLE IF NOT EXISTS` race.
const ALREADY_EXISTS_CODES: &[&str] = &["23505", "42P07"];

fn is_already_exists(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().is_some_and(|code| is_already_exists_code(&code)),
        _ => false,
    }
}

fn is_already_exists_code(code: &str) -> bool {
    ALREADY_EXISTS_CODES.contains(&code)
}

fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Sqlx(other),
    }
}

/// Connection string with the password removed, for logs.
fn redacted_url(database_url: &str) -> String {
    match url::Url::parse(database_url) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}
