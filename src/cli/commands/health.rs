use std::sync::Arc;

use serde_json::json;

use crate::cli::OutputFormat;
use crate::store::DocumentStore;

pub async fn handle(store: Arc<dyn DocumentStore>, output_format: OutputFormat) -> anyhow::Result<()> {
    store.health_check().await?;
    match output_format {
        OutputFormat::Json => println!("{}", json!({ "status": "ok" })),
        OutputFormat::Text => println!("Store is reachable"),
    }
    Ok(())
}
