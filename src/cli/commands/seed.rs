use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::resources::{Resource, ResourceController, ResourceError, Todo, User};
use crate::store::DocumentStore;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Collection {
    Todos,
    Users,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    #[arg(value_enum, help = "Target collection")]
    pub collection: Collection,

    #[arg(help = "JSON file containing an array of records")]
    pub file: PathBuf,

    #[arg(long, help = "Empty the collection before loading")]
    pub drop: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    pub collection: &'static str,
    pub inserted: usize,
    pub rejected: Vec<Rejected>,
}

#[derive(Debug, Serialize)]
pub struct Rejected {
    pub index: usize,
    pub reason: String,
}

pub async fn handle(args: SeedArgs, store: Arc<dyn DocumentStore>, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let records = parse_records(&raw).with_context(|| format!("invalid seed file {}", args.file.display()))?;

    let report = match args.collection {
        Collection::Todos => seed::<Todo>(store, records, args.drop).await?,
        Collection::Users => seed::<User>(store, records, args.drop).await?,
    };

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("Inserted {} record(s) into {}", report.inserted, report.collection);
            for rejected in &report.rejected {
                println!("  skipped #{}: {}", rejected.index, rejected.reason);
            }
        }
    }
    Ok(())
}

fn parse_records(raw: &str) -> anyhow::Result<Vec<Value>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(records) => Ok(records),
        _ => anyhow::bail!("expected a JSON array of records"),
    }
}

/// Each record goes through the same validation as the create endpoint;
/// invalid records are reported and skipped.
pub async fn seed<R: Resource>(
    store: Arc<dyn DocumentStore>,
    records: Vec<Value>,
    drop: bool,
) -> anyhow::Result<SeedReport> {
    if drop {
        store.drop_collection(R::COLLECTION).await?;
        tracing::info!("Dropped collection {}", R::COLLECTION);
    }

    let controller = ResourceController::<R>::new(store);
    let mut report = SeedReport { collection: R::COLLECTION, ..Default::default() };

    for (index, record) in records.into_iter().enumerate() {
        match controller.create(record).await {
            Ok(_) => report.inserted += 1,
            Err(ResourceError::ValidationFailed(violations)) => {
                let reason = violations.iter().map(|v| v.message.as_str()).collect::<Vec<_>>().join("; ");
                report.rejected.push(Rejected { index, reason });
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(report)
}
