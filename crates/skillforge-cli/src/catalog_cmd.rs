//! Catalog commands: list and search the built-in and uploaded entries.

use anyhow::{Context, Result};
use tracing::warn;

use skillforge_core::catalog::{self, CatalogEntry, KindFilter, MatchQuality};
use skillforge_core::model::{ResourceKind, UploadedDocument};
use skillforge_store::{KeyValueStore, keys};

/// Load uploaded-document metadata from the store. An unreadable blob
/// yields an empty list.
pub async fn load_uploaded_documents(
    store: &dyn KeyValueStore,
) -> Result<Vec<UploadedDocument>> {
    let Some(json) = store.get(keys::UPLOADED_DOCUMENTS).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&json) {
        Ok(documents) => Ok(documents),
        Err(err) => {
            warn!(%err, "stored document list is unreadable, ignoring");
            Ok(Vec::new())
        }
    }
}

/// Persist uploaded-document metadata.
pub async fn save_uploaded_documents(
    store: &dyn KeyValueStore,
    documents: &[UploadedDocument],
) -> Result<()> {
    let json = serde_json::to_string(documents).context("failed to serialize document list")?;
    store.set(keys::UPLOADED_DOCUMENTS, &json).await
}

/// The full catalog as the enricher sees it: built-in internal entries,
/// uploaded documents, then the public list.
async fn full_catalog(store: &dyn KeyValueStore) -> Result<Vec<CatalogEntry>> {
    let mut entries = catalog::internal_catalog();
    entries.extend(catalog::uploaded_entries(&load_uploaded_documents(store).await?));
    entries.extend(catalog::public_catalog());
    Ok(entries)
}

/// Execute `skillforge catalog list`.
pub async fn cmd_list(store: &dyn KeyValueStore, kind: Option<ResourceKind>) -> Result<()> {
    let entries = full_catalog(store).await?;
    let mut shown = 0usize;
    for entry in &entries {
        if kind.is_some_and(|k| entry.kind != k) {
            continue;
        }
        shown += 1;
        println!("{:12} {:12} {}", entry.kind.to_string(), entry.id, entry.title);
    }
    println!("{shown} entries.");
    Ok(())
}

/// Execute `skillforge catalog search`: run the same matcher enrichment
/// uses and show what it would pick.
pub async fn cmd_search(
    store: &dyn KeyValueStore,
    query: &str,
    kind: Option<ResourceKind>,
) -> Result<()> {
    let entries = full_catalog(store).await?;
    let filter = match kind {
        Some(k) => KindFilter::Kind(k),
        None => KindFilter::Any,
    };
    match catalog::find_best_match_scored(query, filter, &entries) {
        Some((entry, quality)) => {
            println!("{}", match_summary(entry, quality));
            println!("  kind:  {}", entry.kind);
            println!("  topic: {}", entry.topic);
            println!("  url:   {}", entry.url);
        }
        None => println!("The catalog is empty."),
    }
    Ok(())
}

fn match_summary(entry: &CatalogEntry, quality: MatchQuality) -> String {
    format!("Best match ({quality:?}): {} - {}", entry.id, entry.title)
}
