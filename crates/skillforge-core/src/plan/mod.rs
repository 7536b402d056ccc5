//! Plan parsing and persistence.

pub mod parser;

use anyhow::{Context, Result};
use skillforge_store::{KeyValueStore, keys};
use tracing::warn;

use crate::model::{PlanRecord, TrainingPlan};

/// Persist the current plan, replacing any previous one.
pub async fn save_current_plan(store: &dyn KeyValueStore, plan: &TrainingPlan) -> Result<()> {
    let json = serde_json::to_string(plan).context("failed to serialize plan")?;
    store.set(keys::TRAINING_PLAN, &json).await
}

/// Load the stored plan, if any. An unparseable blob (a leftover from an
/// older persisted shape) is treated as absent.
pub async fn load_current_plan(store: &dyn KeyValueStore) -> Result<Option<TrainingPlan>> {
    let Some(json) = store.get(keys::TRAINING_PLAN).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&json) {
        Ok(plan) => Ok(Some(plan)),
        Err(err) => {
            warn!(%err, "stored plan is unreadable, ignoring");
            Ok(None)
        }
    }
}

/// Append one generation record to the plan history blob.
pub async fn append_history(store: &dyn KeyValueStore, record: &PlanRecord) -> Result<()> {
    let mut history = load_history(store).await?;
    history.push(record.clone());
    let json = serde_json::to_string(&history).context("failed to serialize plan history")?;
    store.set(keys::PLAN_HISTORY, &json).await
}

/// Load the full plan history, newest last. Unreadable blobs yield an
/// empty history rather than an error.
pub async fn load_history(store: &dyn KeyValueStore) -> Result<Vec<PlanRecord>> {
    let Some(json) = store.get(keys::PLAN_HISTORY).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&json) {
        Ok(history) => Ok(history),
        Err(err) => {
            warn!(%err, "stored plan history is unreadable, starting fresh");
            Ok(Vec::new())
        }
    }
}
