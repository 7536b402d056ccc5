//! Evaluation records: validation, persistence and statistics.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillforge_store::{KeyValueStore, keys};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Minimum score counted as a pass.
pub const PASS_THRESHOLD: u8 = 70;

/// One completed module evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub id: Uuid,
    pub module_title: String,
    pub employee_name: String,
    /// 0-100.
    pub score: u8,
    pub answers: Vec<String>,
    pub passed: bool,
    pub taken_at: DateTime<Utc>,
}

impl EvaluationRecord {
    pub fn new(
        module_title: String,
        employee_name: String,
        score: u8,
        answers: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            module_title,
            employee_name,
            score,
            answers,
            passed: score >= PASS_THRESHOLD,
            taken_at: Utc::now(),
        }
    }

    /// Validate the record, collecting every problem rather than stopping
    /// at the first.
    pub fn validate(&self) -> Result<(), EvaluationValidationError> {
        let mut problems = Vec::new();
        if self.module_title.trim().is_empty() {
            problems.push("module title is required".to_owned());
        }
        if self.employee_name.trim().is_empty() {
            problems.push("employee name is required".to_owned());
        }
        if self.score > 100 {
            problems.push(format!("score must be 0-100, got {}", self.score));
        }
        if self.answers.is_empty() {
            problems.push("at least one answer is required".to_owned());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(EvaluationValidationError { problems })
        }
    }
}

/// All validation problems found in one record.
#[derive(Debug, Clone, Error)]
#[error("invalid evaluation: {}", problems.join("; "))]
pub struct EvaluationValidationError {
    pub problems: Vec<String>,
}

/// Validate and append an evaluation to the stored history. An invalid
/// record is rejected before anything is written.
pub async fn save_evaluation(store: &dyn KeyValueStore, record: &EvaluationRecord) -> Result<()> {
    record.validate()?;
    let mut history = load_history(store).await?;
    history.push(record.clone());
    let json =
        serde_json::to_string(&history).context("failed to serialize evaluation history")?;
    store.set(keys::EVALUATION_HISTORY, &json).await
}

/// Load all stored evaluations, oldest first. An unreadable blob yields an
/// empty history.
pub async fn load_history(store: &dyn KeyValueStore) -> Result<Vec<EvaluationRecord>> {
    let Some(json) = store.get(keys::EVALUATION_HISTORY).await? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&json) {
        Ok(history) => Ok(history),
        Err(err) => {
            warn!(%err, "stored evaluation history is unreadable, starting fresh");
            Ok(Vec::new())
        }
    }
}

/// Aggregate statistics over a set of evaluations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Rounded to the nearest integer; zero when there are no records.
    pub average_score: u32,
    /// Per module title, in title order.
    pub by_module: BTreeMap<String, ModuleStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    pub attempts: usize,
    pub passed: usize,
    pub average_score: u32,
}

/// Compute statistics over a slice of evaluations.
pub fn statistics(records: &[EvaluationRecord]) -> EvaluationStats {
    let total = records.len();
    let passed = records.iter().filter(|r| r.passed).count();
    let average_score = rounded_average(records.iter().map(|r| r.score));

    let mut by_module: BTreeMap<String, Vec<&EvaluationRecord>> = BTreeMap::new();
    for record in records {
        by_module
            .entry(record.module_title.clone())
            .or_default()
            .push(record);
    }

    let by_module = by_module
        .into_iter()
        .map(|(title, module_records)| {
            let stats = ModuleStats {
                attempts: module_records.len(),
                passed: module_records.iter().filter(|r| r.passed).count(),
                average_score: rounded_average(module_records.iter().map(|r| r.score)),
            };
            (title, stats)
        })
        .collect();

    EvaluationStats {
        total,
        passed,
        failed: total - passed,
        average_score,
        by_module,
    }
}

fn rounded_average(scores: impl ExactSizeIterator<Item = u8>) -> u32 {
    let count = scores.len() as u32;
    if count == 0 {
        return 0;
    }
    let sum: u32 = scores.map(u32::from).sum();
    (sum + count / 2) / count
}
