//! Evaluation commands: submit results and show aggregate statistics.

use anyhow::Result;

use skillforge_core::eval::{self, EvaluationRecord};
use skillforge_store::KeyValueStore;

/// Execute `skillforge eval submit`.
pub async fn cmd_submit(
    store: &dyn KeyValueStore,
    module: String,
    name: String,
    score: u8,
    answers: Vec<String>,
) -> Result<()> {
    let record = EvaluationRecord::new(module, name, score, answers);
    eval::save_evaluation(store, &record).await?;
    println!(
        "Recorded: {} scored {} on {:?} ({})",
        record.employee_name,
        record.score,
        record.module_title,
        if record.passed { "passed" } else { "failed" }
    );
    Ok(())
}

/// Execute `skillforge eval stats`.
pub async fn cmd_stats(store: &dyn KeyValueStore) -> Result<()> {
    let history = eval::load_history(store).await?;
    if history.is_empty() {
        println!("No evaluations recorded yet.");
        return Ok(());
    }
    let stats = eval::statistics(&history);
    println!(
        "{} evaluation(s): {} passed, {} failed, average score {}",
        stats.total, stats.passed, stats.failed, stats.average_score
    );
    for (module, module_stats) in &stats.by_module {
        println!(
            "  {module}: {}/{} passed, average {}",
            module_stats.passed, module_stats.attempts, module_stats.average_score
        );
    }
    Ok(())
}
