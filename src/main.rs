use anyhow::{Context, Result};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use psm_patcher::patch::{apply_provider_patch, StepOutcome};
use psm_patcher::provider::{ProviderPatch, TypeCodes};
use psm_patcher::store::ModuleStore;

/// Module the retrofit targets, relative to the working directory.
const MODULE_PATH: &str = "Modules/ParserPersistenceModule.psm1";

fn main() -> Result<()> {
    let store = ModuleStore::new(MODULE_PATH);
    let original = store
        .load()
        .with_context(|| format!("cannot load {MODULE_PATH}"))?;

    let patch = ProviderPatch::new(TypeCodes::default(), original.line_ending());
    let (patched, reports) = apply_provider_patch(&original, &patch)
        .with_context(|| format!("patching {MODULE_PATH} failed"))?;

    let applied = reports
        .iter()
        .filter(|report| report.outcome.is_applied())
        .count();
    let already_applied = reports.len() - applied;
    for report in &reports {
        match report.outcome {
            StepOutcome::Applied => {
                println!("{} {}: applied", "✓".green(), report.step);
            }
            StepOutcome::AlreadyApplied => {
                println!("{} {}: already applied", "⊙".yellow(), report.step);
            }
        }
    }

    if patched.as_str() == original.as_str() {
        println!();
        println!("{}", "Module already fully patched; nothing written".yellow());
        return Ok(());
    }

    display_diff(original.as_str(), patched.as_str());

    store
        .persist(&patched)
        .with_context(|| format!("cannot write {MODULE_PATH}"))?;

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} applied", format!("{}", applied).green());
    println!(
        "  {} already applied",
        format!("{}", already_applied).yellow()
    );

    Ok(())
}

fn display_diff(original: &str, modified: &str) {
    println!("\n{}", format!("--- {} (original)", MODULE_PATH).dimmed());
    println!("{}", format!("+++ {} (patched)", MODULE_PATH).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
