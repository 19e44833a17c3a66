//! Drives a [`ProviderPatch`](crate::provider::ProviderPatch) across a module
//! buffer, step by step.
//!
//! Every step re-reads the latest buffer before touching it, so offsets are
//! never carried across an edit. Steps that find their work already present
//! report [`StepOutcome::AlreadyApplied`] and leave the buffer alone, which
//! makes a second run over patched text a byte-identical no-op.

use std::fmt;

use crate::buffer::SourceBuffer;
use crate::patch::errors::PatchError;
use crate::patch::guard::{plan_definition, PatchAction};
use crate::patch::mutate::apply_operation;
use crate::patch::operations::PatchOperation;
use crate::patch::rewrite::rewrite_tokens_outside;
use crate::provider::ProviderPatch;
use crate::scan::locate;

/// What a single patch step did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum StepOutcome {
    /// The step edited the buffer
    Applied,
    /// The step's work was already present
    AlreadyApplied,
}

impl StepOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, StepOutcome::Applied)
    }
}

/// One line of the run report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: String,
    pub outcome: StepOutcome,
}

impl StepReport {
    pub fn new(step: impl Into<String>, outcome: StepOutcome) -> Self {
        Self {
            step: step.into(),
            outcome,
        }
    }
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            StepOutcome::Applied => write!(f, "{}: applied", self.step),
            StepOutcome::AlreadyApplied => write!(f, "{}: already applied", self.step),
        }
    }
}

/// Runs the full retrofit against `buffer` and returns the patched buffer
/// together with a per-step report.
///
/// Steps run in declaration order: type constants, provider helper, bulk
/// insert block swap, then one preamble per call site. The first failure
/// aborts the run and the caller keeps its original buffer.
pub fn apply_provider_patch(
    buffer: &SourceBuffer,
    patch: &ProviderPatch,
) -> Result<(SourceBuffer, Vec<StepReport>), PatchError> {
    let mut reports = Vec::new();

    let (buffer, outcome) = ensure_constants(buffer, patch)?;
    reports.push(StepReport::new("ado type constants", outcome));

    let (buffer, outcome) = ensure_provider_helper(&buffer, patch)?;
    reports.push(StepReport::new("provider info helper", outcome));

    let (buffer, outcome) = rewrite_bulk_insert(&buffer, patch)?;
    reports.push(StepReport::new("bulk insert provider block", outcome));

    let mut buffer = buffer;
    for site in &patch.call_sites {
        let (next, outcome) = inject_call_site_preamble(&buffer, patch, site)?;
        reports.push(StepReport::new(format!("{site} provider preamble"), outcome));
        buffer = next;
    }

    Ok((buffer, reports))
}

/// Declares the narrow ADO type constants next to the wide ones.
fn ensure_constants(
    buffer: &SourceBuffer,
    patch: &ProviderPatch,
) -> Result<(SourceBuffer, StepOutcome), PatchError> {
    if buffer.contains(&patch.constants_marker) {
        return Ok((buffer.clone(), StepOutcome::AlreadyApplied));
    }

    let inserted = apply_operation(
        buffer,
        &PatchOperation::InsertBeforeAnchor {
            anchor: patch.constants_anchor.clone(),
            payload: patch.constants_payload.clone(),
        },
    )?;
    Ok((inserted, StepOutcome::Applied))
}

/// Installs the provider-info helper, or rewrites a drifted copy back to the
/// canonical definition.
fn ensure_provider_helper(
    buffer: &SourceBuffer,
    patch: &ProviderPatch,
) -> Result<(SourceBuffer, StepOutcome), PatchError> {
    match plan_definition(buffer, &patch.helper_name, &patch.helper_payload)? {
        PatchAction::Insert => {
            let inserted = apply_operation(
                buffer,
                &PatchOperation::InsertBeforeAnchor {
                    anchor: patch.helper_anchor.clone(),
                    payload: patch.helper_payload.clone(),
                },
            )?;
            Ok((inserted, StepOutcome::Applied))
        }
        PatchAction::Replace { .. } => {
            let replaced = apply_operation(
                buffer,
                &PatchOperation::ReplaceSpan {
                    name: patch.helper_name.clone(),
                    payload: patch.helper_payload.clone(),
                },
            )?;
            Ok((replaced, StepOutcome::Applied))
        }
        PatchAction::Skip => Ok((buffer.clone(), StepOutcome::AlreadyApplied)),
    }
}

/// Swaps the bulk-insert function's legacy name/kind block for the
/// type-resolving one, then repoints the rest of its body at the new locals.
///
/// The freshly inserted block is pinned during the token pass so its own
/// default assignments keep referring to the script-scoped constants.
fn rewrite_bulk_insert(
    buffer: &SourceBuffer,
    patch: &ProviderPatch,
) -> Result<(SourceBuffer, StepOutcome), PatchError> {
    let span = locate(buffer, &patch.bulk_insert_name)?;
    if span.text(buffer).contains(&patch.provider_block) {
        return Ok((buffer.clone(), StepOutcome::AlreadyApplied));
    }

    let swapped = apply_operation(
        buffer,
        &PatchOperation::ReplaceSubstringInSpan {
            name: patch.bulk_insert_name.clone(),
            needle: patch.legacy_block.clone(),
            payload: patch.provider_block.clone(),
        },
    )?;

    let span = locate(&swapped, &patch.bulk_insert_name)?;
    let rewritten =
        rewrite_tokens_outside(span.text(&swapped), &patch.provider_block, &patch.bulk_insert_tokens);
    let finished = apply_operation(
        &swapped,
        &PatchOperation::ReplaceSpan {
            name: patch.bulk_insert_name.clone(),
            payload: rewritten,
        },
    )?;
    Ok((finished, StepOutcome::Applied))
}

/// Injects the provider preamble after a call site's param block and repoints
/// the body's type references at the resolved locals.
fn inject_call_site_preamble(
    buffer: &SourceBuffer,
    patch: &ProviderPatch,
    site: &str,
) -> Result<(SourceBuffer, StepOutcome), PatchError> {
    let span = locate(buffer, site)?;
    if span.text(buffer).contains(&patch.preamble_marker) {
        return Ok((buffer.clone(), StepOutcome::AlreadyApplied));
    }

    let inserted = apply_operation(
        buffer,
        &PatchOperation::ReplaceSubstringInSpan {
            name: site.to_string(),
            needle: patch.param_close.clone(),
            payload: format!("{}{}", patch.param_close, patch.preamble_block),
        },
    )?;

    let span = locate(&inserted, site)?;
    let rewritten =
        rewrite_tokens_outside(span.text(&inserted), &patch.preamble_block, &patch.type_tokens);
    let finished = apply_operation(
        &inserted,
        &PatchOperation::ReplaceSpan {
            name: site.to_string(),
            payload: rewritten,
        },
    )?;
    Ok((finished, StepOutcome::Applied))
}
