//! Patch planning and application over buffer snapshots.
//!
//! Operations never carry stored offsets: each one re-locates its target
//! against the buffer it is applied to, so a step can only ever see the
//! state its predecessor actually produced.

pub mod applicator;
pub mod errors;
pub mod guard;
pub mod mutate;
pub mod operations;
pub mod rewrite;

pub use applicator::{apply_provider_patch, StepOutcome, StepReport};
pub use errors::PatchError;
pub use guard::{plan_definition, PatchAction};
pub use mutate::{apply_operation, apply_sequence};
pub use operations::PatchOperation;
pub use rewrite::{rewrite_tokens, rewrite_tokens_outside, TokenMap};
