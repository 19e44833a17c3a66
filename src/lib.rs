//! PSM Patcher: provider-aware ADODB type retrofit for a PowerShell module
//!
//! An idempotent source patcher built on byte-span replacement primitives
//! with a brace-depth function locator for span acquisition.
//!
//! # Architecture
//!
//! All mutations compile down to a single primitive: [`Edit`], which
//! represents a verified byte-span replacement. Intelligence lives in span
//! acquisition (brace-depth scanning) and step planning, not in the
//! application logic. Every patch step re-locates its target against the
//! latest buffer, so offsets never go stale across edits.
//!
//! # Safety
//!
//! - All edits verify expected before-text before applying
//! - Atomic file writes (tempfile + fsync + rename)
//! - Line endings are detected once and preserved byte-for-byte
//! - Idempotent operations: a second run is a byte-identical no-op
//!
//! # Example
//!
//! ```
//! use psm_patcher::{Edit, SourceBuffer};
//!
//! let buffer = SourceBuffer::new("hello world");
//! let edit = Edit::new(0, 5, "HELLO", "hello");
//!
//! let patched = edit.apply(&buffer)?.into_buffer();
//! assert_eq!(patched.as_str(), "HELLO world");
//! # Ok::<(), psm_patcher::EditError>(())
//! ```

pub mod buffer;
pub mod edit;
pub mod patch;
pub mod provider;
pub mod scan;
pub mod store;

// Re-exports
pub use buffer::{LineEnding, SourceBuffer};
pub use edit::{Edit, EditError, EditResult, EditVerification};
pub use patch::{
    apply_provider_patch, PatchError, PatchOperation, StepOutcome, StepReport, TokenMap,
};
pub use provider::{ProviderPatch, TypeCodes};
pub use scan::{locate, FunctionSpan, LocateError};
pub use store::{ModuleStore, StoreError};
