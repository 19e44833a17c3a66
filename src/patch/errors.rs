use crate::edit::EditError;
use crate::scan::LocateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("anchor not found: {anchor:?}")]
    AnchorNotFound { anchor: String },

    #[error("expected block not present in {name}")]
    ExpectedBlockMissing { name: String, needle: String },

    #[error("span location failed: {0}")]
    Locate(#[from] LocateError),

    #[error("edit application failed: {0}")]
    Edit(#[from] EditError),
}
