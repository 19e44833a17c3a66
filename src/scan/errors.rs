use thiserror::Error;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("definition not found: {name}")]
    DefinitionNotFound { name: String },

    #[error("unbalanced brace block in {name}: depth never returned to zero")]
    UnbalancedSpan { name: String },
}
