//! Lexical definition-span location over raw module text.
//!
//! No parser is involved: a span comes from a literal opening marker plus a
//! brace-depth count, which is exactly as precise as the host text allows.

pub mod errors;
pub mod locator;

pub use errors::LocateError;
pub use locator::{definition_marker, locate, FunctionSpan};
