//! Insert-or-replace planning for whole definitions.

use crate::buffer::SourceBuffer;
use crate::scan::{self, FunctionSpan, LocateError};

/// What to do with a definition given the current buffer state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a planned action does nothing until executed"]
pub enum PatchAction {
    /// Definition absent: splice the canonical text in fresh.
    Insert,
    /// Definition present but diverged: replace its whole span.
    Replace { existing: FunctionSpan },
    /// Definition already matches the canonical text byte for byte.
    Skip,
}

/// Decide whether a named definition needs inserting, replacing, or nothing.
///
/// Presence is judged by the exact definition marker; a marker spelled with
/// different whitespace counts as absent. Replacement always converges on
/// `canonical`, so planning against a buffer this plan produced yields
/// `Skip`. A present but unbalanced definition surfaces the locate failure
/// rather than masking it.
pub fn plan_definition(
    buffer: &SourceBuffer,
    name: &str,
    canonical: &str,
) -> Result<PatchAction, LocateError> {
    if !buffer.contains(&scan::definition_marker(name)) {
        return Ok(PatchAction::Insert);
    }

    let span = scan::locate(buffer, name)?;
    if span.text(buffer) == canonical {
        Ok(PatchAction::Skip)
    } else {
        Ok(PatchAction::Replace { existing: span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = "function Helper {\r\n    ok = 1\r\n}\r\n\r\n";

    #[test]
    fn plans_insert_when_marker_absent() {
        let buffer = SourceBuffer::new("function Other {\r\n}\r\n");
        let action = plan_definition(&buffer, "Helper", CANONICAL).unwrap();
        assert_eq!(action, PatchAction::Insert);
    }

    #[test]
    fn plans_skip_when_span_matches_canonical() {
        let text = format!("{CANONICAL}function Other {{\r\n}}\r\n");
        let buffer = SourceBuffer::new(text);
        let action = plan_definition(&buffer, "Helper", CANONICAL).unwrap();
        assert_eq!(action, PatchAction::Skip);
    }

    #[test]
    fn plans_replace_when_span_diverges() {
        let buffer = SourceBuffer::new("function Helper {\r\n    stale = 0\r\n}\r\n\r\n");
        let action = plan_definition(&buffer, "Helper", CANONICAL).unwrap();
        match action {
            PatchAction::Replace { existing } => {
                assert_eq!(existing.start, 0);
                assert_eq!(existing.end, buffer.len());
            }
            other => panic!("expected Replace, got {other:?}"),
        }
    }

    #[test]
    fn surfaces_unbalanced_definitions() {
        let buffer = SourceBuffer::new("function Helper {\r\n    never closed\r\n");
        let err = plan_definition(&buffer, "Helper", CANONICAL).unwrap_err();
        assert!(matches!(err, LocateError::UnbalancedSpan { .. }));
    }
}
