//! Execution of patch operations against buffer snapshots.

use crate::buffer::SourceBuffer;
use crate::edit::Edit;
use crate::patch::errors::PatchError;
use crate::patch::operations::PatchOperation;
use crate::scan;

/// Apply one operation, producing the next buffer snapshot.
///
/// The target is resolved against `buffer` itself, then spliced through the
/// verified edit primitive; the expected before-text is captured at locate
/// time, so a stale resolution cannot silently land elsewhere.
pub fn apply_operation(
    buffer: &SourceBuffer,
    operation: &PatchOperation,
) -> Result<SourceBuffer, PatchError> {
    match operation {
        PatchOperation::InsertBeforeAnchor { anchor, payload } => {
            let at = buffer
                .find(anchor)
                .ok_or_else(|| PatchError::AnchorNotFound {
                    anchor: anchor.clone(),
                })?;
            let edit = Edit::new(at, at, payload.clone(), "");
            Ok(edit.apply(buffer)?.into_buffer())
        }
        PatchOperation::ReplaceSpan { name, payload } => {
            let span = scan::locate(buffer, name)?;
            let edit = Edit::new(span.start, span.end, payload.clone(), span.text(buffer));
            Ok(edit.apply(buffer)?.into_buffer())
        }
        PatchOperation::ReplaceSubstringInSpan {
            name,
            needle,
            payload,
        } => {
            let span = scan::locate(buffer, name)?;
            let at = span.text(buffer).find(needle.as_str()).ok_or_else(|| {
                PatchError::ExpectedBlockMissing {
                    name: name.clone(),
                    needle: needle.clone(),
                }
            })?;
            let start = span.start + at;
            let edit = Edit::new(start, start + needle.len(), payload.clone(), needle.clone());
            Ok(edit.apply(buffer)?.into_buffer())
        }
    }
}

/// Apply operations left to right, each against the buffer produced by the
/// previous one.
pub fn apply_sequence(
    buffer: &SourceBuffer,
    operations: &[PatchOperation],
) -> Result<SourceBuffer, PatchError> {
    let mut current = buffer.clone();
    for operation in operations {
        current = apply_operation(&current, operation)?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_function_buffer() -> SourceBuffer {
        SourceBuffer::new(concat!(
            "function Foo {\r\n",
            "  $v = $token\r\n",
            "  $w = $token\r\n",
            "}\r\n",
            "\r\n",
            "function Bar {\r\n",
            "  $v = $token\r\n",
            "}\r\n",
        ))
    }

    #[test]
    fn insert_before_anchor_splices_payload() {
        let buffer = SourceBuffer::new("alpha\r\nomega\r\n");
        let next = apply_operation(
            &buffer,
            &PatchOperation::InsertBeforeAnchor {
                anchor: "omega".to_string(),
                payload: "middle\r\n".to_string(),
            },
        )
        .unwrap();
        assert_eq!(next.as_str(), "alpha\r\nmiddle\r\nomega\r\n");
    }

    #[test]
    fn missing_anchor_aborts() {
        let buffer = SourceBuffer::new("alpha\r\n");
        let err = apply_operation(
            &buffer,
            &PatchOperation::InsertBeforeAnchor {
                anchor: "omega".to_string(),
                payload: "x".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::AnchorNotFound { anchor } if anchor == "omega"));
    }

    #[test]
    fn replace_span_swaps_only_the_named_definition() {
        let buffer = two_function_buffer();
        let next = apply_operation(
            &buffer,
            &PatchOperation::ReplaceSpan {
                name: "Foo".to_string(),
                payload: "function Foo {\r\n  fresh\r\n}\r\n\r\n".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            next.as_str(),
            concat!(
                "function Foo {\r\n",
                "  fresh\r\n",
                "}\r\n",
                "\r\n",
                "function Bar {\r\n",
                "  $v = $token\r\n",
                "}\r\n",
            )
        );
    }

    #[test]
    fn replace_substring_hits_first_occurrence_in_span_only() {
        let buffer = two_function_buffer();
        let next = apply_operation(
            &buffer,
            &PatchOperation::ReplaceSubstringInSpan {
                name: "Foo".to_string(),
                needle: "$token".to_string(),
                payload: "$changed".to_string(),
            },
        )
        .unwrap();

        assert_eq!(
            next.as_str(),
            concat!(
                "function Foo {\r\n",
                "  $v = $changed\r\n",
                "  $w = $token\r\n",
                "}\r\n",
                "\r\n",
                "function Bar {\r\n",
                "  $v = $token\r\n",
                "}\r\n",
            )
        );
    }

    #[test]
    fn substring_search_never_leaves_the_span() {
        let buffer = two_function_buffer();
        let err = apply_operation(
            &buffer,
            &PatchOperation::ReplaceSubstringInSpan {
                name: "Foo".to_string(),
                needle: "function Bar".to_string(),
                payload: "x".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, PatchError::ExpectedBlockMissing { name, .. } if name == "Foo"));
    }

    #[test]
    fn sequence_threads_buffers_between_operations() {
        let buffer = SourceBuffer::new("C\r\n");
        let operations = vec![
            PatchOperation::InsertBeforeAnchor {
                anchor: "C".to_string(),
                payload: "B".to_string(),
            },
            PatchOperation::InsertBeforeAnchor {
                anchor: "B".to_string(),
                payload: "A".to_string(),
            },
        ];

        let next = apply_sequence(&buffer, &operations).unwrap();
        assert_eq!(next.as_str(), "ABC\r\n");
    }
}
