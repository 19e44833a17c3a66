use crate::buffer::SourceBuffer;
use crate::scan::errors::LocateError;

/// Keyword introducing a named definition in the host text.
const DEFINITION_KEYWORD: &str = "function";

/// Resolved location of a named definition within one buffer snapshot.
///
/// The range is half-open: `start` is the offset of the opening marker,
/// `end` is just past the closing brace and any line breaks that follow it,
/// so a span carries its own trailing blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpan {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl FunctionSpan {
    /// The span's text within the buffer it was located against.
    pub fn text<'a>(&self, buffer: &'a SourceBuffer) -> &'a str {
        &buffer.as_str()[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Literal opening marker for a named definition.
pub fn definition_marker(name: &str) -> String {
    format!("{DEFINITION_KEYWORD} {name}")
}

/// Locate a named definition's full brace block in the buffer.
///
/// The scan arms itself at the first `{` after the marker; until then no
/// brace affects the count, so parameter lists and stray closing braces
/// between the marker and the body are skipped over. The moment depth
/// returns to zero after arming, the span closes.
///
/// This is a purely lexical scan. Braces inside string literals or comments
/// are counted like any other, so a definition embedding unbalanced brace
/// characters in its text will corrupt the result.
pub fn locate(buffer: &SourceBuffer, name: &str) -> Result<FunctionSpan, LocateError> {
    let marker = definition_marker(name);
    let start = buffer
        .find(&marker)
        .ok_or_else(|| LocateError::DefinitionNotFound {
            name: name.to_string(),
        })?;

    let bytes = buffer.as_str().as_bytes();
    let mut depth: usize = 0;
    let mut armed = false;

    for (i, &byte) in bytes[start..].iter().enumerate() {
        match byte {
            b'{' => {
                depth += 1;
                armed = true;
            }
            b'}' if armed => {
                depth -= 1;
                if depth == 0 {
                    let mut end = start + i + 1;
                    while end < bytes.len() && (bytes[end] == b'\r' || bytes[end] == b'\n') {
                        end += 1;
                    }
                    return Ok(FunctionSpan {
                        name: name.to_string(),
                        start,
                        end,
                    });
                }
            }
            _ => {}
        }
    }

    Err(LocateError::UnbalancedSpan {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_function_buffer() -> SourceBuffer {
        SourceBuffer::new(concat!(
            "function Foo {\r\n",
            "  x = 1\r\n",
            "}\r\n",
            "\r\n",
            "function Bar {\r\n",
            "}\r\n",
        ))
    }

    #[test]
    fn locates_first_definition_with_trailing_blank_line() {
        let buffer = two_function_buffer();
        let span = locate(&buffer, "Foo").unwrap();

        assert_eq!(span.start, 0);
        assert_eq!(span.end, 30);
        assert_eq!(span.len(), 30);
        assert_eq!(span.text(&buffer), "function Foo {\r\n  x = 1\r\n}\r\n\r\n");
    }

    #[test]
    fn locates_second_definition_up_to_buffer_end() {
        let buffer = two_function_buffer();
        let span = locate(&buffer, "Bar").unwrap();

        assert_eq!(span.start, 30);
        assert_eq!(span.end, buffer.len());
        assert_eq!(span.text(&buffer), "function Bar {\r\n}\r\n");
    }

    #[test]
    fn counts_nested_and_inline_braces() {
        let buffer = SourceBuffer::new(concat!(
            "function Outer {\r\n",
            "  if ($x) {\r\n",
            "    $map = @{ a = 1 }\r\n",
            "  }\r\n",
            "}\r\n",
            "rest",
        ));
        let span = locate(&buffer, "Outer").unwrap();

        assert_eq!(span.end, buffer.len() - "rest".len());
        assert!(span.text(&buffer).ends_with("}\r\n"));
    }

    #[test]
    fn ignores_closing_braces_before_the_block_opens() {
        let buffer = SourceBuffer::new(concat!(
            "function Weird ($a) # }\r\n",
            "{\r\n",
            "  body\r\n",
            "}\r\n",
        ));
        let span = locate(&buffer, "Weird").unwrap();
        assert_eq!(span.end, buffer.len());
    }

    #[test]
    fn swallows_bare_lf_terminators() {
        let buffer = SourceBuffer::new("function Foo {\n  y\n}\nnext");
        let span = locate(&buffer, "Foo").unwrap();
        assert_eq!(span.text(&buffer), "function Foo {\n  y\n}\n");
    }

    #[test]
    fn missing_definition_is_reported_by_name() {
        let buffer = two_function_buffer();
        let err = locate(&buffer, "Baz").unwrap_err();
        assert!(matches!(err, LocateError::DefinitionNotFound { name } if name == "Baz"));
    }

    #[test]
    fn unclosed_block_is_unbalanced() {
        let buffer = SourceBuffer::new("function Foo {\r\n  x = 1\r\n");
        let err = locate(&buffer, "Foo").unwrap_err();
        assert!(matches!(err, LocateError::UnbalancedSpan { name } if name == "Foo"));
    }

    #[test]
    fn marker_without_any_brace_is_unbalanced() {
        let buffer = SourceBuffer::new("function Foo\r\nfoo = 1\r\n");
        let err = locate(&buffer, "Foo").unwrap_err();
        assert!(matches!(err, LocateError::UnbalancedSpan { .. }));
    }
}
