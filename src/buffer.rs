//! In-memory representation of the module being patched.
//!
//! A [`SourceBuffer`] is an immutable snapshot of the full file text. Every
//! mutation produces a fresh buffer; byte offsets computed against one
//! snapshot are never valid against another.

/// Line-ending convention of a loaded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Crlf,
    Lf,
}

impl LineEnding {
    /// Detect the convention from buffer contents.
    ///
    /// Any CRLF pair marks the whole buffer as CRLF. A buffer without one,
    /// including a buffer with no line breaks at all, is treated as LF.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::Crlf
        } else {
            LineEnding::Lf
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
        }
    }

    /// Render a template whose line breaks are bare `\n` into this convention.
    ///
    /// Payload templates are stored newline-agnostic so the same canonical
    /// text can be spliced into either kind of file without mixing endings.
    pub fn render(&self, template: &str) -> String {
        match self {
            LineEnding::Crlf => template.replace('\n', "\r\n"),
            LineEnding::Lf => template.to_string(),
        }
    }
}

/// Immutable snapshot of the target file's full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of the first occurrence of `needle`, if any.
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.text.find(needle)
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }

    /// The convention this buffer was written with.
    pub fn line_ending(&self) -> LineEnding {
        LineEnding::detect(&self.text)
    }
}

impl From<String> for SourceBuffer {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
