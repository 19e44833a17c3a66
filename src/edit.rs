use crate::buffer::SourceBuffer;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

/// The fundamental edit primitive: byte-span replacement with verification.
///
/// All high-level operations (anchored inserts, span replacement, scoped
/// token rewrites) compile down to this single primitive. Intelligence lives
/// in span acquisition, not application.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "Edit does nothing until apply() is called"]
pub struct Edit {
    /// Starting byte offset (inclusive)
    pub byte_start: usize,
    /// Ending byte offset (exclusive)
    pub byte_end: usize,
    /// New text to insert at [byte_start, byte_end)
    pub new_text: String,
    /// Verification of what we expect to find before applying
    pub expected_before: EditVerification,
}

/// Verification strategy for edit safety.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditVerification {
    /// Exact text match required
    ExactMatch(String),
    /// xxh3 hash of expected text (faster for large spans)
    Hash(u64),
}

impl EditVerification {
    /// Check if the provided text matches the verification criteria.
    pub fn matches(&self, text: &str) -> bool {
        match self {
            EditVerification::ExactMatch(expected) => text == expected,
            EditVerification::Hash(expected_hash) => {
                let actual_hash = xxh3_64(text.as_bytes());
                actual_hash == *expected_hash
            }
        }
    }

    /// Create verification from text, using hash for text over 1KB.
    pub fn from_text(text: &str) -> Self {
        if text.len() > 1024 {
            EditVerification::Hash(xxh3_64(text.as_bytes()))
        } else {
            EditVerification::ExactMatch(text.to_string())
        }
    }

    /// Get hash value regardless of variant.
    pub fn hash(&self) -> u64 {
        match self {
            EditVerification::Hash(h) => *h,
            EditVerification::ExactMatch(text) => xxh3_64(text.as_bytes()),
        }
    }
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("before-text verification failed at [{byte_start}, {byte_end})")]
    BeforeTextMismatch {
        byte_start: usize,
        byte_end: usize,
        expected: String,
        found: String,
    },

    #[error("invalid byte range: [{byte_start}, {byte_end}) in buffer of length {buffer_len}")]
    InvalidByteRange {
        byte_start: usize,
        byte_end: usize,
        buffer_len: usize,
    },

    #[error("edit range [{byte_start}, {byte_end}) does not fall on character boundaries")]
    NotCharBoundary { byte_start: usize, byte_end: usize },
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "EditResult should be checked for applied/already-applied"]
pub enum EditResult {
    /// Edit produced a new buffer
    Applied {
        buffer: SourceBuffer,
        bytes_changed: usize,
    },
    /// Current text already matches new_text; buffer returned untouched
    AlreadyApplied { buffer: SourceBuffer },
}

impl EditResult {
    /// The buffer to continue with, whether or not anything changed.
    pub fn into_buffer(self) -> SourceBuffer {
        match self {
            EditResult::Applied { buffer, .. } => buffer,
            EditResult::AlreadyApplied { buffer } => buffer,
        }
    }
}

impl Edit {
    /// Create a new edit with automatic verification generation.
    pub fn new(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        expected_before: impl Into<String>,
    ) -> Self {
        let expected = expected_before.into();
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: EditVerification::from_text(&expected),
        }
    }

    /// Create an edit with explicit verification strategy.
    pub fn with_verification(
        byte_start: usize,
        byte_end: usize,
        new_text: impl Into<String>,
        verification: EditVerification,
    ) -> Self {
        Self {
            byte_start,
            byte_end,
            new_text: new_text.into(),
            expected_before: verification,
        }
    }

    /// Validate the edit against the buffer contents.
    ///
    /// Returns the current text at [byte_start, byte_end) if validation succeeds.
    fn validate<'a>(&self, content: &'a str) -> Result<&'a str, EditError> {
        if self.byte_start > self.byte_end || self.byte_end > content.len() {
            return Err(EditError::InvalidByteRange {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                buffer_len: content.len(),
            });
        }

        if !content.is_char_boundary(self.byte_start) || !content.is_char_boundary(self.byte_end) {
            return Err(EditError::NotCharBoundary {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
            });
        }

        let current_text = &content[self.byte_start..self.byte_end];

        // Check if already applied (idempotency)
        if current_text == self.new_text {
            return Ok(current_text);
        }

        // Verify expected before-text
        if !self.expected_before.matches(current_text) {
            return Err(EditError::BeforeTextMismatch {
                byte_start: self.byte_start,
                byte_end: self.byte_end,
                expected: format!("{:?}", self.expected_before),
                found: current_text.to_string(),
            });
        }

        Ok(current_text)
    }

    /// Apply this edit to a buffer snapshot, producing the next snapshot.
    ///
    /// The source buffer is never mutated; an edit computed against one
    /// snapshot fails verification when applied to any other.
    pub fn apply(&self, buffer: &SourceBuffer) -> Result<EditResult, EditError> {
        let content = buffer.as_str();
        let current_text = self.validate(content)?;

        if current_text == self.new_text {
            return Ok(EditResult::AlreadyApplied {
                buffer: buffer.clone(),
            });
        }

        let mut new_content = String::with_capacity(
            content.len() + self.new_text.len() - (self.byte_end - self.byte_start),
        );
        new_content.push_str(&content[..self.byte_start]);
        new_content.push_str(&self.new_text);
        new_content.push_str(&content[self.byte_end..]);

        Ok(EditResult::Applied {
            buffer: SourceBuffer::new(new_content),
            bytes_changed: self.new_text.len(),
        })
    }
}
