/// A single mutation against the current buffer snapshot.
///
/// Targets are named or anchored, never offset-based; resolution happens at
/// application time against whatever buffer the operation is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOperation {
    /// Splice `payload` immediately before the first occurrence of `anchor`.
    InsertBeforeAnchor { anchor: String, payload: String },

    /// Replace the named definition's entire span with `payload`.
    ReplaceSpan { name: String, payload: String },

    /// Replace the first occurrence of `needle` inside the named
    /// definition's span with `payload`.
    ReplaceSubstringInSpan {
        name: String,
        needle: String,
        payload: String,
    },
}
