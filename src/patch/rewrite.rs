//! Scoped literal token rewriting.
//!
//! Rewrites only ever see the extracted text of one definition span, so a
//! token spelled identically inside another definition is never touched.

/// Ordered list of literal `(from, to)` substitutions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    pairs: Vec<(String, String)>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mapping; mappings apply in insertion order.
    pub fn map(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.pairs.push((from.into(), to.into()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Apply every mapping to the whole of `span_text`.
///
/// Substitution is plain literal replacement of all occurrences; a later
/// mapping sees the output of an earlier one.
pub fn rewrite_tokens(span_text: &str, tokens: &TokenMap) -> String {
    let mut result = span_text.to_string();
    for (from, to) in tokens.pairs() {
        result = result.replace(from.as_str(), to.as_str());
    }
    result
}

/// Apply every mapping to `span_text` except inside the first occurrence of
/// `pinned`.
///
/// The pinned block is canonical text a prior operation just spliced in. Its
/// binding lines deliberately reference the tokens being rewritten, so the
/// rewrite must only run over the text around it. When `pinned` is absent
/// the whole span is rewritten.
pub fn rewrite_tokens_outside(span_text: &str, pinned: &str, tokens: &TokenMap) -> String {
    match span_text.find(pinned) {
        Some(at) => {
            let before = &span_text[..at];
            let after = &span_text[at + pinned.len()..];
            let mut result = String::with_capacity(span_text.len());
            result.push_str(&rewrite_tokens(before, tokens));
            result.push_str(pinned);
            result.push_str(&rewrite_tokens(after, tokens));
            result
        }
        None => rewrite_tokens(span_text, tokens),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_occurrence() {
        let tokens = TokenMap::new().map("$old", "$new");
        let out = rewrite_tokens("$old + $old\n$other\n", &tokens);
        assert_eq!(out, "$new + $new\n$other\n");
    }

    #[test]
    fn mappings_cascade_in_insertion_order() {
        let tokens = TokenMap::new().map("x", "y").map("y", "z");
        assert_eq!(rewrite_tokens("x y", &tokens), "z z");
    }

    #[test]
    fn untouched_text_passes_through() {
        let tokens = TokenMap::new().map("$gone", "$here");
        assert_eq!(rewrite_tokens("nothing to do", &tokens), "nothing to do");
    }

    #[test]
    fn pinned_block_survives_verbatim() {
        let tokens = TokenMap::new().map("$t", "$u");
        let span = "$t = 1\n[$t pinned]\n$t = 2\n";
        let out = rewrite_tokens_outside(span, "[$t pinned]\n", &tokens);
        assert_eq!(out, "$u = 1\n[$t pinned]\n$u = 2\n");
    }

    #[test]
    fn only_the_first_pinned_occurrence_is_protected() {
        let tokens = TokenMap::new().map("K", "X");
        let out = rewrite_tokens_outside("K K", "K", &tokens);
        assert_eq!(out, "K X");
    }

    #[test]
    fn absent_pin_falls_back_to_full_rewrite() {
        let tokens = TokenMap::new().map("a", "b");
        let out = rewrite_tokens_outside("a a a", "missing", &tokens);
        assert_eq!(out, "b b b");
    }
}
