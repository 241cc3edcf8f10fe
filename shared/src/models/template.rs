//! Template catalog
//!
//! Maps user-facing template labels to the codes the backend recognizes.
//! Exactly one code is active per document type at a time; the active
//! codes live in [`Settings`](crate::settings::Settings), this catalog only
//! resolves between the two representations.

/// Label shown when a code has no catalog entry
pub const DEFAULT_LABEL: &str = "Padrão";

/// Known template label ↔ code pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCatalog {
    entries: Vec<(String, String)>,
}

impl TemplateCatalog {
    pub fn new<L, C>(entries: impl IntoIterator<Item = (L, C)>) -> Self
    where
        L: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, code)| (label.into(), code.into()))
                .collect(),
        }
    }

    /// Backend code for a user-facing label
    pub fn code_for(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, c)| c.as_str())
    }

    /// User-facing label for a backend code, falling back to [`DEFAULT_LABEL`]
    pub fn label_for(&self, code: &str) -> &str {
        self.entries
            .iter()
            .find(|(_, c)| c == code)
            .map_or(DEFAULT_LABEL, |(l, _)| l.as_str())
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new([(DEFAULT_LABEL, ""), ("Bundle", "bundle")])
    }
}
