//! Installed-model listing returned by the model runtime.

/// Result of asking the runtime which models are installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelListing {
    /// Raw text printed by `<runtime> list`.
    Listed(String),
    /// The runtime could not be queried (service down, timeout, bad exit).
    Unreachable(String),
}

impl ModelListing {
    /// Whether the listing mentions `model`.
    ///
    /// Plain substring match on the captured text; `llama3.2` matches a
    /// `llama3.2:latest` row. Empty identifiers never match, and an
    /// unreachable runtime lists nothing.
    #[must_use]
    pub fn contains(&self, model: &str) -> bool {
        match self {
            Self::Listed(text) => !model.is_empty() && text.contains(model),
            Self::Unreachable(_) => false,
        }
    }
}
