//! Configuration for the text parser.

/// What to do with metadata keys the format does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    /// Skip them silently.
    #[default]
    Ignore,
    /// Skip them and record a warning diagnostic.
    Warn,
    /// Fail with [`ParseError::UnknownMetadata`](crate::ParseError::UnknownMetadata).
    Reject,
}

/// Configuration for a [`TextParser`](crate::TextParser).
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Handling of unrecognized metadata keys.
    pub unknown_metadata: MetadataPolicy,
    /// Record a warning for options whose target is never declared.
    pub warn_dangling_links: bool,
}

impl ParserConfig {
    /// Set the unknown-metadata policy.
    pub fn with_unknown_metadata(mut self, policy: MetadataPolicy) -> Self {
        self.unknown_metadata = policy;
        self
    }

    /// Enable or disable dangling-link warnings.
    pub fn with_dangling_link_warnings(mut self, enabled: bool) -> Self {
        self.warn_dangling_links = enabled;
        self
    }
}
