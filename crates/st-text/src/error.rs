//! Error types for the text parser.

use std::ops::Range;

use st_core::StoryError;
use thiserror::Error;

use crate::diagnostics::Diagnostic;

/// Result type for parser operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while parsing a story.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source could not be read.
    #[error("cannot read story: {0}")]
    Io(#[from] std::io::Error),

    /// Building the story failed, e.g. on a duplicate node id.
    #[error("line {line}: {source}")]
    Story {
        /// 1-based line number.
        line: usize,
        /// Byte range of the offending line.
        span: Range<usize>,
        /// The underlying story error.
        source: StoryError,
    },

    /// A metadata key is not recognized and the policy rejects it.
    #[error("line {line}: unknown metadata key \"{key}\"")]
    UnknownMetadata {
        /// 1-based line number.
        line: usize,
        /// Byte range of the offending line.
        span: Range<usize>,
        /// The key.
        key: String,
    },
}

impl ParseError {
    /// Convert into a diagnostic for rendering, if the error has a location.
    pub fn to_diagnostic(&self) -> Option<Diagnostic> {
        match self {
            Self::Io(_) => None,
            Self::Story { line, span, source } => {
                Some(Diagnostic::error(span.clone(), *line, source.to_string()))
            }
            Self::UnknownMetadata { line, span, key } => Some(
                Diagnostic::error(span.clone(), *line, format!("unknown metadata key \"{key}\""))
                    .with_label("not one of title, author, initialNode"),
            ),
        }
    }
}

impl From<ParseError> for StoryError {
    /// Fold a parse failure into the story error taxonomy.
    ///
    /// Story errors keep their variant so their classification survives;
    /// the line number is dropped.
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Io(e) => StoryError::Host(e.into()),
            ParseError::Story { source, .. } => source,
            other @ ParseError::UnknownMetadata { .. } => {
                StoryError::invalid(other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use st_core::ErrorKind;

    use super::*;

    #[test]
    fn story_errors_keep_their_kind() {
        let err = ParseError::Story {
            line: 4,
            span: 10..13,
            source: StoryError::DuplicateNodeId("1".into()),
        };
        assert_eq!(err.to_string(), "line 4: duplicate node id: \"1\"");
        assert_eq!(err.to_diagnostic().unwrap().line, 4);
        let err: StoryError = err.into();
        assert_eq!(err.kind(), ErrorKind::Definition);
    }

    #[test]
    fn io_errors_become_host_errors() {
        let err = ParseError::Io(std::io::Error::other("disk on fire"));
        assert!(err.to_diagnostic().is_none());
        let err: StoryError = err.into();
        assert_eq!(err.kind(), ErrorKind::Host);
    }

    #[test]
    fn unknown_metadata_is_a_definition_error() {
        let err = ParseError::UnknownMetadata {
            line: 1,
            span: 0..5,
            key: "genre".into(),
        };
        let err: StoryError = err.into();
        assert_eq!(err.kind(), ErrorKind::Definition);
        assert!(err.to_string().contains("genre"));
    }
}
