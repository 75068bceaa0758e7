use crate::host::Capability;

/// Alias for `Result<T, StoryError>`.
pub type StoryResult<T> = Result<T, StoryError>;

/// Broad classification of a [`StoryError`].
///
/// Hosts use this to decide how an error is surfaced: definition and runtime
/// errors are shown to the author, host errors are the host's own business,
/// and aborts are never shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Misuse of the construction or reading API, or a broken reference in
    /// the story.
    Definition,
    /// A failure raised from inside a node or option callback.
    Runtime,
    /// The session was closed while an interaction was in progress.
    Abort,
    /// The host failed to carry out a request.
    Host,
}

/// Errors that can occur while building or reading a story.
#[derive(Debug, thiserror::Error)]
pub enum StoryError {
    /// A node with the same id is already registered in the story.
    #[error("duplicate node id: \"{0}\"")]
    DuplicateNodeId(String),

    /// The requested node does not exist in the story.
    #[error("node not found: \"{0}\"")]
    NodeNotFound(String),

    /// Two stories built by the same builder share an id.
    #[error("stories built together must not have identical ids: \"{0}\"")]
    DuplicateStoryId(String),

    /// A value-yielding choice ended on an outcome without a yield mapping.
    ///
    /// Holds the label of the chosen option, or `None` when the choice was
    /// cancelled.
    #[error("{}", missing_yield_message(.0.as_deref()))]
    MissingYieldMapping(Option<String>),

    /// The story needs a host capability the active host does not provide.
    #[error("host does not support the {0} capability")]
    UnsupportedCapability(Capability),

    /// An environment slot was read before being set, without a default.
    #[error("no value set for \"{0}\" and no default was provided")]
    NoDefaultProvided(String),

    /// An environment slot holds a value of a different shape than requested.
    #[error("environment slot \"{name}\" holds an incompatible value: {source}")]
    SlotType {
        /// The slot name.
        name: String,
        /// The underlying decoding error.
        source: serde_json::Error,
    },

    /// A value cannot be stored in an environment slot without losing
    /// information, such as a non-finite float.
    #[error("environment slot \"{name}\" cannot store this value: {source}")]
    UnstorableValue {
        /// The slot name.
        name: String,
        /// Why the stored form would not read back.
        source: serde_json::Error,
    },

    /// The story definition is invalid for a reason without its own variant.
    #[error("{0}")]
    Invalid(String),

    /// An option was pressed before the story was started.
    #[error("the story has not been started")]
    NotStarted,

    /// The pressed option is not part of the current view.
    #[error("option {0} is not visible at the current node")]
    OptionNotVisible(usize),

    /// A story callback failed.
    #[error("{0}")]
    Failed(String),

    /// The session was closed during a host interaction.
    ///
    /// This is a sentinel, not a user-facing error.
    #[error("story session aborted")]
    Aborted,

    /// The host failed to carry out a request.
    #[error(transparent)]
    Host(#[from] HostError),
}

impl StoryError {
    /// Create a runtime failure with the given message.
    ///
    /// This is what node and option callbacks return to signal a bug in the
    /// narrative definition.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Create a definition error with the given message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateNodeId(_)
            | Self::NodeNotFound(_)
            | Self::DuplicateStoryId(_)
            | Self::MissingYieldMapping(_)
            | Self::UnsupportedCapability(_)
            | Self::NoDefaultProvided(_)
            | Self::SlotType { .. }
            | Self::UnstorableValue { .. }
            | Self::Invalid(_)
            | Self::NotStarted
            | Self::OptionNotVisible(_) => ErrorKind::Definition,
            Self::Failed(_) => ErrorKind::Runtime,
            Self::Aborted => ErrorKind::Abort,
            Self::Host(_) => ErrorKind::Host,
        }
    }

    /// Whether this is the abort sentinel.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Aborted)
    }
}

fn missing_yield_message(label: Option<&str>) -> String {
    match label {
        Some(label) => format!(
            "the choice did not specify any value for when choosing \"{label}\"; \
             declare one with `yields` after the option"
        ),
        None => "the choice did not specify any value for when cancelling; \
                 declare one with `yield_if_cancelled`"
            .to_string(),
    }
}

/// Errors raised at the host boundary.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The resource was not loaded or does not exist.
    #[error("resource was not loaded and/or does not exist: {0}")]
    ResourceNotFound(String),

    /// The host answered a choice with an option that was never offered.
    #[error("host returned unknown choice index {0}")]
    InvalidChoice(usize),

    /// The host's input stream ended while an answer was required.
    #[error("input closed before an answer was given")]
    InputClosed,

    /// An I/O failure inside the host.
    #[error("host I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            StoryError::DuplicateNodeId("1".into()).kind(),
            ErrorKind::Definition
        );
        assert_eq!(StoryError::failed("boom").kind(), ErrorKind::Runtime);
        assert_eq!(StoryError::invalid("bad").kind(), ErrorKind::Definition);
        assert_eq!(StoryError::NotStarted.kind(), ErrorKind::Definition);
        assert_eq!(
            StoryError::OptionNotVisible(2).kind(),
            ErrorKind::Definition
        );
        assert_eq!(StoryError::Aborted.kind(), ErrorKind::Abort);
        assert_eq!(
            StoryError::from(HostError::InputClosed).kind(),
            ErrorKind::Host
        );
    }

    #[test]
    fn abort_is_distinguished() {
        assert!(StoryError::Aborted.is_abort());
        assert!(!StoryError::failed("aborted").is_abort());
    }

    #[test]
    fn missing_yield_names_the_option() {
        let err = StoryError::MissingYieldMapping(Some("Open the door".into()));
        assert!(err.to_string().contains("\"Open the door\""));

        let err = StoryError::MissingYieldMapping(None);
        assert!(err.to_string().contains("cancelling"));
    }

    #[test]
    fn host_errors_pass_through() {
        let err: StoryError = HostError::ResourceNotFound("bg.png".into()).into();
        assert_eq!(
            err.to_string(),
            "resource was not loaded and/or does not exist: bg.png"
        );
    }
}
