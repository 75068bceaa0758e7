//! The capability interface between the narrative core and the presentation
//! layer.
//!
//! A host always implements [`Host`]. Richer interactions are split into
//! independent capability traits that a host opts into by returning
//! `Some(self)` from the matching accessor. The core never downcasts a host;
//! it asks for a capability and fails with
//! [`StoryError::UnsupportedCapability`](crate::StoryError::UnsupportedCapability)
//! when it is absent.

use std::fmt;
use std::io::Cursor;

use crate::error::StoryResult;

/// An optional capability a host may provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Free-text questions, see [`InputCapability`].
    Input,
    /// Labeled choice dialogs, see [`ChoiceCapability`].
    Choice,
    /// Resource catalog access, see [`ResourceCapability`].
    Resources,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Choice => write!(f, "choice"),
            Self::Resources => write!(f, "resources"),
        }
    }
}

/// The base interface every host implements.
pub trait Host {
    /// Show a warning to the end user.
    fn warn(&self, message: &str);

    /// Show an error to the end user.
    fn error(&self, message: &str);

    /// Request termination of the reading session.
    ///
    /// When called from inside a story callback the host is expected to
    /// return [`StoryError::Aborted`](crate::StoryError::Aborted) so the
    /// interrupted call stack unwinds.
    fn close_story(&self) -> StoryResult<()>;

    /// The input capability, if this host supports it.
    fn input(&self) -> Option<&dyn InputCapability> {
        None
    }

    /// The choice capability, if this host supports it.
    fn choices(&self) -> Option<&dyn ChoiceCapability> {
        None
    }

    /// The resource capability, if this host supports it.
    fn resources(&self) -> Option<&dyn ResourceCapability> {
        None
    }

    /// Whether this host provides the given capability.
    fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Input => self.input().is_some(),
            Capability::Choice => self.choices().is_some(),
            Capability::Resources => self.resources().is_some(),
        }
    }
}

/// Asking the player for free text.
pub trait InputCapability {
    /// Ask a question and block until a non-empty answer is given.
    fn ask_input(&self, question: &str) -> StoryResult<String>;
}

/// Presenting a labeled choice to the player.
pub trait ChoiceCapability {
    /// Present the prompt and block until the player answers.
    ///
    /// Returns [`ChoiceOutcome::Cancelled`] only when the player dismissed a
    /// cancellable prompt.
    fn present_choice(&self, prompt: &ChoicePrompt<'_>) -> StoryResult<ChoiceOutcome>;
}

/// Access to the host's resource catalog.
pub trait ResourceCapability {
    /// Get a loaded resource by its name.
    fn get_resource(&self, name: &str) -> StoryResult<Resource>;

    /// Load every resource the host knows about.
    fn load_resources(&self) -> StoryResult<()>;
}

/// A named binary resource supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The resource name, relative to the host's resource folder.
    pub name: String,
    /// The raw resource contents.
    pub bytes: Vec<u8>,
}

impl Resource {
    /// Create a resource from its name and contents.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Open the contents as a byte stream.
    pub fn open_stream(&self) -> Cursor<&[u8]> {
        Cursor::new(self.bytes.as_slice())
    }
}

/// One labeled option of a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    /// The label shown on the option.
    pub label: String,
    /// Optional color hint for the option's background.
    pub color: Option<String>,
    /// Whether the label should be drawn in white.
    pub white_text: bool,
}

impl ChoiceOption {
    /// Create an option with the given label and no styling hints.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: None,
            white_text: false,
        }
    }

    /// Set the color hint.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the white-text hint.
    pub fn with_white_text(mut self, white_text: bool) -> Self {
        self.white_text = white_text;
        self
    }
}

/// The icon shown next to a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceIcon {
    /// A named icon from the host's icon set.
    Named(String),
    /// An image resource.
    Resource(Resource),
}

/// Everything a host needs to render a choice.
#[derive(Debug, Clone, Copy)]
pub struct ChoicePrompt<'a> {
    /// Whether the player may dismiss the prompt.
    pub cancellable: bool,
    /// Optional icon.
    pub icon: Option<&'a ChoiceIcon>,
    /// Optional title.
    pub title: Option<&'a str>,
    /// The prompt text.
    pub text: &'a str,
    /// The options, in display order.
    pub options: &'a [ChoiceOption],
}

/// The answer to a choice prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The option at this index of [`ChoicePrompt::options`] was chosen.
    Chosen(usize),
    /// The prompt was dismissed.
    Cancelled,
}

/// A host without any optional capability.
///
/// Warnings and errors go to the `tracing` log. Useful for validating stories
/// outside of an interactive session.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessHost;

impl Host for HeadlessHost {
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }

    fn close_story(&self) -> StoryResult<()> {
        Err(crate::StoryError::Aborted)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn headless_supports_nothing() {
        let host = HeadlessHost;
        assert!(!host.supports(Capability::Input));
        assert!(!host.supports(Capability::Choice));
        assert!(!host.supports(Capability::Resources));
    }

    #[test]
    fn headless_close_aborts() {
        let err = HeadlessHost.close_story().unwrap_err();
        assert!(err.is_abort());
    }

    #[test]
    fn resource_stream() {
        let res = Resource::new("note.txt", b"hello".to_vec());
        let mut out = String::new();
        res.open_stream().read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn choice_option_builder() {
        let opt = ChoiceOption::new("Exit")
            .with_color("red")
            .with_white_text(true);
        assert_eq!(opt.label, "Exit");
        assert_eq!(opt.color.as_deref(), Some("red"));
        assert!(opt.white_text);
    }
}
