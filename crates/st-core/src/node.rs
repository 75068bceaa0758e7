//! Story nodes: addressable points of the narrative.

use std::fmt;

use crate::error::StoryResult;
use crate::option::StoryOption;
use crate::session::Scope;

/// Lazily produces a piece of text. May return different text on every call.
pub type TextFn = Box<dyn Fn(&Scope<'_>) -> StoryResult<String>>;

/// A side effect run when a node is reached.
pub type HookFn = Box<dyn Fn(&Scope<'_>) -> StoryResult<()>>;

/// The identifier of a node in a story.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap a raw id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A point in the narrative: some text and the options offered there.
pub struct StoryNode {
    id: NodeId,
    text: TextFn,
    options: Vec<StoryOption>,
    on_reached: HookFn,
}

impl StoryNode {
    /// Create a node with empty text, no options and no reached hook.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            text: Box::new(|_| Ok(String::new())),
            options: Vec::new(),
            on_reached: Box::new(|_| Ok(())),
        }
    }

    /// The node id.
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Replace the text producer.
    pub fn set_text(&mut self, text: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static) {
        self.text = Box::new(text);
    }

    /// Replace the text producer with constant text.
    pub fn set_body(&mut self, body: impl Into<String>) {
        let body = body.into();
        self.text = Box::new(move |_| Ok(body.clone()));
    }

    /// Builder form of [`set_text`](Self::set_text).
    pub fn with_text(
        mut self,
        text: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static,
    ) -> Self {
        self.set_text(text);
        self
    }

    /// Substitute every occurrence of `key` in the text with the output of
    /// `value`, evaluated each time the text is produced.
    ///
    /// Bindings stack: each call wraps the current text producer.
    pub fn bind(
        &mut self,
        key: impl Into<String>,
        value: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static,
    ) {
        let key = key.into();
        let inner = std::mem::replace(&mut self.text, Box::new(|_| Ok(String::new())));
        self.text = Box::new(move |scope| {
            let text = inner(scope)?;
            Ok(text.replace(&key, &value(scope)?))
        });
    }

    /// Produce the node text.
    pub fn text(&self, scope: &Scope<'_>) -> StoryResult<String> {
        (self.text)(scope)
    }

    /// The options, in registration order.
    pub fn options(&self) -> &[StoryOption] {
        &self.options
    }

    /// Mutable access to the options.
    pub fn options_mut(&mut self) -> &mut Vec<StoryOption> {
        &mut self.options
    }

    /// Append an option and return it for further configuration.
    pub fn add_option(&mut self, option: StoryOption) -> &mut StoryOption {
        self.options.push(option);
        let last = self.options.len() - 1;
        &mut self.options[last]
    }

    /// Append an option with a lazily produced label.
    pub fn option(
        &mut self,
        text: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static,
    ) -> &mut StoryOption {
        self.add_option(StoryOption::new(text))
    }

    /// Set what happens whenever the node is reached.
    pub fn on_reached(&mut self, hook: impl Fn(&Scope<'_>) -> StoryResult<()> + 'static) {
        self.on_reached = Box::new(hook);
    }

    /// Run the reached hook.
    pub fn reached(&self, scope: &Scope<'_>) -> StoryResult<()> {
        (self.on_reached)(scope)
    }
}

impl fmt::Debug for StoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryNode")
            .field("id", &self.id)
            .field("options", &self.options.len())
            .finish_non_exhaustive()
    }
}
