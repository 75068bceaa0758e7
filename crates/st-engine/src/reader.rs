//! The narrative state machine.
//!
//! A reader starts with no current node. [`StoryReader::start`] resolves the
//! story's initial node and enters it; [`StoryReader::press`] runs an option's
//! transition and enters the node it returns, or re-enters the current node
//! when it returns `None`.
//!
//! Entering a node runs its reached hook, then renders it: the text producer
//! is called once, and each option's visibility once. Producers may be
//! stateful, so nothing is evaluated twice within one render. Errors raised by
//! producers are returned as-is, including the abort sentinel.

use st_core::{NodeId, Scope, Session, Story, StoryError, StoryNode, StoryResult};

/// An option as rendered at the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// Position of the option in the node's option list.
    pub index: usize,
    /// The label produced for this render.
    pub label: String,
    /// Whether the option can be pressed. Visible but unavailable options
    /// are meant to be shown greyed out.
    pub available: bool,
}

/// The rendered state of the current node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    /// The node being displayed.
    pub node: NodeId,
    /// The text produced for this render.
    pub text: String,
    /// The visible options, in registration order.
    pub options: Vec<OptionView>,
}

/// Walks a story for one session.
#[derive(Debug)]
pub struct StoryReader<'a> {
    story: &'a Story,
    session: &'a Session,
    current: Option<NodeId>,
    view: Option<NodeView>,
}

impl<'a> StoryReader<'a> {
    /// Create a reader positioned before the start of the story.
    pub fn new(story: &'a Story, session: &'a Session) -> Self {
        Self {
            story,
            session,
            current: None,
            view: None,
        }
    }

    /// The story being read.
    pub fn story(&self) -> &'a Story {
        self.story
    }

    /// The session the story is read in.
    pub fn session(&self) -> &'a Session {
        self.session
    }

    fn scope(&self) -> Scope<'a> {
        Scope::new(self.story, self.session)
    }

    /// Whether a node has been entered.
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// The last rendered node, if rendering succeeded.
    pub fn current(&self) -> Option<&NodeView> {
        self.view.as_ref()
    }

    /// The current node.
    pub fn current_node(&self) -> Option<&'a StoryNode> {
        let story = self.story;
        self.current
            .as_ref()
            .and_then(|id| story.node(id.as_str()))
    }

    /// Resolve the initial node and enter it.
    ///
    /// Calling this again restarts the story from a freshly resolved initial
    /// node.
    pub fn start(&mut self) -> StoryResult<&NodeView> {
        let initial = self.story.initial_node(&self.scope())?;
        tracing::debug!(story = %self.story.title, node = %initial, "starting story");
        self.enter(&initial)
    }

    /// Press the visible option at position `choice` of the current view.
    pub fn press(&mut self, choice: usize) -> StoryResult<&NodeView> {
        let view = self.view.as_ref().ok_or(StoryError::NotStarted)?;
        let pressed = view
            .options
            .get(choice)
            .ok_or(StoryError::OptionNotVisible(choice))?;
        let (here, index) = (view.node.clone(), pressed.index);
        tracing::debug!(node = %here, option = %pressed.label, "option pressed");

        let node = self.story.require(here.as_str())?;
        let option = node
            .options()
            .get(index)
            .ok_or(StoryError::OptionNotVisible(choice))?;
        let next = option.select(&self.scope())?;

        self.enter(&next.unwrap_or(here))
    }

    fn enter(&mut self, id: &NodeId) -> StoryResult<&NodeView> {
        let scope = self.scope();
        let node = self.story.require(id.as_str())?;

        node.reached(&scope)?;
        self.current = Some(id.clone());
        self.view = None;
        tracing::debug!(node = %id, "entered node");

        let text = node.text(&scope)?;
        let mut options = Vec::new();
        for (index, option) in node.options().iter().enumerate() {
            if !option.is_visible(&scope)? {
                continue;
            }
            // Default visibility already evaluated availability.
            let available = if option.has_explicit_visibility() {
                option.is_available(&scope)?
            } else {
                true
            };
            options.push(OptionView {
                index,
                label: option.label(&scope)?,
                available,
            });
        }

        Ok(self.view.insert(NodeView {
            node: id.clone(),
            text,
            options,
        }))
    }
}
