//! Reader sessions and the scope handed to story callbacks.

use std::fmt;
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::{StoryError, StoryResult};
use crate::host::{Capability, ChoiceCapability, Host, InputCapability, ResourceCapability};
use crate::node::NodeId;
use crate::story::Story;

/// One reader session: the host it runs against and its shared environment.
///
/// Everything that builds or reads stories takes the session by reference.
/// The environment lives exactly as long as the session.
pub struct Session {
    env: Environment,
    host: Rc<dyn Host>,
}

impl Session {
    /// Start a session against `host` with an empty environment.
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            env: Environment::new(),
            host,
        }
    }

    /// Start a session with a prepared environment.
    pub fn with_environment(host: Rc<dyn Host>, env: Environment) -> Self {
        Self { env, host }
    }

    /// The shared environment.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// The host.
    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Whether the host provides `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        self.host.supports(capability)
    }

    /// Fail unless the host provides `capability`.
    pub fn require(&self, capability: Capability) -> StoryResult<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(StoryError::UnsupportedCapability(capability))
        }
    }

    /// The host's input capability.
    pub fn input(&self) -> StoryResult<&dyn InputCapability> {
        self.host
            .input()
            .ok_or(StoryError::UnsupportedCapability(Capability::Input))
    }

    /// The host's choice capability.
    pub fn choices(&self) -> StoryResult<&dyn ChoiceCapability> {
        self.host
            .choices()
            .ok_or(StoryError::UnsupportedCapability(Capability::Choice))
    }

    /// The host's resource capability.
    pub fn resources(&self) -> StoryResult<&dyn ResourceCapability> {
        self.host
            .resources()
            .ok_or(StoryError::UnsupportedCapability(Capability::Resources))
    }

    /// Ask the player a question.
    pub fn ask_input(&self, question: &str) -> StoryResult<String> {
        self.input()?.ask_input(question)
    }

    /// Show a warning.
    pub fn warn(&self, message: &str) {
        self.host.warn(message);
    }

    /// Show an error.
    pub fn error(&self, message: &str) {
        self.host.error(message);
    }

    /// Ask the host to end the session.
    pub fn close_story(&self) -> StoryResult<()> {
        self.host.close_story()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("env", &self.env)
            .finish_non_exhaustive()
    }
}

/// What a story callback can see: the story it belongs to and the session.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    story: &'a Story,
    session: &'a Session,
}

impl<'a> Scope<'a> {
    /// Pair a story with a session.
    pub fn new(story: &'a Story, session: &'a Session) -> Self {
        Self { story, session }
    }

    /// The story being read.
    pub fn story(&self) -> &'a Story {
        self.story
    }

    /// The session.
    pub fn session(&self) -> &'a Session {
        self.session
    }

    /// The session's environment.
    pub fn env(&self) -> &'a Environment {
        self.session.env()
    }

    /// The session's host.
    pub fn host(&self) -> &'a dyn Host {
        self.session.host()
    }

    /// The id of the node, if it exists.
    pub fn node_ref(&self, id: &str) -> Option<NodeId> {
        self.story.node(id).map(|node| node.id().clone())
    }

    /// The id of the node, failing with [`StoryError::NodeNotFound`].
    pub fn require_node(&self, id: &str) -> StoryResult<NodeId> {
        self.node_ref(id)
            .ok_or_else(|| StoryError::NodeNotFound(id.to_string()))
    }

    /// Whether the node exists.
    pub fn node_exists(&self, id: &str) -> bool {
        self.story.contains_node(id)
    }
}
