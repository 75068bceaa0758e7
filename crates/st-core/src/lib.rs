//! Core types for storytree: the story graph, the shared environment and the
//! host capability interface.
//!
//! This crate is independent of any authoring format. A [`Story`] can be
//! built programmatically through [`Story::create_node`] or produced by the
//! text parser in `st-text`; either way the same invariants hold.

/// The session-scoped key/value store shared between stories.
pub mod environment;
/// Error taxonomy used throughout the workspace.
pub mod error;
/// Capability traits implemented by the presentation layer.
pub mod host;
/// Story nodes and their lazy producers.
pub mod node;
/// Options offered at a node.
pub mod option;
/// Reader sessions and the scope handed to every producer.
pub mod session;
/// The story graph itself.
pub mod story;

/// Re-export environment types.
pub use environment::{Environment, Slot};
/// Re-export error types.
pub use error::{ErrorKind, HostError, StoryError, StoryResult};
/// Re-export host capability types.
pub use host::{
    Capability, ChoiceCapability, ChoiceIcon, ChoiceOption, ChoiceOutcome, ChoicePrompt,
    HeadlessHost, Host, InputCapability, Resource, ResourceCapability,
};
/// Re-export node types.
pub use node::{NodeId, StoryNode};
/// Re-export option types.
pub use option::StoryOption;
/// Re-export session types.
pub use session::{Scope, Session};
/// Re-export the story graph.
pub use story::Story;
