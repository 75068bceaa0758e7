//! The story graph: nodes, metadata and the initial-node resolver.

use std::collections::HashMap;
use std::fmt;

use crate::error::{StoryError, StoryResult};
use crate::node::{NodeId, StoryNode};
use crate::session::Scope;

/// Resolves the node a story starts at.
pub type InitialNodeFn = Box<dyn Fn(&Scope<'_>) -> StoryResult<NodeId>>;

/// The id the default initial-node resolver looks for.
pub const DEFAULT_INITIAL_NODE: &str = "1";

/// A story: a set of uniquely identified nodes plus metadata.
///
/// Nodes iterate in insertion order. The initial node is resolved afresh on
/// every call to [`initial_node`](Self::initial_node), so a resolver may
/// depend on state that changes between reads.
pub struct Story {
    /// The story title.
    pub title: String,
    /// The story author.
    pub author: String,
    /// The story id.
    pub id: String,
    nodes: Vec<StoryNode>,
    by_id: HashMap<NodeId, usize>,
    initial_node: InitialNodeFn,
}

impl Story {
    /// Create an empty story that starts at node `"1"`.
    pub fn new() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            id: String::new(),
            nodes: Vec::new(),
            by_id: HashMap::new(),
            initial_node: Box::new(|scope| scope.require_node(DEFAULT_INITIAL_NODE)),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // -----------------------------------------------------------------------
    // Nodes
    // -----------------------------------------------------------------------

    /// Register a node under `id`, configure it and return it.
    ///
    /// Fails with [`StoryError::DuplicateNodeId`] if the id is taken; the
    /// existing node is left untouched.
    pub fn create_node(
        &mut self,
        id: impl Into<NodeId>,
        text: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static,
        configure: impl FnOnce(&mut StoryNode),
    ) -> StoryResult<&mut StoryNode> {
        let mut node = StoryNode::new(id).with_text(text);
        configure(&mut node);
        self.insert_node(node)
    }

    /// Register an already built node.
    pub fn insert_node(&mut self, node: StoryNode) -> StoryResult<&mut StoryNode> {
        let id = node.id().clone();
        if self.by_id.contains_key(&id) {
            return Err(StoryError::DuplicateNodeId(id.to_string()));
        }
        tracing::debug!(node = %id, story = %self.id, "created node");

        let index = self.nodes.len();
        self.by_id.insert(id, index);
        self.nodes.push(node);
        Ok(&mut self.nodes[index])
    }

    /// Look up a node.
    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.by_id
            .get(&NodeId::from(id))
            .map(|&index| &self.nodes[index])
    }

    /// Look up a node, failing with [`StoryError::NodeNotFound`].
    pub fn require(&self, id: &str) -> StoryResult<&StoryNode> {
        self.node(id)
            .ok_or_else(|| StoryError::NodeNotFound(id.to_string()))
    }

    /// Look up a node for modification.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut StoryNode> {
        self.by_id
            .get(&NodeId::from(id))
            .map(|&index| &mut self.nodes[index])
    }

    /// Whether a node with this id exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.by_id.contains_key(&NodeId::from(id))
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &StoryNode> {
        self.nodes.iter()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the story has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Apply `action` to every node, in insertion order.
    pub fn for_each_node(&mut self, mut action: impl FnMut(&mut StoryNode)) {
        for node in &mut self.nodes {
            action(node);
        }
    }

    /// Apply `action` to one node.
    pub fn with_node<R>(
        &mut self,
        id: &str,
        action: impl FnOnce(&mut StoryNode) -> R,
    ) -> StoryResult<R> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| StoryError::NodeNotFound(id.to_string()))?;
        Ok(action(node))
    }

    // -----------------------------------------------------------------------
    // Initial node
    // -----------------------------------------------------------------------

    /// Replace the initial-node resolver.
    pub fn set_initial_node(
        &mut self,
        resolver: impl Fn(&Scope<'_>) -> StoryResult<NodeId> + 'static,
    ) {
        self.initial_node = Box::new(resolver);
    }

    /// Start at the node with the given id, looked up lazily.
    pub fn set_initial_node_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.set_initial_node(move |scope| scope.require_node(&id));
    }

    /// Resolve the initial node. Never cached.
    pub fn initial_node(&self, scope: &Scope<'_>) -> StoryResult<NodeId> {
        (self.initial_node)(scope)
    }
}

impl Default for Story {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Story")
            .field("title", &self.title)
            .field("author", &self.author)
            .field("id", &self.id)
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}
