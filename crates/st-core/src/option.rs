//! Options: the actions a player can take at a node.

use std::fmt;

use crate::error::StoryResult;
use crate::node::{NodeId, TextFn};
use crate::session::Scope;

/// Lazily decides whether an option is available or visible.
pub type PredicateFn = Box<dyn Fn(&Scope<'_>) -> StoryResult<bool>>;

/// Resolves the node an option leads to. `None` stays on the current node.
pub type TransitionFn = Box<dyn Fn(&Scope<'_>) -> StoryResult<Option<NodeId>>>;

/// A selectable action at a node.
///
/// Every part of an option is a producer evaluated on demand. Visibility
/// defaults to availability: an unavailable option is hidden unless a
/// visibility producer says otherwise.
pub struct StoryOption {
    text: TextFn,
    available: PredicateFn,
    visible: Option<PredicateFn>,
    on_selected: TransitionFn,
}

impl StoryOption {
    /// Create an option with a lazily produced label.
    ///
    /// The option is always available and selecting it stays on the current
    /// node until configured otherwise.
    pub fn new(text: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static) -> Self {
        Self {
            text: Box::new(text),
            available: Box::new(|_| Ok(true)),
            visible: None,
            on_selected: Box::new(|_| Ok(None)),
        }
    }

    /// Create an option with a constant label.
    pub fn labeled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self::new(move |_| Ok(label.clone()))
    }

    /// Replace the label producer.
    pub fn with_text(mut self, text: impl Fn(&Scope<'_>) -> StoryResult<String> + 'static) -> Self {
        self.text = Box::new(text);
        self
    }

    /// Set the availability predicate.
    pub fn with_availability(
        mut self,
        available: impl Fn(&Scope<'_>) -> StoryResult<bool> + 'static,
    ) -> Self {
        self.set_availability(available);
        self
    }

    /// Set an explicit visibility predicate, overriding the default of
    /// following availability.
    pub fn with_visibility(
        mut self,
        visible: impl Fn(&Scope<'_>) -> StoryResult<bool> + 'static,
    ) -> Self {
        self.set_visibility(visible);
        self
    }

    /// Set what happens when the option is selected.
    pub fn does(
        mut self,
        transition: impl Fn(&Scope<'_>) -> StoryResult<Option<NodeId>> + 'static,
    ) -> Self {
        self.set_transition(transition);
        self
    }

    /// Lead to the node with the given id, looked up when the option is
    /// selected.
    pub fn leads_to(self, target: impl Into<String>) -> Self {
        let target = target.into();
        self.does(move |scope| scope.require_node(&target).map(Some))
    }

    /// In-place form of [`with_availability`](Self::with_availability).
    pub fn set_availability(
        &mut self,
        available: impl Fn(&Scope<'_>) -> StoryResult<bool> + 'static,
    ) -> &mut Self {
        self.available = Box::new(available);
        self
    }

    /// In-place form of [`with_visibility`](Self::with_visibility).
    pub fn set_visibility(
        &mut self,
        visible: impl Fn(&Scope<'_>) -> StoryResult<bool> + 'static,
    ) -> &mut Self {
        self.visible = Some(Box::new(visible));
        self
    }

    /// In-place form of [`does`](Self::does).
    pub fn set_transition(
        &mut self,
        transition: impl Fn(&Scope<'_>) -> StoryResult<Option<NodeId>> + 'static,
    ) -> &mut Self {
        self.on_selected = Box::new(transition);
        self
    }

    /// Whether visibility was overridden rather than following availability.
    pub fn has_explicit_visibility(&self) -> bool {
        self.visible.is_some()
    }

    /// Produce the label.
    pub fn label(&self, scope: &Scope<'_>) -> StoryResult<String> {
        (self.text)(scope)
    }

    /// Evaluate the availability predicate.
    pub fn is_available(&self, scope: &Scope<'_>) -> StoryResult<bool> {
        (self.available)(scope)
    }

    /// Evaluate visibility. Calls the availability predicate exactly once when
    /// no explicit visibility was set.
    pub fn is_visible(&self, scope: &Scope<'_>) -> StoryResult<bool> {
        match &self.visible {
            Some(visible) => visible(scope),
            None => self.is_available(scope),
        }
    }

    /// Run the selection and return the node to go to.
    pub fn select(&self, scope: &Scope<'_>) -> StoryResult<Option<NodeId>> {
        (self.on_selected)(scope)
    }
}

impl fmt::Debug for StoryOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryOption")
            .field("explicit_visibility", &self.visible.is_some())
            .finish_non_exhaustive()
    }
}
