//! Narrative evaluation for storytree.
//!
//! [`StoryReader`] walks a story graph node by node, [`Choices`] runs labeled
//! player decisions through the host, and [`StoryBuilder`] is the
//! programmatic construction surface for stories that go beyond the text
//! format.

/// Programmatic story construction.
pub mod builder;
/// Labeled choices with effects and yielded values.
pub mod choice;
/// The narrative state machine.
pub mod reader;

pub use builder::{StoryBuilder, build_stories};
pub use choice::{ChoiceKey, Choices};
pub use reader::{NodeView, OptionView, StoryReader};
