//! Parser for the plain-text story format (`.story.txt`).
//!
//! ```text
//! title = The Cellar
//! author = Ada
//! initialNode = door
//!
//! // Nodes are introduced by a bracketed id.
//! [door]
//! A heavy door blocks the way.
//! {Push it} cellar
//!
//! [cellar]
//! It is dark down here.
//! ```
//!
//! Lines are trimmed. Lines starting with `//` are comments. Before the first
//! node, `key = value` lines set metadata. Inside a node, `{label} target`
//! lines add an option leading to `target`; every other line is node text.

/// Parser configuration.
pub mod config;
/// Source diagnostics and their rendering.
pub mod diagnostics;
/// Parse errors.
pub mod error;
/// The line-oriented parser.
pub mod parser;

use std::path::Path;

pub use config::{MetadataPolicy, ParserConfig};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{ParseError, ParseResult};
pub use parser::{Link, ParsedStory, TextParser};

use st_core::Story;

/// Parse a story with the default configuration.
pub fn parse_story_text(source: &str) -> ParseResult<Story> {
    TextParser::default().parse(source).map(|parsed| parsed.story)
}

/// Parse a story file with the default configuration.
pub fn parse_story_file(path: &Path) -> ParseResult<Story> {
    TextParser::default().parse_file(path).map(|parsed| parsed.story)
}
