//! Line-oriented parser for the plain-text story format.

use std::io::BufRead;
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use st_core::{Story, StoryNode, StoryOption};

use crate::config::{MetadataPolicy, ParserConfig};
use crate::diagnostics::Diagnostic;
use crate::error::{ParseError, ParseResult};

static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{(.+?)\}\s*(.+?)\s*$").expect("option pattern is valid")
});

/// An option declared in the source, kept for static checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The node the option belongs to.
    pub from: String,
    /// The option label.
    pub label: String,
    /// The target node id.
    pub to: String,
    /// 1-based line number of the option.
    pub line: usize,
    /// Byte range of the option line.
    pub span: Range<usize>,
}

/// The result of parsing a story source.
#[derive(Debug)]
pub struct ParsedStory {
    /// The story.
    pub story: Story,
    /// Every option declared in the source, in order.
    pub links: Vec<Link>,
    /// Warnings collected while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedStory {
    /// Links whose target node is never declared.
    pub fn dangling_links(&self) -> impl Iterator<Item = &Link> {
        self.links
            .iter()
            .filter(|link| !self.story.contains_node(&link.to))
    }
}

/// Parser for `.story.txt` sources.
#[derive(Debug, Clone, Default)]
pub struct TextParser {
    config: ParserConfig,
}

/// A node whose body is still being read.
struct OpenNode {
    node: StoryNode,
    lines: Vec<String>,
}

impl OpenNode {
    /// Freeze the accumulated text into a constant body.
    fn finish(mut self) -> StoryNode {
        let start = self.lines.iter().position(|l| !l.is_empty());
        let end = self.lines.iter().rposition(|l| !l.is_empty());
        let body = match (start, end) {
            (Some(start), Some(end)) => self.lines[start..=end].join("\n"),
            _ => String::new(),
        };
        self.node.set_body(body);
        self.node
    }
}

impl TextParser {
    /// Create a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a story from a string.
    pub fn parse(&self, source: &str) -> ParseResult<ParsedStory> {
        let mut story = Story::new();
        let mut links = Vec::new();
        let mut diagnostics = Vec::new();
        let mut current: Option<OpenNode> = None;

        let mut offset = 0;
        for (index, raw) in source.split('\n').enumerate() {
            let line = index + 1;
            let span = offset..offset + raw.len();
            offset += raw.len() + 1;

            let trimmed = raw.trim();
            if trimmed.starts_with("//") {
                continue;
            }

            if current.is_none() && trimmed.contains('=') {
                self.apply_metadata(&mut story, trimmed, line, span, &mut diagnostics)?;
                continue;
            }

            if let Some(id) = node_marker(trimmed) {
                if let Some(open) = current.take() {
                    insert(&mut story, open.finish(), line, &span)?;
                }
                if story.contains_node(id) {
                    return Err(ParseError::Story {
                        line,
                        span,
                        source: st_core::StoryError::DuplicateNodeId(id.to_string()),
                    });
                }
                current = Some(OpenNode {
                    node: StoryNode::new(id),
                    lines: Vec::new(),
                });
                continue;
            }

            let Some(open) = current.as_mut() else {
                continue;
            };

            if let Some(caps) = OPTION_LINE.captures(trimmed) {
                let label = caps[1].to_string();
                let target = caps[2].to_string();
                open.node
                    .add_option(StoryOption::labeled(label.clone()).leads_to(target.clone()));
                links.push(Link {
                    from: open.node.id().to_string(),
                    label,
                    to: target,
                    line,
                    span,
                });
            } else {
                open.lines.push(trimmed.to_string());
            }
        }

        if let Some(open) = current.take() {
            insert(&mut story, open.finish(), 0, &(source.len()..source.len()))?;
        }

        let mut parsed = ParsedStory {
            story,
            links,
            diagnostics,
        };

        if self.config.warn_dangling_links {
            let warnings: Vec<_> = parsed
                .dangling_links()
                .map(|link| {
                    Diagnostic::warning(
                        link.span.clone(),
                        link.line,
                        format!(
                            "option \"{}\" leads to undeclared node \"{}\"",
                            link.label, link.to
                        ),
                    )
                    .with_label("selecting this option will fail")
                })
                .collect();
            parsed.diagnostics.extend(warnings);
        }

        tracing::debug!(
            title = %parsed.story.title,
            nodes = parsed.story.len(),
            links = parsed.links.len(),
            "parsed story text"
        );
        Ok(parsed)
    }

    /// Parse a story from a buffered reader.
    pub fn parse_reader(&self, mut reader: impl BufRead) -> ParseResult<ParsedStory> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        self.parse(&source)
    }

    /// Parse a story file.
    pub fn parse_file(&self, path: &Path) -> ParseResult<ParsedStory> {
        let source = std::fs::read_to_string(path)?;
        self.parse(&source)
    }

    fn apply_metadata(
        &self,
        story: &mut Story,
        line_text: &str,
        line: usize,
        span: Range<usize>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ParseResult<()> {
        let Some((key, value)) = line_text.split_once('=') else {
            return Ok(());
        };
        let (key, value) = (key.trim(), value.trim());

        match key {
            "title" => story.title = value.to_string(),
            "author" => story.author = value.to_string(),
            "initialNode" => story.set_initial_node_id(value),
            _ => match self.config.unknown_metadata {
                MetadataPolicy::Ignore => {}
                MetadataPolicy::Warn => {
                    tracing::warn!(line, key, "ignoring unknown metadata key");
                    diagnostics.push(
                        Diagnostic::warning(span, line, format!("unknown metadata key \"{key}\""))
                            .with_label("ignored"),
                    );
                }
                MetadataPolicy::Reject => {
                    return Err(ParseError::UnknownMetadata {
                        line,
                        span,
                        key: key.to_string(),
                    });
                }
            },
        }
        Ok(())
    }
}

/// The id of a `[id]` node marker line.
fn node_marker(line: &str) -> Option<&str> {
    if line.len() >= 3 && line.starts_with('[') && line.ends_with(']') {
        Some(&line[1..line.len() - 1])
    } else {
        None
    }
}

fn insert(story: &mut Story, node: StoryNode, line: usize, span: &Range<usize>) -> ParseResult<()> {
    story
        .insert_node(node)
        .map(|_| ())
        .map_err(|source| ParseError::Story {
            line,
            span: span.clone(),
            source,
        })
}
