//! Story metadata and node listing.

use std::path::Path;
use std::rc::Rc;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use st_core::{HeadlessHost, Scope, Session, StoryResult};
use st_text::{ParsedStory, ParserConfig};

pub fn run(file: &Path) -> Result<(), String> {
    let parsed = super::load(file, ParserConfig::default())?;
    let story = &parsed.story;

    println!("  {}", super::display_title(&parsed, file).bold());
    if !story.author.is_empty() {
        println!("  by {}", story.author);
    }
    if !story.id.is_empty() {
        println!("  id: {}", story.id);
    }
    println!();

    if story.is_empty() {
        println!("  No nodes.");
        return Ok(());
    }

    let session = Session::new(Rc::new(HeadlessHost));
    let scope = Scope::new(story, &session);
    let table = node_table(&parsed, &scope).map_err(|e| e.to_string())?;

    println!("{table}");
    println!();
    println!("  {} nodes", story.len());
    Ok(())
}

fn node_table(parsed: &ParsedStory, scope: &Scope<'_>) -> StoryResult<Table> {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Node", "Options", "Leads to", "Text"]);

    for node in parsed.story.nodes() {
        let targets: Vec<&str> = parsed
            .links
            .iter()
            .filter(|link| link.from == node.id().as_str())
            .map(|link| link.to.as_str())
            .collect();
        let targets = if targets.is_empty() {
            "-".to_string()
        } else {
            targets.join(", ")
        };

        table.add_row(vec![
            node.id().to_string(),
            node.options().len().to_string(),
            targets,
            preview(&node.text(scope)?),
        ]);
    }
    Ok(table)
}

/// First line of the text, shortened to fit a table cell.
fn preview(text: &str) -> String {
    let first = text.lines().next().unwrap_or_default();
    if first.chars().count() > 50 {
        format!("{}...", first.chars().take(47).collect::<String>())
    } else if first.is_empty() {
        "-".to_string()
    } else {
        first.to_string()
    }
}
