//! Static checks on a story file.

use std::path::Path;
use std::rc::Rc;

use st_core::{HeadlessHost, Scope, Session};
use st_text::ParserConfig;

pub fn run(file: &Path, parser: ParserConfig) -> Result<(), String> {
    let parsed = super::load(file, parser.with_dangling_link_warnings(true))?;

    let session = Session::new(Rc::new(HeadlessHost));
    let scope = Scope::new(&parsed.story, &session);
    let initial = parsed
        .story
        .initial_node(&scope)
        .map_err(|e| format!("cannot resolve the initial node: {e}"))?;

    println!(
        "  All checks passed for '{}'.",
        super::display_title(&parsed, file)
    );
    println!(
        "  {} nodes, {} options, starting at [{initial}]",
        parsed.story.len(),
        parsed.links.len()
    );
    Ok(())
}
