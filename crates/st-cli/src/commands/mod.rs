//! Subcommand implementations and the story loading they share.

pub mod check;
pub mod info;
pub mod play;

use std::fs;
use std::path::Path;

use st_text::diagnostics::render_diagnostics;
use st_text::{Diagnostic, ParsedStory, ParserConfig, TextParser};

/// Parse a story file and print its diagnostics.
fn load(file: &Path, config: ParserConfig) -> Result<ParsedStory, String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {e}", file.display()))?;

    match TextParser::new(config).parse(&source) {
        Ok(parsed) => {
            print_diagnostics(&source, file, &parsed.diagnostics);
            Ok(parsed)
        }
        Err(err) => {
            if let Some(diagnostic) = err.to_diagnostic() {
                print_diagnostics(&source, file, &[diagnostic]);
            }
            Err(format!("parsing failed: {err}"))
        }
    }
}

/// Print diagnostics to stderr using ariadne.
fn print_diagnostics(source: &str, file: &Path, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let filename = file.display().to_string();
    eprint!("{}", render_diagnostics(source, &filename, diagnostics));

    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    let warnings = diagnostics.len() - errors;

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    } else {
        eprintln!(
            "  {} warning{}",
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
    }
}

/// The story title, falling back to the file name.
fn display_title(parsed: &ParsedStory, file: &Path) -> String {
    if parsed.story.title.is_empty() {
        file.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        parsed.story.title.clone()
    }
}
