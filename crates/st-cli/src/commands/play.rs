//! Interactive play in the terminal.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use colored::Colorize;
use st_core::{Host, HostError, Session, Story, StoryError, StoryResult};
use st_engine::{NodeView, StoryReader};
use st_text::ParserConfig;

use crate::config::PlayConfig;
use crate::host::TerminalHost;

pub fn run(file: &Path, parser: ParserConfig, config: &PlayConfig) -> Result<(), String> {
    let parsed = super::load(file, parser)?;
    let resource_dir = config
        .resource_dir
        .clone()
        .unwrap_or_else(|| default_resource_dir(file));

    let host = Rc::new(TerminalHost::stdio(resource_dir));
    let session = Session::new(host.clone());
    let outcome = play(&parsed.story, &session, &host, config);

    if config.dump_env {
        let env = serde_json::to_string_pretty(&session.env().snapshot())
            .map_err(|e| format!("cannot dump environment: {e}"))?;
        println!("{env}");
    }
    finish(outcome, &host)
}

/// `resources/` next to the story file.
fn default_resource_dir(file: &Path) -> PathBuf {
    file.parent()
        .unwrap_or_else(|| Path::new("."))
        .join("resources")
}

/// Aborts and closed input end the session normally.
fn finish(outcome: StoryResult<()>, host: &TerminalHost) -> Result<(), String> {
    match outcome {
        Ok(()) => Ok(()),
        Err(err) if err.is_abort() => {
            if host.is_closed() {
                host.println(&"The story was closed.".dimmed().to_string())
                    .map_err(|e| e.to_string())?;
            }
            Ok(())
        }
        Err(StoryError::Host(HostError::InputClosed)) => Ok(()),
        Err(err) => Err(err.to_string()),
    }
}

fn play(
    story: &Story,
    session: &Session,
    host: &TerminalHost,
    config: &PlayConfig,
) -> StoryResult<()> {
    session.resources()?.load_resources()?;

    if !story.title.is_empty() {
        host.println(&story.title.bold().to_string())?;
    }
    if !story.author.is_empty() {
        host.println(&format!("by {}", story.author).dimmed().to_string())?;
    }

    let mut reader = StoryReader::new(story, session);
    reader.start()?;

    loop {
        let Some(view) = reader.current() else {
            return Ok(());
        };
        let shown = render(host, view, config)?;
        if shown.is_empty() {
            host.println(&"The End".bold().to_string())?;
            return Ok(());
        }

        let Some(answer) = host.read_line(&config.prompt)? else {
            return Ok(());
        };
        if answer.eq_ignore_ascii_case("q") || answer.eq_ignore_ascii_case("quit") {
            return Ok(());
        }

        match pick(&answer, &shown, view) {
            Ok(position) => {
                reader.press(position)?;
            }
            Err(message) => host.warn(&message),
        }
    }
}

/// Print the node and number the options the player may pick from.
///
/// Returns the positions in `view.options` of the numbered options.
fn render(host: &TerminalHost, view: &NodeView, config: &PlayConfig) -> StoryResult<Vec<usize>> {
    host.println("")?;
    if !view.text.is_empty() {
        host.println(&view.text)?;
        host.println("")?;
    }

    let mut shown = Vec::new();
    for (position, option) in view.options.iter().enumerate() {
        if !option.available && !config.show_unavailable {
            continue;
        }
        shown.push(position);
        let line = format!("  {}) {}", shown.len(), option.label);
        if option.available {
            host.println(&line)?;
        } else {
            host.println(&line.dimmed().to_string())?;
        }
    }
    Ok(shown)
}

fn pick(answer: &str, shown: &[usize], view: &NodeView) -> Result<usize, String> {
    let number: usize = answer
        .parse()
        .map_err(|_| "enter an option number, or q to quit".to_string())?;
    let position = number
        .checked_sub(1)
        .and_then(|i| shown.get(i))
        .copied()
        .ok_or_else(|| format!("there is no option {number}"))?;

    let option = &view.options[position];
    if option.available {
        Ok(position)
    } else {
        Err(format!("\"{}\" is not available", option.label))
    }
}
