//! A host that talks to the player through a terminal.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;
use st_core::{
    ChoiceCapability, ChoiceIcon, ChoiceOption, ChoiceOutcome, ChoicePrompt, Host, HostError,
    InputCapability, Resource, ResourceCapability, StoryError, StoryResult,
};

/// Reads answers from a line-oriented input and prints to an output stream.
///
/// Warnings and errors go to stderr so they never mix with the narrative.
pub struct TerminalHost {
    input: RefCell<Box<dyn BufRead>>,
    output: RefCell<Box<dyn Write>>,
    resource_dir: PathBuf,
    resources: RefCell<HashMap<String, Vec<u8>>>,
    closed: Cell<bool>,
}

impl TerminalHost {
    pub fn new(input: Box<dyn BufRead>, output: Box<dyn Write>, resource_dir: PathBuf) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
            resource_dir,
            resources: RefCell::default(),
            closed: Cell::new(false),
        }
    }

    /// A host on stdin and stdout.
    pub fn stdio(resource_dir: PathBuf) -> Self {
        Self::new(
            Box::new(io::stdin().lock()),
            Box::new(io::stdout()),
            resource_dir,
        )
    }

    /// Whether the story asked to be closed.
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub fn print(&self, text: &str) -> StoryResult<()> {
        let mut out = self.output.borrow_mut();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(HostError::from)?;
        Ok(())
    }

    pub fn println(&self, text: &str) -> StoryResult<()> {
        self.print(&format!("{text}\n"))
    }

    /// Print `prompt` and read one trimmed line. `None` at end of input.
    pub fn read_line(&self, prompt: &str) -> StoryResult<Option<String>> {
        self.print(prompt)?;
        let mut line = String::new();
        let read = self
            .input
            .borrow_mut()
            .read_line(&mut line)
            .map_err(HostError::from)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl Host for TerminalHost {
    fn warn(&self, message: &str) {
        eprintln!("{} {message}", "warning:".yellow().bold());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {message}", "error:".red().bold());
    }

    fn close_story(&self) -> StoryResult<()> {
        tracing::debug!("story closed by request");
        self.closed.set(true);
        Err(StoryError::Aborted)
    }

    fn input(&self) -> Option<&dyn InputCapability> {
        Some(self)
    }

    fn choices(&self) -> Option<&dyn ChoiceCapability> {
        Some(self)
    }

    fn resources(&self) -> Option<&dyn ResourceCapability> {
        Some(self)
    }
}

impl InputCapability for TerminalHost {
    fn ask_input(&self, question: &str) -> StoryResult<String> {
        self.println("")?;
        self.println(question)?;
        loop {
            match self.read_line("> ")? {
                None => return Err(HostError::InputClosed.into()),
                Some(answer) if !answer.is_empty() => return Ok(answer),
                Some(_) => {}
            }
        }
    }
}

impl ChoiceCapability for TerminalHost {
    fn present_choice(&self, prompt: &ChoicePrompt<'_>) -> StoryResult<ChoiceOutcome> {
        self.println("")?;
        if let Some(title) = prompt.title {
            let heading = match prompt.icon {
                Some(ChoiceIcon::Named(icon)) => format!("[{icon}] {title}"),
                _ => title.to_string(),
            };
            self.println(&heading.bold().to_string())?;
        }
        self.println(prompt.text)?;
        self.println("")?;
        for (i, option) in prompt.options.iter().enumerate() {
            self.println(&styled(i + 1, option))?;
        }
        if prompt.cancellable {
            self.println(&"  0) Cancel".dimmed().to_string())?;
        }

        let count = prompt.options.len();
        loop {
            let Some(answer) = self.read_line("> ")? else {
                return if prompt.cancellable {
                    Ok(ChoiceOutcome::Cancelled)
                } else {
                    Err(HostError::InputClosed.into())
                };
            };
            match answer.parse::<usize>() {
                Ok(0) if prompt.cancellable => return Ok(ChoiceOutcome::Cancelled),
                Ok(n) if (1..=count).contains(&n) => return Ok(ChoiceOutcome::Chosen(n - 1)),
                _ => self.warn(&format!("enter a number between 1 and {count}")),
            }
        }
    }
}

fn styled(number: usize, option: &ChoiceOption) -> String {
    let line = format!("  {number}) {}", option.label);
    match &option.color {
        Some(color) if option.white_text => line.white().on_color(color.as_str()).to_string(),
        Some(color) => line.color(color.as_str()).to_string(),
        None => line,
    }
}

impl ResourceCapability for TerminalHost {
    fn get_resource(&self, name: &str) -> StoryResult<Resource> {
        self.resources
            .borrow()
            .get(name)
            .map(|bytes| Resource::new(name, bytes.clone()))
            .ok_or_else(|| HostError::ResourceNotFound(name.to_string()).into())
    }

    fn load_resources(&self) -> StoryResult<()> {
        let entries = match fs::read_dir(&self.resource_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.resource_dir.display(), "no resource directory");
                return Ok(());
            }
            Err(e) => return Err(HostError::Io(e).into()),
        };

        let mut resources = self.resources.borrow_mut();
        for entry in entries {
            let path = entry.map_err(HostError::from)?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let bytes = fs::read(&path).map_err(HostError::from)?;
            resources.insert(name.to_string(), bytes);
        }
        tracing::debug!(
            dir = %self.resource_dir.display(),
            count = resources.len(),
            "loaded resources"
        );
        Ok(())
    }
}
