//! Configuration for an interactive play session.

use std::path::PathBuf;

/// Configuration for `storytree play`.
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Show visible but unavailable options greyed out instead of hiding them.
    pub show_unavailable: bool,
    /// Prompt printed before reading the player's answer.
    pub prompt: String,
    /// Where the host loads resources from. Defaults to `resources/` next to
    /// the story file.
    pub resource_dir: Option<PathBuf>,
    /// Print the environment as JSON when the session ends.
    pub dump_env: bool,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            show_unavailable: true,
            prompt: "> ".to_string(),
            resource_dir: None,
            dump_env: false,
        }
    }
}

impl PlayConfig {
    /// Show or hide unavailable options.
    pub fn with_show_unavailable(mut self, show: bool) -> Self {
        self.show_unavailable = show;
        self
    }

    /// Set the input prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Load resources from `dir`.
    pub fn with_resource_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.resource_dir = dir;
        self
    }

    /// Dump the environment when the session ends.
    pub fn with_env_dump(mut self, dump: bool) -> Self {
        self.dump_env = dump;
        self
    }
}
