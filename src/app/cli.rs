//! Command-line interface of the `vdesk-hotkeys` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::app::config::default_config_path;


/// Hotkeys for switching virtual desktops and moving windows between them
# [ derive (Parser, Debug, Clone) ]
# [ command (name = "vdesk-hotkeys", version, about) ]
pub struct Cli {
    /// Config file to use instead of the one next to the executable
    #[arg (short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Allow the low-level keyboard monitor for combos the OS refuses, whatever the config file says
    #[arg (long)]
    pub hard_mode: bool,

    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg (short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config_path (&self) -> PathBuf {
        self.config.clone() .unwrap_or_else (default_config_path)
    }

    pub fn default_log_filter (&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
