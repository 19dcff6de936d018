//! The hotkeys config file (yaml, camelCase keys) and its loading rules.
//!
//! ```yaml
//! hardMode: false
//! desktops:
//!   - desktop: 1
//!     switch: ["Ctrl+Alt+Win+1"]
//!     move: ["Shift+Ctrl+Alt+Win+1"]
//! ```
//!
//! A missing, unreadable, unparsable or desktop-less file loads as the built-in defaults (desktops 1..9 on
//! Ctrl+Alt+Win+N to switch and Shift+Ctrl+Alt+Win+N to move), so the app always comes up with working hotkeys.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::*;


pub const CONFIG_FILE_NAME : &str = "vdesk-hotkeys.yaml";

/// how many desktops the defaults bind
pub const DEFAULT_DESKTOP_COUNT : i64 = 9;



# [ derive (Debug, Clone, PartialEq, Eq, Serialize, Deserialize) ]
# [ serde (rename_all = "camelCase") ]
pub struct Config {
    /// allow falling back to the low-level kbd monitor for combos the OS hotkey table refuses
    #[serde (default)]
    pub hard_mode : bool,

    #[serde (default)]
    pub desktops : Vec <DesktopHotkeys>,
}

/// The combos bound to one desktop (1-based index)
# [ derive (Debug, Clone, PartialEq, Eq, Serialize, Deserialize) ]
pub struct DesktopHotkeys {
    pub desktop : i64,
    #[serde (default)]
    pub switch : Vec <String>,
    #[serde (default, rename = "move")]
    pub move_to : Vec <String>,
}


impl Default for Config {
    fn default () -> Self {
        Config {
            hard_mode : false,
            desktops  : (1 ..= DEFAULT_DESKTOP_COUNT) .map (|i| DesktopHotkeys {
                desktop : i,
                switch  : vec! [ format! ("Ctrl+Alt+Win+{}", i) ],
                move_to : vec! [ format! ("Shift+Ctrl+Alt+Win+{}", i) ],
            }) .collect(),
        }
    }
}


impl Config {

    /// Flattens the config into the ordered binding list for registration .. per desktop entry in file order,
    /// its switch combos then its move combos. Entries with a desktop index below 1 are skipped.
    pub fn bindings (&self) -> Vec<HotkeyBinding> {
        let mut out = Vec::new();
        for dh in &self.desktops {
            let Some(desktop) = u32::try_from(dh.desktop) .ok() .filter (|d| *d >= 1) else {
                warn! ("skipping hotkeys for invalid desktop index {}", dh.desktop);
                continue
            };
            out.extend ( dh.switch .iter() .map (|c| HotkeyBinding::new (c.as_str(), HotkeyAction::switch(desktop))) );
            out.extend ( dh.move_to .iter() .map (|c| HotkeyBinding::new (c.as_str(), HotkeyAction::move_to(desktop))) );
        }
        out
    }

    /// Parses a config file, or None if it doesnt exist
    pub fn read (path:&Path) -> Result<Option<Config>, ConfigError> {
        let text = match fs::read_to_string (path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err ( ConfigError::Read { path: path.to_path_buf(), source } ),
        };
        serde_yaml::from_str (&text) .map (Some)
            .map_err (|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Loads the config at path, falling back to the defaults (with the logged reason) whenever it isnt usable
    pub fn load (path:&Path) -> Config {
        match Config::read (path) {
            Ok(Some(cfg)) if cfg.desktops.is_empty() => {
                warn! ("{} lists no desktops, using default hotkeys", path.display());
                Config { hard_mode: cfg.hard_mode, ..Config::default() }
            }
            Ok(Some(cfg)) => {
                info! ("loaded config from {}", path.display());
                cfg
            }
            Ok(None) => {
                info! ("no config at {}, using default hotkeys", path.display());
                Config::default()
            }
            Err(e) => {
                error! ("{} .. using default hotkeys", e);
                Config::default()
            }
        }
    }

    pub fn to_yaml (&self) -> Result<String, ConfigError> {
        serde_yaml::to_string (self) .map_err (ConfigError::Serialize)
    }

}


/// Writes the default config to path if nothing is there yet, returning whether it wrote one
pub fn ensure_config_file (path:&Path) -> Result<bool, ConfigError> {
    if path.exists() { return Ok(false) }
    let write_err = |source| ConfigError::Write { path: path.to_path_buf(), source };
    if let Some(dir) = path.parent() .filter (|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all (dir) .map_err (write_err)?;
    }
    fs::write (path, Config::default().to_yaml()?) .map_err (write_err)?;
    info! ("wrote default config to {}", path.display());
    Ok(true)
}

/// The config file next to our executable (or in the working dir if the exe path cant be determined)
pub fn default_config_path () -> PathBuf {
    std::env::current_exe() .ok()
        .and_then (|exe| exe.parent() .map (Path::to_path_buf))
        .unwrap_or_default()
        .join (CONFIG_FILE_NAME)
}



# [ derive (Debug, thiserror::Error) ]
pub enum ConfigError {
    #[error ("could not read config {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error ("could not parse config {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_yaml::Error },
    #[error ("could not write config {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error ("could not serialize config: {0}")]
    Serialize (serde_yaml::Error),
}
