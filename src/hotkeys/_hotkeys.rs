use std::fmt;

use strum_macros::{Display, EnumIter};

use crate::*;



/// What a fired hotkey asks for .. switching to a desktop, or moving the active window there (and following it)
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone, Display, EnumIter) ]
pub enum ActionKind {
    Switch,
    Move,
}

/// The action bound to a hotkey. The desktop index is 1-based (desktop 1 is the first listed desktop)
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub struct HotkeyAction {
    pub kind    : ActionKind,
    pub desktop : u32,
}

impl HotkeyAction {
    pub fn switch (desktop:u32) -> HotkeyAction { HotkeyAction { kind: ActionKind::Switch, desktop } }
    pub fn move_to (desktop:u32) -> HotkeyAction { HotkeyAction { kind: ActionKind::Move, desktop } }
}

impl fmt::Display for HotkeyAction {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write! (f, "{} to desktop {}", self.kind, self.desktop)
    }
}



/// One configured binding .. the textual combo and the action it fires. Several bindings can share an action.
# [ derive (Debug, Eq, PartialEq, Hash, Clone) ]
pub struct HotkeyBinding {
    pub combination : String,
    pub action      : HotkeyAction,
}

impl HotkeyBinding {
    pub fn new (combination: impl Into<String>, action:HotkeyAction) -> HotkeyBinding {
        HotkeyBinding { combination: combination.into(), action }
    }
}



/// A parsed combo : the required modifier set and exactly one non-modifier key. <br>
/// Both registration tiers match on exactly this, so native and monitored combos mean the same thing.
/// (auto-repeat is always suppressed .. natively via MOD_NOREPEAT, in the monitor by key-down edge detection)
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub struct ParsedCombination {
    pub mods : ModSet,
    pub key  : VKey,
}

impl ParsedCombination {
    /// the modifier flags to hand the OS hotkey table, incl the no-repeat flag
    pub fn native_modifiers (&self) -> u32 { self.mods.bits() | MOD_NOREPEAT_FLAG }

    pub fn matches (&self, mods:ModSet, key:VKey) -> bool { self.mods == mods && self.key == key }
}

impl fmt::Display for ParsedCombination {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.is_empty() { write! (f, "{}", self.key) }
        else { write! (f, "{}+{}", self.mods, self.key) }
    }
}



/// Which interception tier a binding landed in
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone, Display) ]
pub enum Tier {
    Native,
    Monitored,
}

/// Tier specific data of a registration .. native entries hold the OS hotkey id they were registered under
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub enum EntryTier {
    Native { id: i32 },
    Monitored,
}

/// A binding that made it into one of the tiers during a reload pass
# [ derive (Debug, Eq, PartialEq, Clone) ]
pub struct RegistrationEntry {
    pub binding : HotkeyBinding,
    pub combo   : ParsedCombination,
    pub tier    : EntryTier,
}

impl RegistrationEntry {
    pub fn tier (&self) -> Tier {
        match self.tier {
            EntryTier::Native {..} => Tier::Native,
            EntryTier::Monitored   => Tier::Monitored,
        }
    }
    pub fn native_id (&self) -> Option<i32> {
        if let EntryTier::Native {id} = self.tier { Some(id) } else { None }
    }
}




/// A combo string that isnt one modifier-set plus exactly one alphanumeric or F1..F24 key
# [ derive (Debug, Eq, PartialEq, Clone, thiserror::Error) ]
pub enum ComboParseError {
    #[error ("empty combination")]
    Empty,
    #[error ("unrecognized key token '{0}'")]
    UnknownToken (String),
    #[error ("more than one non-modifier key ('{first}' and '{second}')")]
    SecondKey { first: String, second: String },
    #[error ("no non-modifier key in combination")]
    NoKey,
}

/// The OS refused a native hotkey (typically because something else already owns that combo system-wide)
# [ derive (Debug, Eq, PartialEq, Clone, thiserror::Error) ]
#[error ("native registration of {combination} (id {id}) was denied (os error {os_code})")]
pub struct RegistrationDenied {
    pub id          : i32,
    pub combination : String,
    pub os_code     : u32,
}

/// The system-wide low-level keyboard monitor could not be installed
# [ derive (Debug, Eq, PartialEq, Clone, thiserror::Error) ]
#[error ("could not install the low-level keyboard monitor: {0}")]
pub struct MonitorInstallFailed (pub String);
