// allow non camel-case names for this entire file
#![allow(non_camel_case_types)]


use std::fmt;

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};



/// Windows virtual-key code .. we only name what combos can use (alphanumerics, F1..F24, the modifier keys),
/// anything else seen at the hook just passes through as a raw code
# [ derive (Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Copy, Clone) ]
pub struct VKey (pub u16);

impl VKey {
    pub const SHIFT : VKey = VKey (0x10);
    pub const CTRL  : VKey = VKey (0x11);
    pub const ALT   : VKey = VKey (0x12);
    pub const LWIN  : VKey = VKey (0x5B);
    pub const RWIN  : VKey = VKey (0x5C);
    pub const F1    : VKey = VKey (0x70);
    pub const F24   : VKey = VKey (0x87);

    // unassigned vks: 0x88-0x8F, 0x97-0x9F, 0xD8-0xDA, 0xE8
    /// tapped while Win/Alt are held so their later release isnt read as a bare tap (start menu, menu bar)
    pub const MASK  : VKey = VKey (0x9A);

    /// letters and digits map to their upper-case ascii code (which is what the OS uses as their vk-code)
    pub fn from_char (c:char) -> Option<VKey> {
        if c.is_ascii_alphanumeric() { Some ( VKey (c.to_ascii_uppercase() as u16) ) } else { None }
    }

    /// F1 .. F24 are contiguous vk-codes
    pub fn function_key (n:u8) -> Option<VKey> {
        if (1..=24).contains(&n) { Some ( VKey (Self::F1.0 + (n as u16 - 1)) ) } else { None }
    }

    pub fn code (self) -> u32 { self.0 as u32 }

    pub fn is_function_key (self) -> bool { (Self::F1.0 ..= Self::F24.0).contains(&self.0) }
}

impl From<u32> for VKey {
    fn from (vk_code:u32) -> Self { VKey (vk_code as u16) }
}

impl fmt::Display for VKey {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.0 as u8 as char;
        if self.0 < 0x80 && (c.is_ascii_uppercase() || c.is_ascii_digit()) { write! (f, "{}", c) }
        else if self.is_function_key() { write! (f, "F{}", self.0 - Self::F1.0 + 1) }
        else { write! (f, "VK_{:#04X}", self.0) }
    }
}




/// The four modifier keys a combo can require (we dont distinguish left/right, same as the OS hotkey table)
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone, EnumIter, EnumString, Display) ]
# [ strum (ascii_case_insensitive) ]
pub enum ModKey {
    #[strum (to_string = "Ctrl", serialize = "Control")]
    Ctrl,
    #[strum (to_string = "Alt")]
    Alt,
    #[strum (to_string = "Shift")]
    Shift,
    #[strum (to_string = "Win", serialize = "Meta")]
    Win,
}

impl ModKey {
    /// bit for this modifier .. these are the same bits the OS hotkey table takes (MOD_ALT, MOD_CONTROL, MOD_SHIFT, MOD_WIN)
    pub fn bit (self) -> u8 {
        use ModKey::*;
        match self { Alt => 0x01, Ctrl => 0x02, Shift => 0x04, Win => 0x08 }
    }

    /// the physical vk-codes whose down state counts as this modifier being held
    pub fn vkeys (self) -> &'static [VKey] {
        use ModKey::*;
        match self {
            Ctrl  => &[VKey::CTRL],
            Alt   => &[VKey::ALT],
            Shift => &[VKey::SHIFT],
            Win   => &[VKey::LWIN, VKey::RWIN],
        }
    }

    pub fn is_modifier_vkey (vk:VKey) -> bool {
        ModKey::iter() .any (|mk| mk.vkeys().contains(&vk))
            // and the left/right specific codes that the hook reports for ctrl/alt/shift
            || (0xA0 ..= 0xA5).contains(&vk.0)
    }
}



/// Set of modifier keys, stored as the OS hotkey-table bit flags
# [ derive (Debug, Default, Eq, PartialEq, Hash, Copy, Clone) ]
pub struct ModSet (u8);

/// flag asking the OS hotkey table to not re-fire on auto-repeat (MOD_NOREPEAT)
pub const MOD_NOREPEAT_FLAG : u32 = 0x4000;

impl ModSet {
    pub fn empty () -> ModSet { ModSet (0) }

    pub fn of (mods: &[ModKey]) -> ModSet {
        mods .iter() .fold (ModSet::empty(), |ms, mk| ms.with(*mk))
    }

    pub fn with (self, mk:ModKey) -> ModSet { ModSet (self.0 | mk.bit()) }

    pub fn insert (&mut self, mk:ModKey) { self.0 |= mk.bit() }

    pub fn contains (&self, mk:ModKey) -> bool { self.0 & mk.bit() != 0 }

    pub fn is_empty (&self) -> bool { self.0 == 0 }

    pub fn bits (&self) -> u32 { self.0 as u32 }

    /// whether releasing these modifiers after a swallowed key would look like a lone win/alt tap to the shell
    pub fn needs_release_mask (&self) -> bool { self.contains(ModKey::Win) || self.contains(ModKey::Alt) }

    pub fn iter (&self) -> impl Iterator<Item=ModKey> + '_ {
        ModKey::iter() .filter (move |mk| self.contains(*mk))
    }

    /// Snapshot of currently held modifiers, given a live key-state query
    pub fn from_pressed (is_pressed: impl Fn(VKey) -> bool) -> ModSet {
        ModKey::iter()
            .filter (|mk| mk.vkeys() .iter() .any (|vk| is_pressed(*vk)))
            .fold (ModSet::empty(), |ms, mk| ms.with(mk))
    }
}

impl fmt::Display for ModSet {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write! (f, "{}", self.iter() .join("+"))
    }
}




/// The keyboard event type is the OS provided down/up or sys-down/up (which fires when Alt is held down etc)
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub enum KbdEvent_T {
    KbdEvent_KeyDown,
    KbdEvent_SysKeyDown,
    KbdEvent_KeyUp,
    KbdEvent_SysKeyUp,
}

impl KbdEvent_T {
    pub fn is_down (self) -> bool {
        use KbdEvent_T::*;
        matches! (self, KbdEvent_KeyDown | KbdEvent_SysKeyDown)
    }
}


/// A kbd event as seen by the low-level monitor
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub struct KbdEvent {
    pub ev_t     : KbdEvent_T,
    pub key      : VKey,
    /// synthesized via SendInput (by us or anyone else) rather than typed .. the monitor leaves these alone
    pub injected : bool,
}

impl KbdEvent {
    pub fn down (key:VKey) -> KbdEvent { KbdEvent { ev_t: KbdEvent_T::KbdEvent_KeyDown, key, injected: false } }
    pub fn up   (key:VKey) -> KbdEvent { KbdEvent { ev_t: KbdEvent_T::KbdEvent_KeyUp,   key, injected: false } }
    pub fn as_injected (self) -> KbdEvent { KbdEvent { injected: true, ..self } }
}
