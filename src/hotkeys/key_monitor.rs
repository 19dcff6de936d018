// allow non camel-case names for this entire file
#![allow(non_camel_case_types)]


use std::sync::{Arc, RwLock, PoisonError};
use std::sync::atomic::{AtomicU64, Ordering};

use derive_deref::Deref;

use crate::*;



/// Whether the OS should keep delivering a kbd event to other applications after we've looked at it
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub enum EventPropagationDirective {
    EventProp_Continue,
    EventProp_Stop,
}


/// A monitored combo and the action it fires
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub struct MonitorEntry {
    pub combo  : ParsedCombination,
    pub action : HotkeyAction,
}

/// The table of monitored combos, in registration order. <br>
/// Replaced wholesale on reload, never edited in place while the monitor is live.
# [ derive (Debug, Default, Clone) ]
pub struct MonitorTable {
    entries : Vec<MonitorEntry>,
}

impl MonitorTable {
    pub fn new (entries: Vec<MonitorEntry>) -> MonitorTable { MonitorTable { entries } }

    pub fn entries (&self) -> &[MonitorEntry] { &self.entries }
    pub fn len (&self) -> usize { self.entries.len() }
    pub fn is_empty (&self) -> bool { self.entries.is_empty() }

    /// first entry (in registration order) with exactly these modifiers and key
    pub fn find (&self, mods:ModSet, key:VKey) -> Option<HotkeyAction> {
        self.entries .iter() .find (|e| e.combo.matches(mods, key)) .map (|e| e.action)
    }
}



/// What the monitor decided for one kbd event : whether to let it through, whether to fire an action for it, and
/// whether the hook should tap the mask key (a swallowed key under held win/alt would otherwise leave their release
/// looking like a lone tap to the shell)
# [ derive (Debug, Eq, PartialEq, Copy, Clone) ]
pub struct MonitorDecision {
    pub event_prop_d : EventPropagationDirective,
    pub fire         : Option<HotkeyAction>,
    pub mask_release : bool,
}

impl MonitorDecision {
    pub fn pass () -> MonitorDecision {
        MonitorDecision { event_prop_d: EventPropagationDirective::EventProp_Continue, fire: None, mask_release: false }
    }
    pub fn swallow (fire: Option<HotkeyAction>, mods:ModSet) -> MonitorDecision {
        MonitorDecision { event_prop_d: EventPropagationDirective::EventProp_Stop, fire, mask_release: mods.needs_release_mask() }
    }
}



/// Down state of all 256 vk-codes as a lock-free bitset .. lets us fire only on the key-down edge (no auto-repeats)
# [ derive (Debug, Default) ]
pub struct HeldKeys ([AtomicU64; 4]);

impl HeldKeys {
    fn slot (&self, vk:VKey) -> (&AtomicU64, u64) {
        let idx = (vk.0 & 0xFF) as usize;
        (&self.0[idx / 64], 1u64 << (idx % 64))
    }
    /// marks the key down, returning whether it was already down (i.e. this is a repeat)
    pub fn press (&self, vk:VKey) -> bool {
        let (word, bit) = self.slot(vk);
        word.fetch_or (bit, Ordering::AcqRel) & bit != 0
    }
    pub fn release (&self, vk:VKey) {
        let (word, bit) = self.slot(vk);
        word.fetch_and (!bit, Ordering::AcqRel);
    }
    pub fn is_held (&self, vk:VKey) -> bool {
        let (word, bit) = self.slot(vk);
        word.load(Ordering::Acquire) & bit != 0
    }
    /// forgets all down state (key-ups we never saw, e.g. while the secure desktop had the input)
    pub fn reset (&self) {
        self.0 .iter() .for_each (|w| w.store (0, Ordering::Release));
    }
}



pub struct _KeyMonitor {
    // the published table .. readers clone the Arc out and drop the lock right away, reload swaps in a fresh one
    table : RwLock <Arc <MonitorTable>>,
    held  : HeldKeys,
}

/// The monitored tier's matcher, shared between the registry (which publishes tables) and the low-level kbd hook
/// (which runs every key event through it). Cheap to clone.
# [ derive (Clone, Deref) ]
pub struct KeyMonitor ( Arc <_KeyMonitor> );

impl Default for KeyMonitor {
    fn default () -> Self { KeyMonitor::new() }
}

impl KeyMonitor {

    pub fn new () -> KeyMonitor {
        KeyMonitor ( Arc::new ( _KeyMonitor {
            table : RwLock::new ( Arc::new ( MonitorTable::default() ) ),
            held  : HeldKeys::default(),
        } ) )
    }

    /// atomically replaces the live table, starting the new one off w no keys considered held
    pub fn publish (&self, table:MonitorTable) {
        *self.table.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(table);
        self.held.reset();
    }

    /// whether the monitor currently thinks this key is down
    pub fn is_held (&self, vk:VKey) -> bool { self.held.is_held(vk) }

    pub fn clear (&self) { self.publish (MonitorTable::default()) }

    pub fn snapshot (&self) -> Arc<MonitorTable> {
        self.table.read().unwrap_or_else(PoisonError::into_inner) .clone()
    }

    pub fn is_empty (&self) -> bool { self.snapshot().is_empty() }


    /// Runs one kbd event through the table, given the live modifier snapshot at the time of the event. <br>
    /// A key-down matching an entry is swallowed, and fires its action only if it is a fresh press (not a repeat).
    /// Everything else (key-ups, modifier keys, unmatched keys, injected events) passes through untouched.
    pub fn on_key_event (&self, ev:&KbdEvent, mods:ModSet) -> MonitorDecision {
        if ev.injected { return MonitorDecision::pass() }
        if !ev.ev_t.is_down() {
            self.held.release(ev.key);
            return MonitorDecision::pass()
        }
        let was_held = self.held.press(ev.key);
        if ModKey::is_modifier_vkey(ev.key) { return MonitorDecision::pass() }

        match self.snapshot().find (mods, ev.key) {
            Some(action) if !was_held => MonitorDecision::swallow (Some(action), mods),
            Some(_)                   => MonitorDecision::swallow (None, mods),
            None                      => MonitorDecision::pass(),
        }
    }

}
