use log::{debug, error, info, warn};
use rustc_hash::FxHashMap;

use crate::*;



/// The OS side of the two registration tiers. <br>
/// Native registrations are by numeric id, the monitor is a single process-wide low-level kbd hook whose matching
/// is done against the [`KeyMonitor`] the registry publishes tables into.
pub trait HotkeyBackend {
    fn register_native   (&mut self, id:i32, combo:&ParsedCombination) -> Result<(), RegistrationDenied>;
    fn unregister_native (&mut self, id:i32);

    fn install_monitor   (&mut self) -> Result<(), MonitorInstallFailed>;
    /// must be idempotent .. called whenever the monitor isnt needed, whether or not it was installed
    fn uninstall_monitor (&mut self);
    fn is_monitor_installed (&self) -> bool;
}


/// Summary of one reload pass
# [ derive (Debug, Default, Eq, PartialEq, Copy, Clone) ]
pub struct ReloadReport {
    pub native    : usize,
    pub monitored : usize,
    /// native denials that were not allowed to fall back (hard-mode off, or after a monitor install failure)
    pub dropped   : usize,
    /// combos that didnt parse
    pub invalid   : usize,
    pub monitor_installed : bool,
    pub monitor_failed    : bool,
}



/// The registration strategy .. owns the registration entries and every native hotkey handle, and is their only writer.
/// Each reload tears down the previous pass completely before building the next one.
pub struct HotkeyRegistry <B: HotkeyBackend> {
    backend : B,
    monitor : KeyMonitor,
    entries : Vec <RegistrationEntry>,
    by_id   : FxHashMap <i32, HotkeyAction>,
    next_id : i32,
}


impl <B: HotkeyBackend> HotkeyRegistry<B> {

    pub fn new (backend:B, monitor:KeyMonitor) -> HotkeyRegistry<B> {
        HotkeyRegistry { backend, monitor, entries: Vec::new(), by_id: FxHashMap::default(), next_id: 1 }
    }

    pub fn entries (&self) -> &[RegistrationEntry] { &self.entries }

    pub fn backend (&self) -> &B { &self.backend }

    pub fn monitor (&self) -> &KeyMonitor { &self.monitor }

    /// the action for a native hotkey id the OS reported firing
    pub fn action_for_id (&self, id:i32) -> Option<HotkeyAction> { self.by_id.get(&id).copied() }


    /// Re-registers everything from scratch for the given bindings. <br>
    /// Each binding first tries the native tier. A denial falls back to the monitored tier if hard-mode allows it,
    /// else the binding is dropped. If the monitor is then needed but cant be installed, the whole pass reverts to
    /// native-only (so we never linger in a half-working hybrid state).
    pub fn reload (&mut self, bindings:&[HotkeyBinding], hard_mode:bool) -> ReloadReport {

        self.teardown();

        let (mut entries, mut report) = self.register_pass (bindings, hard_mode);
        let monitored: Vec<MonitorEntry> = entries .iter()
            .filter (|e| e.tier() == Tier::Monitored)
            .map (|e| MonitorEntry { combo: e.combo, action: e.binding.action })
            .collect();

        if hard_mode && !monitored.is_empty() {
            // table goes live before the hook, so the very first hooked event already sees it
            self.monitor.publish (MonitorTable::new (monitored));
            let installed = if self.backend.is_monitor_installed() { Ok(()) } else { self.backend.install_monitor() };
            match installed {
                Ok(()) => { report.monitor_installed = true; }
                Err(e) => {
                    error! ("{} .. hard-mode bindings are degrading to native-only registration", e);
                    self.monitor.clear();
                    self.backend.uninstall_monitor();
                    // release what this pass already holds natively, then redo it w/o the monitored tier
                    self.release_natives (&entries);
                    self.next_id = 1;
                    (entries, report) = self.register_pass (bindings, false);
                    report.monitor_failed = true;
                }
            }
        } else {
            self.monitor.clear();
            self.backend.uninstall_monitor();
        }

        self.by_id = entries .iter() .filter_map (|e| e.native_id() .map (|id| (id, e.binding.action))) .collect();
        self.entries = entries;

        info! ( "hotkeys reloaded : {} native, {} monitored, {} dropped, {} invalid{}",
                report.native, report.monitored, report.dropped, report.invalid,
                if report.monitor_installed { " (kbd monitor active)" } else { "" } );
        report
    }


    /// Releases everything .. all native ids, the monitored table, and the monitor itself
    pub fn clear (&mut self) {
        self.teardown();
        self.backend.uninstall_monitor();
    }


    fn teardown (&mut self) {
        let prior = std::mem::take (&mut self.entries);
        self.release_natives (&prior);
        self.by_id.clear();
        self.monitor.clear();
        self.next_id = 1;
    }

    fn release_natives (&mut self, entries:&[RegistrationEntry]) {
        entries .iter() .filter_map (|e| e.native_id()) .for_each (|id| self.backend.unregister_native(id));
    }


    /// one pass over the bindings, deciding each one's tier .. (monitored entries are only decided here, not installed)
    fn register_pass (&mut self, bindings:&[HotkeyBinding], allow_monitored:bool) -> (Vec<RegistrationEntry>, ReloadReport) {
        let mut report  = ReloadReport::default();
        let mut entries = Vec::with_capacity (bindings.len());

        for binding in bindings {
            let combo = match parse_combination (&binding.combination) {
                Ok(combo) => combo,
                Err(e) => {
                    warn! ("skipping hotkey '{}' ({}): {}", binding.combination, binding.action, e);
                    report.invalid += 1;
                    continue
                }
            };
            let id = self.next_id;
            self.next_id += 1;

            match self.backend.register_native (id, &combo) {
                Ok(()) => {
                    debug! ("'{}' -> native hotkey id {} ({})", binding.combination, id, binding.action);
                    entries.push ( RegistrationEntry { binding: binding.clone(), combo, tier: EntryTier::Native {id} } );
                    report.native += 1;
                }
                Err(denied) if allow_monitored => {
                    debug! ("{} .. '{}' falls back to the kbd monitor", denied, binding.combination);
                    entries.push ( RegistrationEntry { binding: binding.clone(), combo, tier: EntryTier::Monitored } );
                    report.monitored += 1;
                }
                Err(denied) => {
                    warn! ("{} .. dropping '{}' ({})", denied, binding.combination, binding.action);
                    report.dropped += 1;
                }
            }
        }
        (entries, report)
    }

}
