use log::debug;
use rustc_hash::FxHashMap;

use crate::*;



/// Remembers, per desktop, the window that was active when we last switched away from it. <br>
/// Only the dispatch context touches this, so it needs no locking. Records are overwritten, never evicted.
# [ derive (Debug, Default) ]
pub struct FocusTracker {
    records : FxHashMap <DesktopId, WindowHandle>,
}

impl FocusTracker {

    pub fn new () -> FocusTracker { FocusTracker::default() }

    pub fn last_focus (&self, desktop:DesktopId) -> Option<WindowHandle> { self.records.get(&desktop).copied() }

    pub fn len (&self) -> usize { self.records.len() }

    pub fn is_empty (&self) -> bool { self.records.is_empty() }


    /// Records the currently active window against the desktop we're about to leave (no-op if none resolves)
    pub fn record_before_leaving <W> (&mut self, desktop:&DesktopHandle, ws:&W) -> Option<WindowHandle>
        where W: WindowSystem + ?Sized
    {
        let w = resolve_active_window (ws)?;
        debug! ("leaving desktop #{} with window {} active", desktop.position, w);
        self.records.insert (desktop.id, w);
        Some(w)
    }

    /// Re-focuses the window recorded for this desktop, if it is still visible and still actually lives there.
    /// Returns whether focus was requested.
    pub fn restore_on_arrival <W, D> (&self, desktop:&DesktopHandle, ws:&W, desktops:&D) -> bool
        where W: WindowSystem + ?Sized, D: DesktopService + ?Sized
    {
        let Some(w) = self.last_focus (desktop.id) else { return false };
        if !ws.is_visible(w) || !desktops.is_window_on_desktop (w, desktop) {
            debug! ("not restoring stale focus record {} on desktop #{}", w, desktop.position);
            return false
        }
        ws.set_foreground(w)
    }

}
