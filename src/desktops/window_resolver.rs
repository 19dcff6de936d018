use log::debug;

use crate::*;



/// Scoped attachment of one thread's input queue to another's. Detaches on drop, so every exit path
/// (early returns, panics unwinding through the queries made while attached) releases the pairing.
pub struct ThreadInputAttachment <'a, W: WindowSystem + ?Sized> {
    ws       : &'a W,
    from     : ThreadId,
    to       : ThreadId,
    attached : bool,
}

impl <'a, W: WindowSystem + ?Sized> ThreadInputAttachment<'a, W> {

    /// Attaches `from` to `to`. A thread cant be attached to itself, so that case (and an OS refusal) yields a guard
    /// that holds nothing, and queries made under it just see the calling thread's own queue.
    pub fn attach (ws:&'a W, from:ThreadId, to:ThreadId) -> ThreadInputAttachment<'a, W> {
        let attached = from != to && ws.attach_thread_input (from, to, true);
        if from != to && !attached { debug! ("could not attach input of thread {} to thread {}", from, to) }
        ThreadInputAttachment { ws, from, to, attached }
    }

    pub fn is_attached (&self) -> bool { self.attached }
}

impl <'a, W: WindowSystem + ?Sized> Drop for ThreadInputAttachment<'a, W> {
    fn drop (&mut self) {
        if self.attached {
            self.ws.attach_thread_input (self.from, self.to, false);
        }
    }
}



/// Finds the top-level window the user is actually working in, even when the shell or taskbar is what the OS
/// currently reports as foreground (as it is right after a tray interaction). <br>
/// Candidates are normalized to their root ancestor, and only visible non-shell non-taskbar windows qualify. We try :
/// - the foreground window itself
/// - the foreground thread's gui state : its active, focus, capture and caret windows, in that order
/// - the active and focus windows read through the foreground thread's input queue, while attached to it
pub fn resolve_active_window <W: WindowSystem + ?Sized> (ws:&W) -> Option<WindowHandle> {

    let (shell, taskbar) = (ws.shell_window(), ws.taskbar_window());

    let pick = |w: Option<WindowHandle>| {
        w .and_then (|w| ws.root_ancestor(w))
          .filter (|w| Some(*w) != shell && Some(*w) != taskbar && ws.is_visible(*w))
    };

    let fg = ws.foreground_window();
    if let Some(w) = pick(fg) { return Some(w) }

    let thread = fg .and_then (|w| ws.window_thread(w))?;

    if let Some(gui) = ws.gui_thread_state (thread) {
        let found = [gui.active, gui.focus, gui.capture, gui.caret] .into_iter() .find_map (pick);
        if found.is_some() { return found }
    }

    let _attachment = ThreadInputAttachment::attach (ws, ws.current_thread(), thread);
    [ws.active_window(), ws.focus_window()] .into_iter() .find_map (pick)
}




#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    const APP: WindowHandle = WindowHandle(0x100);
    const APP_CHILD: WindowHandle = WindowHandle(0x101);
    const OTHER: WindowHandle = WindowHandle(0x200);

    #[test]
    fn visible_foreground_is_used_as_is() {
        let mut fw = FakeWindows::new();
        fw.add_window(APP, 7);
        fw.foreground.set(Some(APP));
        assert_eq!(resolve_active_window(&fw), Some(APP));
        assert!(fw.attach_log.borrow().is_empty());
    }

    #[test]
    fn child_windows_are_normalized_to_their_root() {
        let mut fw = FakeWindows::new();
        fw.add_window(APP, 7);
        fw.add_child(APP_CHILD, APP);
        fw.foreground.set(Some(APP_CHILD));
        assert_eq!(resolve_active_window(&fw), Some(APP));
    }

    #[test]
    fn shell_foreground_falls_through_to_gui_thread_state() {
        let mut fw = FakeWindows::new();
        fw.add_window(APP, SHELL_THREAD);
        fw.foreground.set(Some(SHELL));
        fw.gui.insert(SHELL_THREAD, GuiThreadState { active: Some(SHELL), focus: Some(APP), ..Default::default() });
        assert_eq!(resolve_active_window(&fw), Some(APP));
    }

    #[test]
    fn taskbar_foreground_falls_through_to_attached_queue() {
        let mut fw = FakeWindows::new();
        fw.add_window(APP, 7);
        fw.foreground.set(Some(TASKBAR));
        fw.gui.insert(SHELL_THREAD, GuiThreadState { active: Some(TASKBAR), ..Default::default() });
        fw.queues.insert(SHELL_THREAD, (None, Some(APP)));

        assert_eq!(resolve_active_window(&fw), Some(APP));
        assert_eq!(*fw.attach_log.borrow(), vec![(OWN_THREAD, SHELL_THREAD, true), (OWN_THREAD, SHELL_THREAD, false)]);
        assert_eq!(fw.attached_to.get(), None);
    }

    #[test]
    fn hidden_and_shell_candidates_are_never_returned() {
        let mut fw = FakeWindows::new();
        fw.add_window(APP, 7);
        fw.add_window(OTHER, 7);
        fw.hide(OTHER);
        fw.foreground.set(Some(SHELL));
        fw.gui.insert(SHELL_THREAD, GuiThreadState { active: Some(OTHER), focus: Some(SHELL), ..Default::default() });
        fw.queues.insert(SHELL_THREAD, (Some(TASKBAR), Some(OTHER)));
        assert_eq!(resolve_active_window(&fw), None);
    }

    #[test]
    fn no_foreground_resolves_to_none() {
        let fw = FakeWindows::new();
        assert_eq!(resolve_active_window(&fw), None);
        assert!(fw.attach_log.borrow().is_empty());
    }

    #[test]
    fn refused_attachment_is_not_detached() {
        let mut fw = FakeWindows::new();
        fw.deny_attach = true;
        fw.foreground.set(Some(SHELL));
        assert_eq!(resolve_active_window(&fw), None);
        assert_eq!(*fw.attach_log.borrow(), vec![(OWN_THREAD, SHELL_THREAD, true)]);
    }

    #[test]
    fn own_thread_needs_no_attachment() {
        let fw = FakeWindows::new();
        let guard = ThreadInputAttachment::attach(&fw, OWN_THREAD, OWN_THREAD);
        assert!(!guard.is_attached());
        drop(guard);
        assert!(fw.attach_log.borrow().is_empty());
    }

    #[test]
    fn attachment_is_released_when_a_query_panics() {
        let mut fw = FakeWindows::new();
        fw.foreground.set(Some(SHELL));
        fw.panic_on_queue_read = true;
        let res = catch_unwind(AssertUnwindSafe(|| resolve_active_window(&fw)));
        assert!(res.is_err());
        assert_eq!(*fw.attach_log.borrow(), vec![(OWN_THREAD, SHELL_THREAD, true), (OWN_THREAD, SHELL_THREAD, false)]);
        assert_eq!(fw.attached_to.get(), None);
    }
}
