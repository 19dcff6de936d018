use log::{debug, info, warn};

use crate::*;



/// Why a fired action had no effect. None of these are fatal : the action is logged and dropped.
# [ derive (Debug, Eq, PartialEq, Clone, thiserror::Error) ]
pub enum ActionError {
    #[error ("desktop {desktop} does not exist (there are {count})")]
    IndexOutOfRange { desktop: u32, count: usize },
    #[error ("no usable active window to move")]
    NoActiveWindow,
    #[error (transparent)]
    Move (#[from] MoveError),
    #[error (transparent)]
    Desktop (#[from] DesktopError),
}



/// The application logic behind fired hotkeys : switching desktops (w focus save/restore around it), and moving the
/// active window to a desktop and following it there. Runs only on the dispatch context, which owns it.
pub struct DesktopActions <D: DesktopService, W: WindowSystem> {
    desktops : D,
    windows  : W,
    focus    : FocusTracker,
}

impl <D: DesktopService, W: WindowSystem> DesktopActions<D, W> {

    pub fn new (desktops:D, windows:W) -> DesktopActions<D, W> {
        DesktopActions { desktops, windows, focus: FocusTracker::new() }
    }

    pub fn desktops (&self) -> &D { &self.desktops }
    pub fn windows  (&self) -> &W { &self.windows }
    pub fn focus    (&self) -> &FocusTracker { &self.focus }


    pub fn perform (&mut self, action:HotkeyAction) -> Result<(), ActionError> {
        let target = self.target (action.desktop)?;
        match action.kind {
            ActionKind::Switch => self.switch_to (&target),
            ActionKind::Move   => self.move_active_to (&target),
        }
    }

    /// resolves a 1-based desktop index against the current desktop list
    fn target (&self, desktop:u32) -> Result<DesktopHandle, ActionError> {
        let list = self.desktops.list_desktops()?;
        (desktop as usize) .checked_sub(1) .and_then (|i| list.get(i)) .copied()
            .ok_or (ActionError::IndexOutOfRange { desktop, count: list.len() })
    }

    /// record, switch, restore .. also when already on the target, which re-focuses the working window there
    /// (e.g. after a tray click left the taskbar in the foreground)
    fn switch_to (&mut self, target:&DesktopHandle) -> Result<(), ActionError> {
        match self.desktops.current_desktop() {
            Ok(cur) => {
                if cur.id == target.id { debug! ("already on desktop #{} .. re-focusing", target.position) }
                self.focus.record_before_leaving (&cur, &self.windows);
            }
            Err(e) => warn! ("{} .. switching without saving focus", e),
        }
        self.desktops.switch_to (target)?;
        self.focus.restore_on_arrival (target, &self.windows, &self.desktops);
        Ok(())
    }

    /// moves first, and only once that succeeded do we switch over and focus the moved window
    fn move_active_to (&mut self, target:&DesktopHandle) -> Result<(), ActionError> {
        let w = resolve_active_window (&self.windows) .ok_or (ActionError::NoActiveWindow)?;
        self.desktops.move_window_to (w, target)?;
        self.desktops.switch_to (target)?;
        if !self.windows.set_foreground (w) {
            debug! ("foreground request for moved window {} was refused", w);
        }
        Ok(())
    }

}


impl <D: DesktopService, W: WindowSystem> ActionHandler for DesktopActions<D, W> {
    fn on_action (&mut self, action:HotkeyAction) {
        match self.perform (action) {
            Ok(())  => info! ("{}", action),
            Err(e)  => warn! ("{} failed: {}", action, e),
        }
    }
}




#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    const W1: WindowHandle = WindowHandle(0x100);
    const W2: WindowHandle = WindowHandle(0x200);

    fn actions() -> DesktopActions<FakeDesktops, FakeWindows> {
        actions_with(FakeWindows::new())
    }

    fn actions_with(mut fw: FakeWindows) -> DesktopActions<FakeDesktops, FakeWindows> {
        fw.add_window(W1, 7);
        fw.add_window(W2, 8);
        let fd = FakeDesktops::new(3);
        fd.place(W1, 0);
        fd.place(W2, 1);
        fw.foreground.set(Some(W1));
        DesktopActions::new(fd, fw)
    }

    #[test]
    fn switching_away_and_back_restores_focus() {
        let mut da = actions();
        da.perform(HotkeyAction::switch(2)).unwrap();
        assert_eq!(da.desktops().current.get(), 1);
        // the OS hands foreground to something on the new desktop
        da.windows().foreground.set(Some(W2));

        da.perform(HotkeyAction::switch(1)).unwrap();
        assert_eq!(da.desktops().current.get(), 0);
        assert_eq!(da.windows().foreground.get(), Some(W1));
        assert_eq!(da.focus().last_focus(da.desktops().desktop(1).id), Some(W2));
    }

    #[test]
    fn move_takes_the_window_along_and_focuses_it() {
        let mut da = actions();
        da.perform(HotkeyAction::move_to(3)).unwrap();
        let d3 = da.desktops().desktop(2);
        assert!(da.desktops().is_window_on_desktop(W1, &d3));
        assert_eq!(da.desktops().current.get(), 2);
        assert_eq!(*da.windows().foreground_requests.borrow(), vec![W1]);
        // moves dont touch the focus records
        assert!(da.focus().is_empty());
    }

    #[test]
    fn failed_move_changes_nothing() {
        let mut da = actions();
        da.desktops().fail_moves.set(true);
        let err = da.perform(HotkeyAction::move_to(2)).unwrap_err();
        assert!(matches!(err, ActionError::Move(_)));
        assert_eq!(da.desktops().current.get(), 0);
        assert!(da.desktops().switches.borrow().is_empty());
        assert!(da.windows().foreground_requests.borrow().is_empty());
    }

    #[test]
    fn move_without_active_window_does_not_switch() {
        let mut da = actions();
        da.windows().foreground.set(Some(SHELL));
        assert_eq!(da.perform(HotkeyAction::move_to(2)), Err(ActionError::NoActiveWindow));
        assert!(da.desktops().switches.borrow().is_empty());
    }

    #[test]
    fn out_of_range_indices_are_no_ops() {
        let mut da = actions();
        assert_eq!(da.perform(HotkeyAction::switch(0)), Err(ActionError::IndexOutOfRange { desktop: 0, count: 3 }));
        assert_eq!(da.perform(HotkeyAction::switch(4)), Err(ActionError::IndexOutOfRange { desktop: 4, count: 3 }));
        assert_eq!(da.perform(HotkeyAction::move_to(9)), Err(ActionError::IndexOutOfRange { desktop: 9, count: 3 }));
        assert!(da.desktops().switches.borrow().is_empty());
    }

    #[test]
    fn switching_to_the_current_desktop_refocuses_the_working_window() {
        // a tray click leaves the taskbar in front, while W1 is still what the shell thread sees as active
        let mut fw = FakeWindows::new();
        fw.gui.insert(SHELL_THREAD, GuiThreadState { active: Some(W1), ..Default::default() });
        let mut da = actions_with(fw);
        da.windows().foreground.set(Some(TASKBAR));

        da.perform(HotkeyAction::switch(1)).unwrap();
        assert_eq!(*da.desktops().switches.borrow(), vec![0]);
        assert_eq!(da.desktops().current.get(), 0);
        assert_eq!(da.focus().last_focus(da.desktops().desktop(0).id), Some(W1));
        assert_eq!(da.windows().foreground.get(), Some(W1));
    }

    #[test]
    fn switch_still_happens_when_current_desktop_is_unknown() {
        let mut da = actions();
        da.desktops().fail_current.set(true);
        da.perform(HotkeyAction::switch(3)).unwrap();
        assert_eq!(*da.desktops().switches.borrow(), vec![2]);
        assert!(da.focus().is_empty());
    }

    #[test]
    fn handler_swallows_action_errors() {
        let mut da = actions();
        da.on_action(HotkeyAction::switch(42));
        da.on_action(HotkeyAction::switch(2));
        assert_eq!(da.desktops().current.get(), 1);
    }
}
