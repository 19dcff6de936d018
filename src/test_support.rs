//! record-keeping fakes of the OS seams, shared by the unit tests

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::*;



/// os error code the hotkey table reports for a combo some other owner already holds
pub const HOTKEY_ALREADY_REGISTERED: u32 = 1409;

#[derive(Debug, Default)]
pub struct FakeBackend {
    deny: Vec<ParsedCombination>,
    held: BTreeMap<i32, ParsedCombination>,
    installed: bool,
    install_attempts: usize,
    pub fail_install: bool,
}

impl FakeBackend {
    /// a backend where these combos are already claimed system-wide
    pub fn denying(combos: &[&str]) -> FakeBackend {
        FakeBackend { deny: combos.iter().map(|c| parse_combination(c).unwrap()).collect(), ..Default::default() }
    }

    pub fn held_ids(&self) -> Vec<i32> {
        self.held.keys().copied().collect()
    }

    pub fn install_attempts(&self) -> usize {
        self.install_attempts
    }
}

impl HotkeyBackend for FakeBackend {
    fn register_native(&mut self, id: i32, combo: &ParsedCombination) -> Result<(), RegistrationDenied> {
        assert!(!self.held.contains_key(&id), "hotkey id {} registered twice", id);
        if self.deny.contains(combo) || self.held.values().any(|c| c == combo) {
            return Err(RegistrationDenied { id, combination: combo.to_string(), os_code: HOTKEY_ALREADY_REGISTERED });
        }
        self.held.insert(id, *combo);
        Ok(())
    }

    fn unregister_native(&mut self, id: i32) {
        self.held.remove(&id);
    }

    fn install_monitor(&mut self) -> Result<(), MonitorInstallFailed> {
        self.install_attempts += 1;
        if self.fail_install {
            return Err(MonitorInstallFailed("hook refused".into()));
        }
        self.installed = true;
        Ok(())
    }

    fn uninstall_monitor(&mut self) {
        self.installed = false;
    }

    fn is_monitor_installed(&self) -> bool {
        self.installed
    }
}



pub const OWN_THREAD: ThreadId = 1;
pub const SHELL_THREAD: ThreadId = 2;
pub const SHELL: WindowHandle = WindowHandle(0x10);
pub const TASKBAR: WindowHandle = WindowHandle(0x20);

/// A window system where the shell and taskbar exist (owned by the shell thread) and nothing else until added
#[derive(Debug, Default)]
pub struct FakeWindows {
    pub foreground: Cell<Option<WindowHandle>>,
    pub visible: RefCell<HashSet<WindowHandle>>,
    pub parents: HashMap<WindowHandle, WindowHandle>,
    pub threads: HashMap<WindowHandle, ThreadId>,
    pub gui: HashMap<ThreadId, GuiThreadState>,
    /// (active, focus) as seen through each thread's input queue
    pub queues: HashMap<ThreadId, (Option<WindowHandle>, Option<WindowHandle>)>,
    pub attach_log: RefCell<Vec<(ThreadId, ThreadId, bool)>>,
    pub attached_to: Cell<Option<ThreadId>>,
    pub foreground_requests: RefCell<Vec<WindowHandle>>,
    pub deny_attach: bool,
    pub panic_on_queue_read: bool,
}

impl FakeWindows {
    pub fn new() -> FakeWindows {
        let mut fw = FakeWindows::default();
        fw.add_window(SHELL, SHELL_THREAD);
        fw.add_window(TASKBAR, SHELL_THREAD);
        fw
    }

    pub fn add_window(&mut self, w: WindowHandle, thread: ThreadId) {
        self.visible.borrow_mut().insert(w);
        self.threads.insert(w, thread);
    }

    pub fn add_child(&mut self, child: WindowHandle, root: WindowHandle) {
        self.parents.insert(child, root);
        if let Some(t) = self.threads.get(&root).copied() {
            self.threads.insert(child, t);
        }
        self.visible.borrow_mut().insert(child);
    }

    pub fn hide(&self, w: WindowHandle) {
        self.visible.borrow_mut().remove(&w);
    }

    fn queue(&self) -> (Option<WindowHandle>, Option<WindowHandle>) {
        if self.panic_on_queue_read {
            panic!("queue read failed");
        }
        let thread = self.attached_to.get().unwrap_or(OWN_THREAD);
        self.queues.get(&thread).copied().unwrap_or_default()
    }
}

impl WindowSystem for FakeWindows {
    fn foreground_window(&self) -> Option<WindowHandle> {
        self.foreground.get()
    }
    fn root_ancestor(&self, w: WindowHandle) -> Option<WindowHandle> {
        Some(self.parents.get(&w).copied().unwrap_or(w))
    }
    fn shell_window(&self) -> Option<WindowHandle> {
        Some(SHELL)
    }
    fn taskbar_window(&self) -> Option<WindowHandle> {
        Some(TASKBAR)
    }
    fn is_visible(&self, w: WindowHandle) -> bool {
        self.visible.borrow().contains(&w)
    }
    fn window_thread(&self, w: WindowHandle) -> Option<ThreadId> {
        self.threads.get(&w).copied()
    }
    fn current_thread(&self) -> ThreadId {
        OWN_THREAD
    }
    fn gui_thread_state(&self, thread: ThreadId) -> Option<GuiThreadState> {
        self.gui.get(&thread).copied()
    }
    fn attach_thread_input(&self, from: ThreadId, to: ThreadId, attach: bool) -> bool {
        self.attach_log.borrow_mut().push((from, to, attach));
        if attach {
            if self.deny_attach {
                return false;
            }
            assert_eq!(self.attached_to.get(), None, "already attached");
            self.attached_to.set(Some(to));
        } else {
            assert_eq!(self.attached_to.get(), Some(to), "detaching a thread that isnt attached");
            self.attached_to.set(None);
        }
        true
    }
    fn active_window(&self) -> Option<WindowHandle> {
        self.queue().0
    }
    fn focus_window(&self) -> Option<WindowHandle> {
        self.queue().1
    }
    fn set_foreground(&self, w: WindowHandle) -> bool {
        self.foreground_requests.borrow_mut().push(w);
        self.foreground.set(Some(w));
        true
    }
}



/// A desktop service over `n` desktops, starting on the first one
#[derive(Debug)]
pub struct FakeDesktops {
    pub desktops: Vec<DesktopHandle>,
    pub current: Cell<usize>,
    pub residence: RefCell<HashMap<WindowHandle, DesktopId>>,
    pub switches: RefCell<Vec<usize>>,
    pub fail_moves: Cell<bool>,
    pub fail_current: Cell<bool>,
}

impl FakeDesktops {
    pub fn new(n: usize) -> FakeDesktops {
        FakeDesktops {
            desktops: (0..n).map(|position| DesktopHandle { id: DesktopId(0xD0 + position as u128), position }).collect(),
            current: Cell::new(0),
            residence: RefCell::new(HashMap::new()),
            switches: RefCell::new(Vec::new()),
            fail_moves: Cell::new(false),
            fail_current: Cell::new(false),
        }
    }

    pub fn desktop(&self, position: usize) -> DesktopHandle {
        self.desktops[position]
    }

    pub fn place(&self, w: WindowHandle, position: usize) {
        self.residence.borrow_mut().insert(w, self.desktops[position].id);
    }
}

impl DesktopService for FakeDesktops {
    fn list_desktops(&self) -> Result<Vec<DesktopHandle>, DesktopError> {
        Ok(self.desktops.clone())
    }
    fn current_desktop(&self) -> Result<DesktopHandle, DesktopError> {
        if self.fail_current.get() {
            return Err(DesktopError::Current("service unavailable".into()));
        }
        Ok(self.desktops[self.current.get()])
    }
    fn switch_to(&self, desktop: &DesktopHandle) -> Result<(), DesktopError> {
        self.switches.borrow_mut().push(desktop.position);
        self.current.set(desktop.position);
        Ok(())
    }
    fn move_window_to(&self, window: WindowHandle, desktop: &DesktopHandle) -> Result<(), MoveError> {
        if self.fail_moves.get() {
            return Err(MoveError { window, position: desktop.position, reason: "access denied".into() });
        }
        self.residence.borrow_mut().insert(window, desktop.id);
        Ok(())
    }
    fn is_window_on_desktop(&self, window: WindowHandle, desktop: &DesktopHandle) -> bool {
        self.residence.borrow().get(&window) == Some(&desktop.id)
    }
}
