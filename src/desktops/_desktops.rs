use std::fmt;



/// Opaque top-level window handle (the raw HWND value on windows)
# [ derive (Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Copy, Clone) ]
pub struct WindowHandle (pub isize);

impl fmt::Display for WindowHandle {
    fn fmt (&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write! (f, "{:#x}", self.0) }
}

/// OS thread id, as used for thread-input attachment and gui-thread queries
pub type ThreadId = u32;


/// The desktop service's stable identifier for a virtual desktop, independent of its position in the list
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub struct DesktopId (pub u128);

/// A virtual desktop as listed by the desktop service .. position is its 0-based place in the current ordering
# [ derive (Debug, Eq, PartialEq, Hash, Copy, Clone) ]
pub struct DesktopHandle {
    pub id       : DesktopId,
    pub position : usize,
}



/// The external virtual-desktop service (enumeration, switching, moving windows across desktops)
pub trait DesktopService {
    fn list_desktops   (&self) -> Result <Vec<DesktopHandle>, DesktopError>;
    fn current_desktop (&self) -> Result <DesktopHandle, DesktopError>;
    fn switch_to       (&self, desktop:&DesktopHandle) -> Result <(), DesktopError>;
    fn move_window_to  (&self, window:WindowHandle, desktop:&DesktopHandle) -> Result <(), MoveError>;
    fn is_window_on_desktop (&self, window:WindowHandle, desktop:&DesktopHandle) -> bool;
}



/// Snapshot of a thread's gui state (the windows it considers active/focused/capturing/showing the caret)
# [ derive (Debug, Default, Eq, PartialEq, Copy, Clone) ]
pub struct GuiThreadState {
    pub active  : Option<WindowHandle>,
    pub focus   : Option<WindowHandle>,
    pub capture : Option<WindowHandle>,
    pub caret   : Option<WindowHandle>,
}

/// The OS window/thread introspection that window resolution and focus restoration need. <br>
/// Note that [`active_window`](WindowSystem::active_window) and [`focus_window`](WindowSystem::focus_window) report on
/// the calling thread's input queue, which only reflects another thread's state while attached to it.
pub trait WindowSystem {
    fn foreground_window (&self) -> Option<WindowHandle>;
    fn root_ancestor     (&self, w:WindowHandle) -> Option<WindowHandle>;
    fn shell_window      (&self) -> Option<WindowHandle>;
    fn taskbar_window    (&self) -> Option<WindowHandle>;
    fn is_visible        (&self, w:WindowHandle) -> bool;

    fn window_thread     (&self, w:WindowHandle) -> Option<ThreadId>;
    fn current_thread    (&self) -> ThreadId;
    fn gui_thread_state  (&self, thread:ThreadId) -> Option<GuiThreadState>;

    /// attaches (or detaches) the input queue of `from` to that of `to`, returning whether the OS accepted it
    fn attach_thread_input (&self, from:ThreadId, to:ThreadId, attach:bool) -> bool;
    fn active_window     (&self) -> Option<WindowHandle>;
    fn focus_window      (&self) -> Option<WindowHandle>;

    fn set_foreground    (&self, w:WindowHandle) -> bool;
}



# [ derive (Debug, Eq, PartialEq, Clone, thiserror::Error) ]
pub enum DesktopError {
    #[error ("could not list virtual desktops: {0}")]
    List (String),
    #[error ("could not query the current virtual desktop: {0}")]
    Current (String),
    #[error ("could not switch to desktop #{position}: {reason}")]
    Switch { position: usize, reason: String },
}

# [ derive (Debug, Eq, PartialEq, Clone, thiserror::Error) ]
#[error ("could not move window {window} to desktop #{position}: {reason}")]
pub struct MoveError {
    pub window   : WindowHandle,
    pub position : usize,
    pub reason   : String,
}
