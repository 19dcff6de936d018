use std::mem;

use windows::{
    w,
    core::PCWSTR,
    Win32::Foundation::HWND,
    Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId},
    Win32::UI::Input::KeyboardAndMouse::{GetActiveWindow, GetAsyncKeyState, GetFocus},
    Win32::UI::WindowsAndMessaging::{
        FindWindowW, GetAncestor, GetForegroundWindow, GetGUIThreadInfo, GetShellWindow,
        GetWindowThreadProcessId, IsWindowVisible, SetForegroundWindow, GA_ROOT, GUITHREADINFO,
    },
};

use crate::*;



fn hwnd_opt (hwnd:HWND) -> Option<WindowHandle> {
    if hwnd.0 == 0 { None } else { Some ( WindowHandle (hwnd.0) ) }
}

fn hwnd (w:WindowHandle) -> HWND { HWND (w.0) }


/// Live state of the modifier keys, straight from the async key state (what the kbd hook needs at event time)
pub fn win_get_live_mod_set () -> ModSet {
    ModSet::from_pressed ( |vk| unsafe { (GetAsyncKeyState (vk.0 as i32) as u16 & 0x8000) != 0 } )
}



/// The real thing .. window/thread introspection over user32
# [ derive (Debug, Default, Copy, Clone) ]
pub struct Win32Windows;

impl WindowSystem for Win32Windows {

    fn foreground_window (&self) -> Option<WindowHandle> { unsafe { hwnd_opt (GetForegroundWindow()) } }

    fn root_ancestor (&self, w:WindowHandle) -> Option<WindowHandle> { unsafe {
        hwnd_opt (GetAncestor (hwnd(w), GA_ROOT))
    } }

    fn shell_window (&self) -> Option<WindowHandle> { unsafe { hwnd_opt (GetShellWindow()) } }

    fn taskbar_window (&self) -> Option<WindowHandle> { unsafe {
        hwnd_opt (FindWindowW (w!("Shell_TrayWnd"), PCWSTR::null()))
    } }

    fn is_visible (&self, w:WindowHandle) -> bool { unsafe { IsWindowVisible (hwnd(w)) .as_bool() } }

    fn window_thread (&self, w:WindowHandle) -> Option<ThreadId> { unsafe {
        let tid = GetWindowThreadProcessId (hwnd(w), None);
        if tid == 0 { None } else { Some(tid) }
    } }

    fn current_thread (&self) -> ThreadId { unsafe { GetCurrentThreadId() } }

    fn gui_thread_state (&self, thread:ThreadId) -> Option<GuiThreadState> { unsafe {
        let mut info = GUITHREADINFO { cbSize: mem::size_of::<GUITHREADINFO>() as u32, ..Default::default() };
        if !GetGUIThreadInfo (thread, &mut info) .as_bool() { return None }
        Some ( GuiThreadState {
            active  : hwnd_opt (info.hwndActive),
            focus   : hwnd_opt (info.hwndFocus),
            capture : hwnd_opt (info.hwndCapture),
            caret   : hwnd_opt (info.hwndCaret),
        } )
    } }

    fn attach_thread_input (&self, from:ThreadId, to:ThreadId, attach:bool) -> bool { unsafe {
        AttachThreadInput (from, to, attach) .as_bool()
    } }

    fn active_window (&self) -> Option<WindowHandle> { unsafe { hwnd_opt (GetActiveWindow()) } }

    fn focus_window  (&self) -> Option<WindowHandle> { unsafe { hwnd_opt (GetFocus()) } }

    fn set_foreground (&self, w:WindowHandle) -> bool { unsafe { SetForegroundWindow (hwnd(w)) .as_bool() } }

}
