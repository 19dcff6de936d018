use std::cell::RefCell;
use std::io;
use std::mem::size_of;
use std::os::raw::c_int;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::sync_channel;
use std::thread::{self, JoinHandle};

use derive_deref::Deref;
use once_cell::sync::OnceCell;
use log::{debug, error, info, warn};

use windows::Win32::Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    RegisterHotKey, SendInput, UnregisterHotKey, HOT_KEY_MODIFIERS, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
    KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::*;

use crate::{*, EventPropagationDirective::*};



pub const MSG_LOOP_KILL_MSG   : u32 = WM_USER + 1;
pub const MSG_LOOP_RELOAD_MSG : u32 = WM_USER + 2;

/// tags the kbd events we inject ourselves, so the hook can recognize and skip them
pub const OWN_INJECTION_EXTRA_INFO : usize = 0x5644_4B48;


/// What the input thread should register on its next reload
# [ derive (Debug, Clone) ]
pub struct ReloadRequest {
    pub bindings  : Vec <HotkeyBinding>,
    pub hard_mode : bool,
}



/// Both tiers over win32 : thread-queue hotkeys (null hwnd, so WM_HOTKEY lands in the registering thread's queue),
/// and a WH_KEYBOARD_LL hook. Must only be used from the input-processing thread, since both are thread-affine.
# [ derive (Debug, Default) ]
pub struct Win32HotkeyBackend {
    kbd_hook : HHOOK,
}

impl HotkeyBackend for Win32HotkeyBackend {

    fn register_native (&mut self, id:i32, combo:&ParsedCombination) -> Result<(), RegistrationDenied> { unsafe {
        if RegisterHotKey (HWND(0), id, HOT_KEY_MODIFIERS (combo.native_modifiers()), combo.key.code()) .as_bool() {
            return Ok(())
        }
        Err ( RegistrationDenied { id, combination: combo.to_string(), os_code: GetLastError().0 } )
    } }

    fn unregister_native (&mut self, id:i32) { unsafe {
        if !UnregisterHotKey (HWND(0), id) .as_bool() {
            debug! ("unregistering hotkey id {} failed .. error code : {:?}", id, GetLastError());
        }
    } }

    fn install_monitor (&mut self) -> Result<(), MonitorInstallFailed> { unsafe {
        let hh = SetWindowsHookExW (WH_KEYBOARD_LL, Some(kbd_proc), HINSTANCE(0), 0)
            .map_err (|e| MonitorInstallFailed (e.to_string()))?;
        self.kbd_hook = hh;
        info! ("low-level kbd monitor installed");
        Ok(())
    } }

    fn uninstall_monitor (&mut self) { unsafe {
        if self.kbd_hook == HHOOK::default() { return }
        if UnhookWindowsHookEx (self.kbd_hook) .as_bool() {
            info! ("low-level kbd monitor removed");
        } else {
            warn! ("unhooking kbd monitor failed .. error code : {:?}", GetLastError());
        }
        self.kbd_hook = HHOOK::default();
    } }

    fn is_monitor_installed (&self) -> bool { self.kbd_hook != HHOOK::default() }

}



/// What the kbd hook proc routes events to .. the hook proc gets no user data, so this lives in a thread-local slot
/// on the input thread (which is the thread the OS calls the hook on)
struct HookTarget {
    monitor    : KeyMonitor,
    dispatcher : Dispatcher,
}

impl HookTarget {
    fn on_key_event (&self, ev:&KbdEvent) -> EventPropagationDirective {
        if !ev.ev_t.is_down() {
            return self.monitor.on_key_event (ev, ModSet::empty()) .event_prop_d
        }
        let decision = self.monitor.on_key_event (ev, utils::win_get_live_mod_set());
        if let Some(action) = decision.fire { self.dispatcher.dispatch (action); }
        if decision.mask_release { send_mask_tap() }
        decision.event_prop_d
    }
}

thread_local! {
    static HOOK_TARGET : RefCell <Option <HookTarget>> = RefCell::new (None);
}



pub struct _InputProcessor {
    iproc_thread : AtomicU32,
    // latest reload request not yet picked up by the input thread .. superseded requests are simply replaced
    pending      : Mutex <Option <ReloadRequest>>,
}

/// Handle to the input-processing thread, which owns the hotkey registry (and so every native hotkey and the kbd
/// hook) and runs the message loop both tiers are delivered through. Cheap to clone.
# [ derive (Clone, Deref) ]
pub struct InputProcessor ( Arc <_InputProcessor> );

impl InputProcessor {

    /// Creates or returns the singleton InputProcessor (the kbd hook and thread-queue hotkeys are per process anyway)
    pub fn instance () -> InputProcessor {
        static INSTANCE: OnceCell <InputProcessor> = OnceCell::new();
        INSTANCE .get_or_init ( || {
            InputProcessor ( Arc::new ( _InputProcessor {
                iproc_thread : AtomicU32::default(),
                pending      : Mutex::new (None),
            } ) )
        } ) .clone()
    }

    /// Starts the input thread with an initial set of bindings, returning once it is ready to take messages.
    /// Matched actions from both tiers go out through the dispatcher, which the thread drops when it terminates.
    pub fn begin_input_processing (&self, dispatcher:Dispatcher, initial:ReloadRequest) -> io::Result<JoinHandle<()>> {

        let iproc = self.clone();
        let (ready_tx, ready_rx) = sync_channel::<()> (1);

        let handle = thread::Builder::new() .name ("input-proc".into()) .spawn ( move || unsafe {

            // peeking forces creation of this thread's msg queue, so posts made right after we signal ready arent lost
            let mut msg: MSG = MSG::default();
            PeekMessageW (&mut msg, HWND(0), WM_USER, WM_USER, PM_NOREMOVE);
            iproc.iproc_thread.store (GetCurrentThreadId(), Ordering::SeqCst);
            let _ = ready_tx.send(());

            let monitor = KeyMonitor::new();
            HOOK_TARGET.with (|t| *t.borrow_mut() = Some ( HookTarget { monitor: monitor.clone(), dispatcher: dispatcher.clone() } ));

            let mut registry = HotkeyRegistry::new (Win32HotkeyBackend::default(), monitor);
            registry.reload (&initial.bindings, initial.hard_mode);

            // win32 delivers both WM_HOTKEY and the LL hook callbacks to this thread while it waits in GetMessage
            while GetMessageW (&mut msg, HWND(0), 0, 0) .0 > 0 {
                match msg.message {
                    WM_HOTKEY => {
                        let id = msg.wParam.0 as i32;
                        let fired = catch_unwind (AssertUnwindSafe (|| {
                            registry.action_for_id(id) .map (|action| dispatcher.dispatch(action))
                        }));
                        if fired.is_err() { error! ("panic while handling hotkey id {}", id) }
                    }
                    MSG_LOOP_RELOAD_MSG => {
                        if let Some(req) = iproc.take_pending() {
                            registry.reload (&req.bindings, req.hard_mode);
                        }
                    }
                    MSG_LOOP_KILL_MSG => {
                        info! ("received kill-msg in input-processing thread .. terminating thread ..");
                        break
                    }
                    _ => { }
                }
            }

            registry.clear();
            HOOK_TARGET.with (|t| t.borrow_mut().take());
            iproc.iproc_thread.store (0, Ordering::SeqCst);
        } )?;

        // if the thread died before signalling, the send side is dropped and we just move on
        let _ = ready_rx.recv();
        Ok(handle)
    }

    fn take_pending (&self) -> Option<ReloadRequest> {
        self.pending.lock() .unwrap_or_else (PoisonError::into_inner) .take()
    }

    fn post_to_thread (&self, msg:u32) -> bool { unsafe {
        let tid = self.iproc_thread.load (Ordering::SeqCst);
        tid != 0 && PostThreadMessageW (tid, msg, WPARAM::default(), LPARAM::default()) .as_bool()
    } }

    /// Hands new bindings to the input thread, which re-registers everything once it gets to the request
    pub fn request_reload (&self, req:ReloadRequest) -> bool {
        *self.pending.lock() .unwrap_or_else (PoisonError::into_inner) = Some(req);
        let posted = self.post_to_thread (MSG_LOOP_RELOAD_MSG);
        if !posted { warn! ("input thread isnt running, reload request not delivered") }
        posted
    }

    /// Signals the input thread to release all registrations and terminate
    pub fn stop_input_processing (&self) -> bool {
        self.post_to_thread (MSG_LOOP_KILL_MSG)
    }

}




/// Keyboard lower-level-hook processor
pub unsafe extern "system"
fn kbd_proc (code: c_int, w_param: WPARAM, l_param: LPARAM) -> LRESULT {

    let return_call = || { CallNextHookEx (HHOOK(0), code, w_param, l_param) };

    if code < 0 { return return_call() }      // ms-docs says we MUST do this

    let kb_struct = *(l_param.0 as *const KBDLLHOOKSTRUCT);

    // if we injected this event ourselves, we should just bail
    if kb_struct.dwExtraInfo == OWN_INJECTION_EXTRA_INFO { return return_call() }

    use KbdEvent_T::*;
    let Some(ev_t) = (match w_param.0 as u32 {
        WM_KEYDOWN      => Some (KbdEvent_KeyDown),
        WM_SYSKEYDOWN   => Some (KbdEvent_SysKeyDown),
        WM_KEYUP        => Some (KbdEvent_KeyUp),
        WM_SYSKEYUP     => Some (KbdEvent_SysKeyUp),
        _               => None,
    }) else { return return_call() };

    let injected = kb_struct.flags & LLKHF_INJECTED == LLKHF_INJECTED;
    let event = KbdEvent { ev_t, key: VKey::from (kb_struct.vkCode), injected };

    // nothing may unwind out of here .. the OS would drop our hook
    let directive = catch_unwind ( || HOOK_TARGET.with (|t| t.borrow().as_ref().map (|t| t.on_key_event(&event))) );

    match directive {
        Ok(Some(EventProp_Stop)) => LRESULT(1),
        Ok(_) => return_call(),
        Err(_) => {
            error! ("panic in kbd hook while processing {:?}", event);
            return_call()
        }
    }
}



/// Taps the (unassigned) mask vk, so a win/alt that is released after a swallowed combo doesnt read as a lone tap
fn send_mask_tap () {
    let key_input = |flags:KEYBD_EVENT_FLAGS| INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY (VKey::MASK.0),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: OWN_INJECTION_EXTRA_INFO,
        } }
    };
    let mut inputs = [ key_input (KEYBD_EVENT_FLAGS(0)), key_input (KEYEVENTF_KEYUP) ];
    unsafe { SendInput (&mut inputs, size_of::<INPUT>() as c_int) };
}
