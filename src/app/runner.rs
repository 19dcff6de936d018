use std::io;
use std::path::PathBuf;
use std::thread::JoinHandle;

use log::{error, info, warn};

use crate::*;
use crate::app::{Cli, Config, ensure_config_file, system_tray};
use crate::utils::{SingleInstance, SINGLE_INSTANCE_MUTEX_NAME, WinVdDesktops, Win32Windows, open_with_shell};


type WinDesktopActions = DesktopActions <WinVdDesktops, Win32Windows>;


# [ derive (Debug, thiserror::Error) ]
pub enum AppError {
    #[error ("could not create the single-instance mutex: {0}")]
    SingleInstance (windows::core::Error),
    #[error ("could not start a worker thread: {0}")]
    Thread (#[from] io::Error),
    #[error ("tray icon error: {0}")]
    Tray (String),
}



/// The running app as the tray sees it : where the config lives, and the threads doing the work
pub struct AppShell {
    config_path     : PathBuf,
    force_hard_mode : bool,
    iproc           : InputProcessor,
    input_thread    : Option <JoinHandle<()>>,
    dispatch_thread : Option <JoinHandle<WinDesktopActions>>,
}

impl AppShell {

    fn load_request (&self) -> ReloadRequest {
        let cfg = Config::load (&self.config_path);
        ReloadRequest { bindings: cfg.bindings(), hard_mode: cfg.hard_mode || self.force_hard_mode }
    }

    pub fn reload_config (&self) {
        self.iproc.request_reload (self.load_request());
    }

    pub fn open_config (&self) {
        if let Err(e) = ensure_config_file (&self.config_path) { warn! ("{}", e) }
        if let Err(e) = open_with_shell (&self.config_path) {
            warn! ("could not open {}: {}", self.config_path.display(), e);
        }
    }

    /// Tears down the input thread (releasing all hotkeys and the kbd hook), which in turn lets the dispatch thread
    /// drain and finish
    pub fn shutdown (&mut self) {
        self.iproc.stop_input_processing();
        if let Some(h) = self.input_thread.take() {
            if h.join().is_err() { error! ("input-processing thread panicked") }
        }
        if let Some(h) = self.dispatch_thread.take() {
            if h.join().is_err() { error! ("action dispatch thread panicked") }
        }
    }

}



/// Brings the whole app up : single-instance check, the dispatch and input threads, and the tray on this thread
pub fn run (cli:Cli) -> Result<(), AppError> {

    let Some(_instance) = SingleInstance::acquire (SINGLE_INSTANCE_MUTEX_NAME) .map_err (AppError::SingleInstance)? else {
        info! ("another instance is already running .. exiting");
        return Ok(())
    };

    let config_path = cli.config_path();
    if let Err(e) = ensure_config_file (&config_path) { warn! ("{}", e) }

    let (dispatcher, queue) = Dispatcher::channel (ACTION_QUEUE_CAPACITY);
    let dispatch_thread = queue.spawn ( DesktopActions::new (WinVdDesktops, Win32Windows) )?;

    let mut app = AppShell {
        config_path, force_hard_mode: cli.hard_mode,
        iproc: InputProcessor::instance(), input_thread: None, dispatch_thread: Some(dispatch_thread),
    };
    let initial = app.load_request();
    app.input_thread = Some ( app.iproc.begin_input_processing (dispatcher, initial)? );

    system_tray::start_system_tray_monitor (app)
}
