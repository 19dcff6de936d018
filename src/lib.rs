// same organization as our other input-hooking crates ..
//.. we keep the main module file inside the module dir, so modules are declared here as mostly empty wrappers
//.. that re-export the shadowed _module_name file inside the module folders (along with other re-exports we want)

// in general, we re-export everything from the shadowed module file, and wholesale from the other sub-modules too
//.. (so that a 'use crate::*' brings in all our high-level constructs, w explicit paths where names would collide)

// anything that talks to win32 directly is cfg(windows) gated .. the engine itself (parsing, registration tiers,
//.. matching, dispatch, window resolution and focus tracking) only sees the OS through traits, so it builds/tests anywhere



/// inputs .. virtual-keys, modifier keys/sets, kbd events, and (on windows) the input-processing thread w its kbd hook
pub mod inputs {
    // sub-modules in module directory
    pub mod kbd;
    #[cfg(windows)]
    pub mod input_proc;

    // and our (selective or wholesale) sub-module re-exports
    pub use self::kbd::*;
    #[cfg(windows)]
    pub use self::input_proc::*;
}


/// hotkeys .. combo parsing, the two-tier (native/monitored) registration strategy, and dispatch of fired actions
pub mod hotkeys {
    // shadowed module file that we'll re-export from here
    mod _hotkeys;
    pub use self::_hotkeys::*;

    // other sub-modules in module directory
    pub mod combo_parse;
    pub mod key_monitor;
    pub mod registry;
    pub mod dispatch;

    pub use self::combo_parse::*;
    pub use self::key_monitor::*;
    pub use self::registry::*;
    pub use self::dispatch::*;
}


/// desktops .. the virtual-desktop service seam, active-window resolution, per-desktop focus, and the switch/move actions
pub mod desktops {
    mod _desktops;
    pub use self::_desktops::*;

    pub mod window_resolver;
    pub mod focus_tracker;
    pub mod desktop_actions;

    pub use self::window_resolver::*;
    pub use self::focus_tracker::*;
    pub use self::desktop_actions::*;
}


/// app .. config file model/loading, cmd-line, and (on windows) the tray and the wiring of our threads
pub mod app {
    pub mod config;
    pub mod cli;
    #[cfg(windows)]
    pub mod system_tray;
    #[cfg(windows)]
    pub mod runner;

    pub use self::config::*;
    pub use self::cli::*;
}


/// bunch of win32 helpers .. window introspection, the virtual-desktop adapter, single-instance guard, process launching
#[cfg(windows)]
pub mod utils {
    pub mod windows_utils;
    pub mod win_desktops;
    pub mod single_instance;
    pub mod process_utils;

    pub use self::windows_utils::*;
    pub use self::win_desktops::*;
    pub use self::single_instance::*;
    pub use self::process_utils::*;
}


#[cfg(test)]
pub(crate) mod test_support;


// and finally our crate level re-exports
pub use crate::inputs::*;
pub use crate::hotkeys::*;
pub use crate::desktops::*;
//pub use crate::utils::*;
// ^^ lets not do the internals of utils .. we can just use 'utils::' when needed
