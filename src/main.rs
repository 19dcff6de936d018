#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::error;

use vdesk_hotkeys::app::Cli;


fn main () -> ExitCode {

    let cli = Cli::parse();

    env_logger::Builder::from_env (Env::default().default_filter_or (cli.default_log_filter())) .init();

    run (cli)
}


#[cfg(windows)]
fn run (cli:Cli) -> ExitCode {
    match vdesk_hotkeys::app::runner::run (cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => { error! ("{}", e); ExitCode::FAILURE }
    }
}

#[cfg(not(windows))]
fn run (_cli:Cli) -> ExitCode {
    error! ("vdesk-hotkeys drives windows virtual desktops, and only runs on windows");
    ExitCode::FAILURE
}
