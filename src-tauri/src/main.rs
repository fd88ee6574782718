#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_runtime;
mod app_types;
mod exit_events;
mod main_window;

pub(crate) use app_types::BackendState;

fn main() {
    app_runtime::run();
}
