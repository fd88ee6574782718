use backend_lifecycle::append_shutdown_log;
use tauri::{AppHandle, Manager};

use crate::BackendState;

fn describe_exit_request(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit requested with code {code}"),
        None => "exit requested after the last window closed".to_string(),
    }
}

pub(crate) fn handle_exit_requested(code: Option<i32>) {
    append_shutdown_log(&describe_exit_request(code));
}

/// The run loop is done; the backend goes down with it.
pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let Some(state) = app_handle.try_state::<BackendState>() else {
        append_shutdown_log("backend state is unavailable at exit; nothing to stop");
        return;
    };
    if state.stop_backend().is_none() {
        append_shutdown_log("backend already stopped earlier in shutdown");
    }
}
