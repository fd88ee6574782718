use backend_lifecycle::{
    append_desktop_log, append_startup_log, logging, runtime_paths, BackendConfig,
    DESKTOP_LOG_FILE,
};
use tauri::{Manager, RunEvent};

use crate::{exit_events, main_window, BackendState};

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        logging::resolve_desktop_log_path(
            runtime_paths::default_desktop_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    let backend_config = match BackendConfig::from_env() {
        Ok(config) => Some(config),
        Err(error) => {
            append_startup_log(&format!("backend launch skipped: {error}"));
            None
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, argv, cwd| {
            append_desktop_log(&format!(
                "second instance launch redirected to running window (args: {argv:?}, cwd: {cwd})"
            ));
            main_window::show_main_window(app_handle, append_desktop_log);
        }))
        .manage(BackendState::default())
        .setup(move |app| {
            // Runs before the event loop dispatches anything to the UI.
            if let Some(config) = &backend_config {
                app.state::<BackendState>().start_backend(config);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, .. } => {
                exit_events::handle_exit_requested(code);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
