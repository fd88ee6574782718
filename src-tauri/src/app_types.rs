use backend_lifecycle::{
    append_shutdown_log, append_startup_log, BackendConfig, RunLoopBinding, StopOutcome,
};

/// Tauri managed state owning the backend child for the lifetime of the app.
#[derive(Debug, Default)]
pub(crate) struct BackendState {
    binding: RunLoopBinding,
}

impl BackendState {
    /// The pid, or the reason the backend did not start, goes to the startup log.
    pub(crate) fn start_backend(&self, config: &BackendConfig) {
        self.binding.on_startup(config, append_startup_log);
    }

    pub(crate) fn stop_backend(&self) -> Option<StopOutcome> {
        self.binding.on_shutdown(append_shutdown_log)
    }
}
