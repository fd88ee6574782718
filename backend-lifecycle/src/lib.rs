//! Lifecycle management for the Memordo AI backend.
//!
//! The desktop shell launches `memordo_ai_backend` from its `resources`
//! directory before the UI run loop starts and force-terminates it once the
//! run loop exits. [`BackendBinder`] owns the child handle, and
//! [`RunLoopBinding`] ties it to the host application's startup and shutdown
//! events.

mod app_constants;
mod backend_binder;
mod backend_config;
mod backend_error;
mod backend_path;
mod launch_plan;
pub mod logging;
mod process_control;
mod run_loop_binding;
pub mod runtime_paths;

pub use app_constants::*;
pub use backend_binder::{BackendBinder, BinderState, StopOutcome};
pub use backend_config::BackendConfig;
pub use backend_error::{BackendError, BackendResult};
pub use backend_path::{
    companion_file_name, companion_path_for_exe, companion_path_for_exe_path,
    resolve_companion_path,
};
pub use launch_plan::{BackendOutput, LaunchPlan};
pub use logging::{append_desktop_log, append_shutdown_log, append_startup_log};
pub use run_loop_binding::{run_bound, RunLoopBinding};
