use std::{
    fs::{self, OpenOptions},
    io,
    process::{Child, Command, Stdio},
};

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use crate::{
    logging, BackendError, BackendOutput, BackendResult, LaunchPlan, BACKEND_LOG_MAX_BYTES,
};

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Spawns the plan's program without a console window. Stdin is always null.
pub(crate) fn spawn_headless(plan: &LaunchPlan) -> BackendResult<Child> {
    let mut command = Command::new(&plan.program);
    command.args(&plan.args).stdin(Stdio::null());
    if let Some(cwd) = &plan.cwd {
        command.current_dir(cwd);
    }

    if let BackendOutput::LogFile(log_path) = &plan.output {
        if let Some(log_parent) = log_path.parent() {
            fs::create_dir_all(log_parent).map_err(|error| {
                BackendError::io(
                    format!(
                        "Failed to create backend log directory {}",
                        log_parent.display()
                    ),
                    error,
                )
            })?;
        }
        logging::rotate_if_oversized(log_path, BACKEND_LOG_MAX_BYTES).map_err(|error| {
            BackendError::io(
                format!("Failed to rotate backend log {}", log_path.display()),
                error,
            )
        })?;
        let stdout_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .map_err(|error| {
                BackendError::io(
                    format!("Failed to open backend log {}", log_path.display()),
                    error,
                )
            })?;
        let stderr_file = stdout_file
            .try_clone()
            .map_err(|error| BackendError::io("Failed to clone backend log handle", error))?;
        command.stdout(Stdio::from(stdout_file));
        command.stderr(Stdio::from(stderr_file));
    }

    #[cfg(target_os = "windows")]
    command.creation_flags(CREATE_NO_WINDOW);

    command
        .spawn()
        .map_err(|source| BackendError::ProcessCreation {
            program: plan.program.clone(),
            source,
        })
}

/// Force-terminates `child` without waiting for it to exit.
///
/// On Windows the whole tree goes, since a bundled backend may have spawned
/// its own worker process. `TerminateProcess` is the fallback when
/// `taskkill` is unavailable or fails.
pub(crate) fn terminate_child(child: &mut Child) -> io::Result<()> {
    #[cfg(target_os = "windows")]
    {
        let tree_killed = Command::new("taskkill")
            .args(["/pid", &child.id().to_string(), "/t", "/f"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .creation_flags(CREATE_NO_WINDOW)
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if tree_killed {
            return Ok(());
        }
        child.kill()
    }

    #[cfg(not(target_os = "windows"))]
    {
        child.kill()
    }
}
