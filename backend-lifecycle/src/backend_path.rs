use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{BackendError, BackendResult, COMPANION_BASE_NAME, COMPANION_RESOURCE_DIR};

/// File name of the companion backend for the platform this shell was built for.
pub fn companion_file_name() -> String {
    format!("{COMPANION_BASE_NAME}{}", env::consts::EXE_SUFFIX)
}

/// Replaces the last segment of `exe_path` with `resources/<companion_file_name>`.
///
/// Both `\` and `/` count as separators, and the separator that was found is
/// reused for the appended segments so a Windows path stays a Windows path.
pub fn companion_path_for_exe(exe_path: &str, companion_file_name: &str) -> BackendResult<PathBuf> {
    if exe_path.is_empty() {
        return Err(BackendError::PathResolution(
            "current executable path is empty".to_string(),
        ));
    }

    let Some(separator_index) = exe_path.rfind(['\\', '/']) else {
        return Err(BackendError::PathResolution(format!(
            "current executable path has no directory component: {exe_path}"
        )));
    };
    let separator = &exe_path[separator_index..separator_index + 1];
    let exe_dir = &exe_path[..separator_index];

    Ok(PathBuf::from(format!(
        "{exe_dir}{separator}{COMPANION_RESOURCE_DIR}{separator}{companion_file_name}"
    )))
}

pub fn resolve_companion_path() -> BackendResult<PathBuf> {
    let exe_path = env::current_exe().map_err(|error| {
        BackendError::PathResolution(format!("cannot determine current executable: {error}"))
    })?;

    companion_path_for_exe_path(&exe_path, &companion_file_name())
}

/// [`companion_path_for_exe`] for an OS path. Paths that are not valid
/// UTF-8 are split with [`Path::parent`] instead of by separator.
pub fn companion_path_for_exe_path(
    exe_path: &Path,
    companion_file_name: &str,
) -> BackendResult<PathBuf> {
    if let Some(exe_path) = exe_path.to_str() {
        return companion_path_for_exe(exe_path, companion_file_name);
    }

    match exe_path.parent() {
        Some(exe_dir) if !exe_dir.as_os_str().is_empty() => Ok(exe_dir
            .join(COMPANION_RESOURCE_DIR)
            .join(companion_file_name)),
        _ => Err(BackendError::PathResolution(format!(
            "current executable path has no directory component: {}",
            exe_path.display()
        ))),
    }
}
