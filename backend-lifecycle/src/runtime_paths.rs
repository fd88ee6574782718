use std::{env, path::PathBuf};

use crate::{DESKTOP_ROOT_DIR_NAME, DESKTOP_ROOT_ENV, LOGS_DIR_NAME};

pub fn default_desktop_root_dir() -> Option<PathBuf> {
    desktop_root_dir_from(env::var(DESKTOP_ROOT_ENV).ok())
}

pub(crate) fn desktop_root_dir_from(root_override: Option<String>) -> Option<PathBuf> {
    if let Some(root) = root_override {
        let path = PathBuf::from(root.trim());
        if !path.as_os_str().is_empty() {
            return Some(path);
        }
    }

    home::home_dir().map(|home| home.join(DESKTOP_ROOT_DIR_NAME))
}

/// Log directory under the desktop root, or a per-user temp directory when
/// no home directory is known.
pub fn logs_dir(root_dir: Option<PathBuf>) -> PathBuf {
    match root_dir {
        Some(root) => root.join(LOGS_DIR_NAME),
        None => env::temp_dir().join("memordo").join(LOGS_DIR_NAME),
    }
}
