use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use chrono::{DateTime, Local, SecondsFormat};

use crate::{runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES};

static LOG_WRITE_LOCK: Mutex<()> = Mutex::new(());

pub fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    runtime_paths::logs_dir(root_dir).join(file_name)
}

pub fn append_desktop_log(message: &str) {
    append_categorized_log("desktop", message);
}

pub fn append_startup_log(message: &str) {
    append_categorized_log("startup", message);
}

pub fn append_shutdown_log(message: &str) {
    append_categorized_log("shutdown", message);
}

fn append_categorized_log(category: &str, message: &str) {
    let log_path = resolve_desktop_log_path(
        runtime_paths::default_desktop_root_dir(),
        DESKTOP_LOG_FILE,
    );
    let line = format_log_line(Local::now(), category, message);
    if cfg!(debug_assertions) {
        eprintln!("{line}");
    }
    if let Err(error) = append_log_line(&log_path, &line, DESKTOP_LOG_MAX_BYTES) {
        eprintln!(
            "failed to write desktop log {}: {}",
            log_path.display(),
            error
        );
    }
}

fn format_log_line(timestamp: DateTime<Local>, category: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
        category,
        message
    )
}

pub(crate) fn rotated_log_path(log_path: &Path) -> PathBuf {
    let mut rotated = log_path.as_os_str().to_os_string();
    rotated.push(".1");
    PathBuf::from(rotated)
}

/// Moves a log of `max_bytes` or more aside to `<name>.1`, replacing any
/// previous rotation. Returns whether the file was moved.
pub(crate) fn rotate_if_oversized(log_path: &Path, max_bytes: u64) -> io::Result<bool> {
    match fs::metadata(log_path) {
        Ok(metadata) if metadata.len() >= max_bytes => {
            fs::rename(log_path, rotated_log_path(log_path))?;
            Ok(true)
        }
        Ok(_) => Ok(false),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(error),
    }
}

/// Appends `line` to `log_path`, rotating it first when oversized.
fn append_log_line(log_path: &Path, line: &str, max_bytes: u64) -> io::Result<()> {
    let _guard = LOG_WRITE_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    rotate_if_oversized(log_path, max_bytes)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    writeln!(file, "{line}")
}
