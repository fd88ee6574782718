use std::{env, path::PathBuf};

use crate::{
    runtime_paths, BackendError, BackendResult, BACKEND_ARGS_ENV, BACKEND_AUTO_START_ENV,
    BACKEND_CWD_ENV, BACKEND_LOG_ENV, BACKEND_PATH_ENV, DESKTOP_ROOT_ENV,
};

/// Backend launch settings read from `MEMORDO_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub auto_start: bool,
    pub path_override: Option<PathBuf>,
    pub extra_args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub capture_output: bool,
    pub root_dir: Option<PathBuf>,
}

impl BackendConfig {
    pub fn from_env() -> BackendResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> BackendResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auto_start = parse_flag(BACKEND_AUTO_START_ENV, lookup(BACKEND_AUTO_START_ENV))?
            .unwrap_or(true);
        let capture_output =
            parse_flag(BACKEND_LOG_ENV, lookup(BACKEND_LOG_ENV))?.unwrap_or(false);

        let extra_args = match non_empty(lookup(BACKEND_ARGS_ENV)) {
            Some(raw) => shlex::split(&raw).ok_or_else(|| {
                BackendError::Config(format!("{BACKEND_ARGS_ENV} has invalid quoting: {raw}"))
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            auto_start,
            path_override: non_empty(lookup(BACKEND_PATH_ENV)).map(PathBuf::from),
            extra_args,
            cwd: non_empty(lookup(BACKEND_CWD_ENV)).map(PathBuf::from),
            capture_output,
            root_dir: runtime_paths::desktop_root_dir_from(lookup(DESKTOP_ROOT_ENV)),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(key: &str, value: Option<String>) -> BackendResult<Option<bool>> {
    let Some(value) = non_empty(value) else {
        return Ok(None);
    };

    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(BackendError::Config(format!(
            "{key} must be a boolean flag, got '{value}'"
        ))),
    }
}
