use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    backend_path, runtime_paths, BackendConfig, BackendError, BackendResult,
    BACKEND_LOG_FILE, BACKEND_MANIFEST_FILE,
};

/// Optional `resources/backend-manifest.json` shipped with a packaged build.
#[derive(Debug, Default, Deserialize)]
struct BackendManifest {
    executable: Option<String>,
    #[serde(default)]
    args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutput {
    Inherit,
    LogFile(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub output: BackendOutput,
}

impl LaunchPlan {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            output: BackendOutput::Inherit,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Builds the plan for the companion that sits next to the running executable,
    /// unless `MEMORDO_BACKEND_PATH` points somewhere else.
    pub fn resolve(config: &BackendConfig) -> BackendResult<Self> {
        if let Some(program) = &config.path_override {
            return Ok(Self::from_program(config, program.clone(), Vec::new()));
        }

        let companion_path = backend_path::resolve_companion_path()?;
        Self::from_companion(config, companion_path)
    }

    pub fn from_companion(config: &BackendConfig, companion_path: PathBuf) -> BackendResult<Self> {
        let Some(resources_dir) = companion_path.parent() else {
            return Ok(Self::from_program(config, companion_path, Vec::new()));
        };
        let manifest_path = resources_dir.join(BACKEND_MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Ok(Self::from_program(config, companion_path, Vec::new()));
        }

        let manifest = read_manifest(&manifest_path)?;
        let program = match manifest.executable.as_deref().map(str::trim) {
            Some(executable) if !executable.is_empty() => resources_dir.join(executable),
            _ => companion_path,
        };
        Ok(Self::from_program(config, program, manifest.args))
    }

    fn from_program(config: &BackendConfig, program: PathBuf, mut args: Vec<String>) -> Self {
        args.extend(config.extra_args.iter().cloned());
        let output = if config.capture_output {
            BackendOutput::LogFile(
                runtime_paths::logs_dir(config.root_dir.clone()).join(BACKEND_LOG_FILE),
            )
        } else {
            BackendOutput::Inherit
        };

        Self {
            program,
            args,
            cwd: config.cwd.clone(),
            output,
        }
    }

    pub fn debug_command(&self) -> Vec<String> {
        let mut parts = vec![self.program.to_string_lossy().to_string()];
        parts.extend(self.args.iter().cloned());
        parts
    }
}

fn read_manifest(path: &Path) -> BackendResult<BackendManifest> {
    let raw = fs::read_to_string(path).map_err(|error| {
        BackendError::io(
            format!("Failed to read backend manifest {}", path.display()),
            error,
        )
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        BackendError::Config(format!(
            "Failed to parse backend manifest {}: {}",
            path.display(),
            error
        ))
    })
}
