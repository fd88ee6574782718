pub const COMPANION_RESOURCE_DIR: &str = "resources";
pub const COMPANION_BASE_NAME: &str = "memordo_ai_backend";
pub const BACKEND_MANIFEST_FILE: &str = "backend-manifest.json";

pub const BACKEND_AUTO_START_ENV: &str = "MEMORDO_BACKEND_AUTO_START";
pub const BACKEND_PATH_ENV: &str = "MEMORDO_BACKEND_PATH";
pub const BACKEND_ARGS_ENV: &str = "MEMORDO_BACKEND_ARGS";
pub const BACKEND_CWD_ENV: &str = "MEMORDO_BACKEND_CWD";
pub const BACKEND_LOG_ENV: &str = "MEMORDO_BACKEND_LOG";
pub const DESKTOP_ROOT_ENV: &str = "MEMORDO_ROOT";

pub const DESKTOP_ROOT_DIR_NAME: &str = ".memordo";
pub const LOGS_DIR_NAME: &str = "logs";
pub const DESKTOP_LOG_FILE: &str = "desktop.log";
pub const BACKEND_LOG_FILE: &str = "backend.log";
pub const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const BACKEND_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
