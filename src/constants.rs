//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Default base URL of the remote data service
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory under the user's home for config files
pub const CONFIG_DIR_NAME: &str = ".finwell";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application name
#[allow(dead_code)]
pub const APP_NAME: &str = "FinWell Client";

/// Application version
#[allow(dead_code)]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
