use std::time::Duration;

// default config file settings
pub const CONFIG_VERSION: &str = "v1";
pub const CONF_FILE_PATH_ENV_KEY: &str = "BREAKER_CONFIG_FILE_PATH";
pub const CONFIG_FILENAME: &str = "USE_DEFAULT_CONFIGURATION";

// default breaker settings
pub const DEFAULT_MAX_REQUESTS: u32 = 1;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 5;

// default log settings
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const LOG_CONFIG_FILE: &str = "testdata/config/log4rs.yaml";
