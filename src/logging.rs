use cfg_if::cfg_if;
pub use log::{debug, error, info, trace, warn};
use std::sync::Once;

// a process installs at most one global logger
static LOGGER_INIT: Once = Once::new();

/// `logger_init` installs the logger of the enabled logging feature, later calls are no-ops.
/// `file_name` is the configuration file of log4rs, other loggers ignore it.
pub fn logger_init(file_name: Option<String>) -> crate::Result<()> {
    let mut res = Ok(());
    LOGGER_INIT.call_once(|| res = init_backend(file_name));
    res
}

cfg_if! {
    if #[cfg(feature = "logger_env")] {
        use crate::config::DEFAULT_LOG_LEVEL;
        fn init_backend(_: Option<String>) -> crate::Result<()> {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL))
                .try_init()?;
            Ok(())
        }
    }
    else if #[cfg(feature = "logger_log4rs")] {
        use crate::Error;
        use std::path::Path;
        fn init_backend(file_name: Option<String>) -> crate::Result<()> {
            let file_name = file_name
                .ok_or_else(|| Error::msg("Must provide a configuration file for log4rs crate"))?;
            let path = Path::new(&file_name);
            if !path.exists() {
                return Err(Error::msg(format!("log4rs configuration file does not exist: {}", file_name)));
            }
            log4rs::init_file(path, Default::default())?;
            Ok(())
        }
    } else {
        fn init_backend(_: Option<String>) -> crate::Result<()> {
            Ok(())
        }
    }
}
