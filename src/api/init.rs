//! Initialization funcs prepare the runtime environment of the breakers, including:
//! 1. override global config, from manually config or yaml file or env variable
//! 2. initialize global logger, if a logger feature is enabled
//! 3. build the configured breakers in the default manager

use crate::circuitbreaker::default_manager;
use crate::config::{self, ConfigEntity};
use crate::{logging, Result};

/// `init_default` initializes the breakers using the configuration from system
/// environment and the default value.
#[inline]
pub fn init_default() -> Result<()> {
    init_breakers(&mut String::new())
}

/// `init_with_config` initializes the breakers using given config.
#[inline]
pub fn init_with_config(config_entity: ConfigEntity) -> Result<()> {
    config_entity.check()?;
    config::reset_global_config(config_entity);
    init_core_components()
}

/// `init_with_config_file` loads the general configuration from the given YAML file
/// and initializes the breakers.
#[inline]
pub fn init_with_config_file(config_path: &mut String) -> Result<()> {
    init_breakers(config_path)
}

#[inline]
fn init_breakers(config_path: &mut String) -> Result<()> {
    config::init_config_with_yaml(config_path)?;
    init_core_components()
}

// `init_core_components` init core components with global config
fn init_core_components() -> Result<()> {
    #[cfg(any(feature = "logger_env", feature = "logger_log4rs"))]
    config::init_log()?;
    let loaded = default_manager().load_configs(config::breaker_configs());
    logging::info!(
        "[Init] Circuit breakers loaded from config, count {}, total {}",
        loaded,
        default_manager().len()
    );
    Ok(())
}
