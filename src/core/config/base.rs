use super::{constant::*, BreakerConfig, ConfigEntity};
use crate::{logging, utils, Error, Result};
use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::env;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<ConfigEntity> = RwLock::new(ConfigEntity::new());
}

pub fn reset_global_config(entity: ConfigEntity) {
    *GLOBAL_CONFIG.write() = entity;
}

#[inline]
pub fn global_config() -> ConfigEntity {
    GLOBAL_CONFIG.read().clone()
}

// init_config_with_yaml loads general configuration from the YAML file under provided path.
// The resolved path is written back to `config_path`.
pub fn init_config_with_yaml(config_path: &mut String) -> Result<()> {
    resolve_config_path(config_path);
    let entity = load_config_from_yaml_file(config_path)?;
    reset_global_config(entity);
    Ok(())
}

// Priority: system environment > given path > default config
fn resolve_config_path(config_path: &mut String) {
    if utils::is_blank(config_path) {
        *config_path = env::var(CONF_FILE_PATH_ENV_KEY).unwrap_or_else(|_| CONFIG_FILENAME.into());
    }
}

/// `load_config_from_yaml_file` parses and checks the configuration in the given YAML file.
/// A blank path is resolved from the `BREAKER_CONFIG_FILE_PATH` environment variable,
/// and `USE_DEFAULT_CONFIGURATION` stands for the default configuration.
pub fn load_config_from_yaml_file(path_str: &str) -> Result<ConfigEntity> {
    let mut path_str = path_str.to_owned();
    resolve_config_path(&mut path_str);
    if path_str == CONFIG_FILENAME {
        return Ok(ConfigEntity::default());
    }
    let path = Path::new(&path_str);
    if !path.exists() {
        return Err(Error::msg(format!(
            "breaker YAML configuration file does not exist: {}",
            path_str
        )));
    }
    let content = fs::read_to_string(path)?;
    let entity = load_config_from_yaml_str(&content)?;
    logging::info!(
        "[Config] Resolving breaker config from file, file {}",
        path_str
    );
    Ok(entity)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<ConfigEntity> {
    let entity: ConfigEntity = serde_yaml::from_str(content)?;
    entity.check()?;
    Ok(entity)
}

cfg_logger! {
    pub fn init_log() -> Result<()> {
        logging::logger_init(log_config_file())?;
        logging::info!(
            "[Config] Print effective global config, globalConfig {:?}",
            *GLOBAL_CONFIG.read()
        );
        Ok(())
    }
}

#[inline]
pub fn log_config_file() -> Option<String> {
    let file = GLOBAL_CONFIG.read().log.config_file.clone();
    if utils::is_blank(&file) {
        None
    } else {
        Some(file)
    }
}

#[inline]
pub fn breaker_configs() -> Vec<BreakerConfig> {
    GLOBAL_CONFIG.read().breakers.clone()
}
