//! mod `api` provides the topmost APIs to initialize the breakers of a process.
//! There are three ways to perform initialization:
//!
//!  1. `init_default()`, using the configuration from system environment and the default value.
//!  2. `init_with_config(config_entity: config::ConfigEntity)`, using a customized `ConfigEntity`.
//!  3. `init_with_config_file(config_path: &mut String)`, using a YAML file.
//!
//! The breakers declared in the configuration are loaded into `circuitbreaker::default_manager()`:
//!
//! ```
//! use breaker_core::circuitbreaker::default_manager;
//!
//! breaker_core::init_with_config_file(&mut "testdata/config/breaker.yaml".to_owned())
//!     .unwrap_or_else(|err| breaker_core::logging::error!("{:?}", err));
//! if let Some(cb) = default_manager().get("payments") {
//!     let res = cb.execute(|| -> breaker_core::Result<()> { Ok(()) });
//! }
//! ```

pub mod init;

pub use init::*;
