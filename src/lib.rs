#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]

//! # breaker-core
//!
//! A circuit breaker protects a caller from repeatedly invoking an operation that is likely to fail.
//! It tracks the outcomes of recent requests and, once a failure policy trips, rejects
//! requests for a while before letting a few probes through to check whether the protected
//! resource has recovered.
//!
//! Each breaker is a small state machine with three states (Closed, Open, Half-Open),
//! see the `circuitbreaker` module for the transition rules.
//! Transitions are driven lazily by the next call on the breaker, there is no timer thread.
//!
//! ## Add Dependency
//!
//! ```toml
//! [dependencies]
//! breaker-core = { version = "0.1.0" }
//! ```
//!
//! Optional features lists:
//! - async: `CircuitBreaker::execute_async` for future-producing work.
//! - logger_env: Use `env_logger` to initialize logging.
//! - logger_log4rs: Use `log4rs` to initialize logging.
//!
//! ## Wrapping a Unit of Work
//!
//! ```rust
//! use breaker_core::circuitbreaker::{CircuitBreaker, Settings};
//! use std::time::Duration;
//!
//! let cb = CircuitBreaker::new(
//!     Settings::new("payments")
//!         .with_max_requests(3)
//!         .with_timeout(Duration::from_secs(30)),
//! );
//! let res = cb.execute(|| -> breaker_core::Result<u32> { Ok(42) });
//! ```
//!
//! If the breaker rejects the request, `execute` returns a `BreakerError`
//! (wrapped in `anyhow::Error`) and the closure is never invoked.
//!
//! ## Reporting in Two Steps
//!
//! Callers which cannot express their work as a single closure ask for admission first
//! and report the outcome later:
//!
//! ```rust
//! use breaker_core::circuitbreaker::{Settings, TwoStepCircuitBreaker};
//!
//! let cb = TwoStepCircuitBreaker::new(Settings::new("inventory"));
//! if let Ok(done) = cb.allow() {
//!     // do the work, then
//!     done(true);
//! }
//! ```
//!
//! ## Configuration
//!
//! Breakers can be declared in YAML and loaded into the default `BreakerManager`
//! through `init_with_config_file()`, refer to `testdata/config/breaker.yaml`.

#[macro_use]
#[doc(hidden)]
pub mod macros;

/// Initialization APIs.
pub mod api;
/// Core implementations, the circuit breaker state machine and its configuration.
pub mod core;
/// Adapters for different logging crates.
pub mod logging;
// Utility functions.
pub mod utils;

// re-export precludes
pub use crate::core::*;
pub use api::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
