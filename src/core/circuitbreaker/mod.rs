//! `circuitbreaker` module implements the circuit breaker pattern, which prevents an
//! application from repeatedly trying to execute an operation that is likely to fail.
//!
//! A circuit breaker is implemented based on a state machine. There are three states:
//!
//!  1. Closed: all requests pass. Outcomes are counted, and when a failure makes
//!     `ready_to_trip` return true, the breaker switches to Open.
//!     If an interval is set, the counts are cleared at the end of every interval.
//!
//!  2. Open: all requests are rejected with `BreakerError::OpenState`. After the timeout,
//!     the breaker switches to Half-Open.
//!
//!  3. Half-Open: at most `max_requests` requests are admitted to probe the protected resource,
//!     others are rejected with `BreakerError::TooManyRequests`. The breaker switches to Closed
//!     after `max_requests` consecutive successes, and back to Open on any failure.
//!
//! ```text
//!            ready_to_trip                 timeout elapsed
//!   Closed ----------------> Open ---------------------------> Half-Open
//!     ^                       ^                                    |
//!     |                       |           any failure              |
//!     |                       +------------------------------------+
//!     |                 max_requests consecutive successes         |
//!     +------------------------------------------------------------+
//! ```
//!
//! The time based transitions are lazy, they are observed by the next operation on the breaker.
//! Every transition and every interval clearing starts a new generation of counts, and the
//! outcome of a request admitted in an older generation is discarded.
//!
//! `CircuitBreaker::execute` guards a closure, `TwoStepCircuitBreaker::allow` splits the
//! admission from the report. Named breakers are kept in a `BreakerManager`, whose
//! `StateChangeListener`s observe the state changes of all its breakers.

pub mod breaker;
pub mod counts;
pub mod error;
pub mod manager;
pub mod settings;
pub mod state;
pub mod two_step;

pub use breaker::*;
pub use counts::*;
pub use error::*;
pub use manager::*;
pub use settings::*;
pub use state::*;
pub use two_step::*;
