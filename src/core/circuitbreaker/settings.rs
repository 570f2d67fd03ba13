use super::{Counts, State};
use crate::config::DEFAULT_MAX_CONSECUTIVE_FAILURES;
use crate::utils::Clock;
use crate::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// decides, with the counts of the current generation, whether a closed breaker trips to open
pub type ReadyToTripFn = dyn Fn(&Counts) -> bool + Send + Sync;
/// classifies the error of an outcome (`None` for `Ok`) as success or failure
pub type IsSuccessfulFn = dyn Fn(Option<&Error>) -> bool + Send + Sync;
/// notified with the breaker name, the previous state and the new state
pub type StateChangeFn = dyn Fn(&str, State, State) + Send + Sync;

/// `default_ready_to_trip` trips the breaker when there are more than 5 consecutive failures.
pub fn default_ready_to_trip(counts: &Counts) -> bool {
    counts.consecutive_failures > DEFAULT_MAX_CONSECUTIVE_FAILURES
}

/// `default_is_successful` counts every error as a failure.
pub fn default_is_successful(err: Option<&Error>) -> bool {
    err.is_none()
}

/// `Settings` configures a circuit breaker. It is resolved once, when the breaker is built,
/// zero or absent fields are replaced by the defaults at that time.
#[derive(Clone, Default)]
pub struct Settings {
    /// name of the circuit breaker
    pub name: String,
    /// max number of requests admitted in the half-open state,
    /// it is also the number of consecutive successes needed to close the breaker again.
    /// 0 means 1.
    pub max_requests: u32,
    /// cyclic period of the closed state for the breaker to clear its counts,
    /// zero disables the periodic clearing
    pub interval: Duration,
    /// period of the open state, after which the breaker becomes half-open.
    /// zero means 60 seconds.
    pub timeout: Duration,
    /// called with a copy of the counts whenever a request fails in the closed state,
    /// `default_ready_to_trip` is used if absent
    pub ready_to_trip: Option<Arc<ReadyToTripFn>>,
    /// `default_is_successful` is used if absent
    pub is_successful: Option<Arc<IsSuccessfulFn>>,
    /// called synchronously on every state change, while the breaker is still locked.
    /// It must neither block nor call back into the same breaker.
    /// Transitions caused by a panicking request are not notified.
    pub on_state_change: Option<Arc<StateChangeFn>>,
    /// `SystemClock` is used if absent
    pub clock: Option<Arc<dyn Clock>>,
}

impl Settings {
    pub fn new(name: impl Into<String>) -> Self {
        Settings {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_ready_to_trip<F>(mut self, f: F) -> Self
    where
        F: Fn(&Counts) -> bool + Send + Sync + 'static,
    {
        self.ready_to_trip = Some(Arc::new(f));
        self
    }

    pub fn with_is_successful<F>(mut self, f: F) -> Self
    where
        F: Fn(Option<&Error>) -> bool + Send + Sync + 'static,
    {
        self.is_successful = Some(Arc::new(f));
        self
    }

    pub fn with_on_state_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, State, State) + Send + Sync + 'static,
    {
        self.on_state_change = Some(Arc::new(f));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("name", &self.name)
            .field("max_requests", &self.max_requests)
            .field("interval", &self.interval)
            .field("timeout", &self.timeout)
            .field("ready_to_trip", &self.ready_to_trip.is_some())
            .field("is_successful", &self.is_successful.is_some())
            .field("on_state_change", &self.on_state_change.is_some())
            .field("clock", &self.clock.is_some())
            .finish()
    }
}
