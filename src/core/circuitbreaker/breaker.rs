use super::*;
use crate::config::{DEFAULT_MAX_REQUESTS, DEFAULT_TIMEOUT};
use crate::utils::{Clock, SystemClock};
use crate::{logging, Result};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// `CircuitBreaker` is a state machine to prevent sending requests that are likely to fail.
///
/// It is a cheap handle, clones share the same state machine.
#[derive(Clone)]
pub struct CircuitBreaker {
    base: Arc<BreakerBase>,
}

/// BreakerBase encompasses the resolved settings and the locked status of a circuit breaker.
pub(crate) struct BreakerBase {
    name: String,
    max_requests: u32,
    interval: Duration,
    timeout: Duration,
    ready_to_trip: Arc<ReadyToTripFn>,
    is_successful: Arc<IsSuccessfulFn>,
    on_state_change: Option<Arc<StateChangeFn>>,
    clock: Arc<dyn Clock>,
    // state, generation, counts and expiry always change together
    status: Mutex<Status>,
}

#[derive(Debug)]
struct Status {
    state: State,
    /// incremented whenever the counts are cleared,
    /// reports carrying an older generation are discarded
    generation: u64,
    counts: Counts,
    /// closed: end of the current interval, if an interval is set.
    /// open: the time the breaker could probe.
    /// half-open: always `None`.
    expiry: Option<Instant>,
}

impl CircuitBreaker {
    /// `new` returns a circuit breaker configured with the given settings.
    pub fn new(settings: Settings) -> Self {
        let max_requests = match settings.max_requests {
            0 => DEFAULT_MAX_REQUESTS,
            n => n,
        };
        let timeout = if settings.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            settings.timeout
        };
        let base = BreakerBase {
            name: settings.name,
            max_requests,
            interval: settings.interval,
            timeout,
            ready_to_trip: settings
                .ready_to_trip
                .unwrap_or_else(|| Arc::new(default_ready_to_trip)),
            is_successful: settings
                .is_successful
                .unwrap_or_else(|| Arc::new(default_is_successful)),
            on_state_change: settings.on_state_change,
            clock: settings.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            status: Mutex::new(Status {
                state: State::Closed,
                generation: 0,
                counts: Counts::default(),
                expiry: None,
            }),
        };
        {
            let now = base.clock.now();
            let mut status = base.status.lock();
            base.to_new_generation(&mut status, now);
        }
        CircuitBreaker {
            base: Arc::new(base),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.base.name
    }

    #[inline]
    pub fn max_requests(&self) -> u32 {
        self.base.max_requests
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.base.interval
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        self.base.timeout
    }

    /// `state` returns the current state, performing the transition that is due by time, if any.
    pub fn state(&self) -> State {
        let mut status = self.base.status.lock();
        let now = self.base.clock.now();
        self.base.current_state(&mut status, now).0
    }

    /// `generation` returns the current generation, performing the transition that is due by time, if any.
    pub fn generation(&self) -> u64 {
        let mut status = self.base.status.lock();
        let now = self.base.clock.now();
        self.base.current_state(&mut status, now).1
    }

    /// `counts` returns a copy of the internal counters.
    pub fn counts(&self) -> Counts {
        self.base.status.lock().counts
    }

    /// `execute` runs the given request if the circuit breaker admits it,
    /// and returns the result of the request unchanged.
    /// If the breaker rejects the request, a `BreakerError` is returned at once
    /// and the request is not invoked.
    /// If the request or `is_successful` panics, a failure is recorded and the panic keeps unwinding.
    /// State changes caused by that failure are not notified.
    pub fn execute<T, F>(&self, req: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let generation = self.base.before_request()?;

        // armed until the outcome is classified, after_request records before running callbacks
        let guard = AbnormalExitGuard::new(&self.base, generation);
        let result = req();
        let success = (self.base.is_successful)(result.as_ref().err());
        guard.disarm();

        self.base.after_request(generation, success);
        result
    }

    #[inline]
    pub(crate) fn base(&self) -> &Arc<BreakerBase> {
        &self.base
    }
}

cfg_async! {
    use futures::FutureExt;
    use std::future::Future;
    use std::panic::{self, AssertUnwindSafe};

    impl CircuitBreaker {
        /// `execute_async` is the asynchronous flavour of `execute`.
        /// A panic while polling the request or classifying its outcome is recorded as a failure and resumed,
        /// a request dropped before completion is not reported at all.
        pub async fn execute_async<T, F, Fut>(&self, req: F) -> Result<T>
        where
            F: FnOnce() -> Fut,
            Fut: Future<Output = Result<T>>,
        {
            let generation = self.base.before_request()?;

            let outcome = AssertUnwindSafe(req()).catch_unwind().await.and_then(|result| {
                panic::catch_unwind(AssertUnwindSafe(|| {
                    (self.base.is_successful)(result.as_ref().err())
                }))
                .map(|success| (result, success))
            });
            match outcome {
                Ok((result, success)) => {
                    self.base.after_request(generation, success);
                    result
                }
                Err(payload) => {
                    self.base.after_request(generation, false);
                    panic::resume_unwind(payload)
                }
            }
        }
    }
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.base.status.lock();
        f.debug_struct("CircuitBreaker")
            .field("name", &self.base.name)
            .field("max_requests", &self.base.max_requests)
            .field("interval", &self.base.interval)
            .field("timeout", &self.base.timeout)
            .field("status", &*status)
            .finish()
    }
}

/// reports a failure if it is dropped while still armed,
/// i.e. the request unwound instead of returning
struct AbnormalExitGuard<'a> {
    base: &'a BreakerBase,
    generation: u64,
    armed: bool,
}

impl<'a> AbnormalExitGuard<'a> {
    fn new(base: &'a BreakerBase, generation: u64) -> Self {
        AbnormalExitGuard {
            base,
            generation,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AbnormalExitGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            logging::debug!(
                "[CircuitBreaker] request panicked, record it as a failure, name {}",
                self.base.name
            );
            self.base.after_request(self.generation, false);
        }
    }
}

impl BreakerBase {
    /// `before_request` decides whether a request is admitted,
    /// and returns the generation the request belongs to.
    pub(crate) fn before_request(&self) -> std::result::Result<u64, BreakerError> {
        let mut status = self.status.lock();
        let now = self.clock.now();
        let (state, generation) = self.current_state(&mut status, now);

        match state {
            State::Open => {
                logging::trace!("[CircuitBreaker] rejected by open state, name {}", self.name);
                Err(BreakerError::OpenState)
            }
            State::HalfOpen if status.counts.requests >= self.max_requests => {
                logging::trace!(
                    "[CircuitBreaker] rejected by half-open quota, name {}, max_requests {}",
                    self.name,
                    self.max_requests
                );
                Err(BreakerError::TooManyRequests)
            }
            _ => {
                status.counts.on_request();
                Ok(generation)
            }
        }
    }

    /// `after_request` records the outcome of a request admitted in generation `before`.
    /// The outcome is dropped if the generation has rolled over since.
    pub(crate) fn after_request(&self, before: u64, success: bool) {
        let mut status = self.status.lock();
        let now = self.clock.now();
        let (state, generation) = self.current_state(&mut status, now);
        if generation != before {
            logging::trace!(
                "[CircuitBreaker] discard the outcome of a stale generation, name {}, generation {}, current {}",
                self.name,
                before,
                generation
            );
            return;
        }

        if success {
            self.on_success(&mut status, state, now);
        } else {
            self.on_failure(&mut status, state, now);
        }
    }

    fn on_success(&self, status: &mut Status, state: State, now: Instant) {
        match state {
            State::Closed => status.counts.on_success(),
            State::HalfOpen => {
                status.counts.on_success();
                if status.counts.consecutive_successes >= self.max_requests {
                    self.set_state(status, State::Closed, now);
                }
            }
            State::Open => {}
        }
    }

    fn on_failure(&self, status: &mut Status, state: State, now: Instant) {
        match state {
            State::Closed => {
                status.counts.on_failure();
                if (self.ready_to_trip)(&status.counts) {
                    self.set_state(status, State::Open, now);
                }
            }
            State::HalfOpen => self.set_state(status, State::Open, now),
            State::Open => {}
        }
    }

    /// `current_state` performs the transition that is due at `now`, if any,
    /// and returns the resulting state and generation.
    fn current_state(&self, status: &mut Status, now: Instant) -> (State, u64) {
        match status.state {
            State::Closed => {
                if status.expiry.map_or(false, |expiry| expiry <= now) {
                    self.to_new_generation(status, now);
                }
            }
            State::Open => {
                if status.expiry.map_or(false, |expiry| expiry <= now) {
                    self.set_state(status, State::HalfOpen, now);
                }
            }
            State::HalfOpen => {}
        }
        (status.state, status.generation)
    }

    fn set_state(&self, status: &mut Status, state: State, now: Instant) {
        if status.state == state {
            return;
        }

        let prev = status.state;
        status.state = state;
        self.to_new_generation(status, now);

        logging::debug!(
            "[CircuitBreaker] state changed, name {}, from {} to {}, generation {}",
            self.name,
            prev,
            state,
            status.generation
        );
        // a second panic while unwinding would abort the process
        if thread::panicking() {
            logging::warn!(
                "[CircuitBreaker] state change is not notified while panicking, name {}, from {} to {}",
                self.name,
                prev,
                state
            );
            return;
        }
        if let Some(on_state_change) = &self.on_state_change {
            on_state_change(&self.name, prev, state);
        }
    }

    fn to_new_generation(&self, status: &mut Status, now: Instant) {
        status.generation = status.generation.wrapping_add(1);
        status.counts.clear();

        // a deadline too far away to be represented never expires
        status.expiry = match status.state {
            State::Closed if self.interval.is_zero() => None,
            State::Closed => now.checked_add(self.interval),
            State::Open => now.checked_add(self.timeout),
            State::HalfOpen => None,
        };
    }
}
