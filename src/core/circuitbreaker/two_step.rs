use super::*;
use std::sync::Arc;

/// `TwoStepCircuitBreaker` is like `CircuitBreaker`, but instead of surrounding a function
/// with the breaker, it only checks whether a request can proceed and expects the caller
/// to report the outcome in a separate step.
#[derive(Debug, Clone)]
pub struct TwoStepCircuitBreaker {
    cb: CircuitBreaker,
}

impl TwoStepCircuitBreaker {
    pub fn new(settings: Settings) -> Self {
        TwoStepCircuitBreaker {
            cb: CircuitBreaker::new(settings),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.cb.name()
    }

    #[inline]
    pub fn state(&self) -> State {
        self.cb.state()
    }

    #[inline]
    pub fn counts(&self) -> Counts {
        self.cb.counts()
    }

    /// `allow` checks if a new request can proceed. It returns a callback that reports
    /// the success or failure of the request in a separate step.
    ///
    /// The callback is bound to the generation at admission time, so a report arriving
    /// after the breaker moved on has no effect. Reporting more than once, or never,
    /// is up to the caller.
    pub fn allow(&self) -> Result<impl Fn(bool) + Send + Sync + 'static, BreakerError> {
        let base = Arc::clone(self.cb.base());
        let generation = base.before_request()?;
        Ok(move |success: bool| base.after_request(generation, success))
    }

    /// `breaker` returns the underlying breaker, which shares its state with `self`.
    #[inline]
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.cb
    }
}

impl From<CircuitBreaker> for TwoStepCircuitBreaker {
    fn from(cb: CircuitBreaker) -> Self {
        TwoStepCircuitBreaker { cb }
    }
}
