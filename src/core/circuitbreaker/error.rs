use thiserror::Error;

/// `BreakerError` is returned at admission time when a breaker rejects a request.
/// Outcome reports never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BreakerError {
    /// the breaker is open, the request must not be carried out
    #[error("circuit breaker is open")]
    OpenState,
    /// the breaker is half-open and all probe slots are taken
    #[error("too many requests")]
    TooManyRequests,
}
