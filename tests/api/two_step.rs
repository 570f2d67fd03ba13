use breaker_core::circuitbreaker::{BreakerError, Settings, State, TwoStepCircuitBreaker};
use breaker_core::utils::{Clock, ManualClock};
use std::sync::{Arc, Barrier};
use std::time::Duration;

#[test]
fn concurrent_probes() {
    let clock = Arc::new(ManualClock::new());
    let cb = TwoStepCircuitBreaker::new(
        Settings::new("concurrent_probes")
            .with_max_requests(3)
            .with_timeout(Duration::from_secs(1))
            .with_ready_to_trip(|counts| counts.consecutive_failures >= 1)
            .with_clock(Arc::clone(&clock) as Arc<dyn Clock>),
    );
    cb.allow().unwrap()(false);
    clock.advance_ms(1_000);
    assert_eq!(cb.state(), State::HalfOpen);

    let barrier = Arc::new(Barrier::new(10));
    let mut handlers = Vec::new();
    for _ in 0..10 {
        let cb = cb.clone();
        let barrier = Arc::clone(&barrier);
        handlers.push(std::thread::spawn(move || {
            barrier.wait();
            cb.allow().map(|_| ())
        }));
    }
    let results: Vec<_> = handlers
        .into_iter()
        .map(|h| h.join().expect("Couldn't join on the associated thread"))
        .collect();
    assert_eq!(results.iter().filter(|res| res.is_ok()).count(), 3);
    assert!(results
        .iter()
        .filter_map(|res| res.err())
        .all(|err| err == BreakerError::TooManyRequests));
    assert_eq!(cb.counts().requests, 3);
}

#[test]
fn half_open_failure_reopens() {
    let clock = Arc::new(ManualClock::new());
    let cb = TwoStepCircuitBreaker::new(
        Settings::new("half_open_failure_reopens")
            .with_max_requests(2)
            .with_timeout(Duration::from_secs(1))
            .with_ready_to_trip(|counts| counts.consecutive_failures >= 1)
            .with_clock(Arc::clone(&clock) as Arc<dyn Clock>),
    );
    cb.allow().unwrap()(false);
    clock.advance_ms(1_000);

    let first = cb.allow().unwrap();
    let second = cb.allow().unwrap();
    first(true);
    second(false);
    assert_eq!(cb.state(), State::Open);
    assert_eq!(cb.allow().err(), Some(BreakerError::OpenState));
}
