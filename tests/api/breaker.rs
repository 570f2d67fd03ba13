use anyhow::Error;
use breaker_core::circuitbreaker::{BreakerError, CircuitBreaker, Counts, Settings, State};
use breaker_core::utils::{sleep_for_ms, Clock, ManualClock};
use rand::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn fail(cb: &CircuitBreaker) -> breaker_core::Result<()> {
    cb.execute(|| Err(Error::msg("fail")))
}

fn succeed(cb: &CircuitBreaker) -> breaker_core::Result<()> {
    cb.execute(|| Ok(()))
}

fn rejection(res: breaker_core::Result<()>) -> Option<BreakerError> {
    res.err()
        .and_then(|err| err.downcast_ref::<BreakerError>().copied())
}

#[test]
fn default_policy() {
    let cb = CircuitBreaker::new(Settings::new("default_policy"));
    for _ in 0..5 {
        assert!(fail(&cb).is_err());
    }
    assert_eq!(cb.state(), State::Closed);

    assert!(fail(&cb).is_err());
    assert_eq!(cb.state(), State::Open);
    assert_eq!(rejection(succeed(&cb)), Some(BreakerError::OpenState));
}

#[test]
fn successes_without_interval() {
    let cb = CircuitBreaker::new(Settings::new("successes_without_interval"));
    for _ in 0..100 {
        assert!(succeed(&cb).is_ok());
    }
    assert_eq!(cb.state(), State::Closed);
    assert_eq!(cb.generation(), 1);
    assert_eq!(
        cb.counts(),
        Counts {
            requests: 100,
            total_successes: 100,
            total_failures: 0,
            consecutive_successes: 100,
            consecutive_failures: 0,
        }
    );
}

#[test]
fn idle_interval() {
    let clock = Arc::new(ManualClock::new());
    let cb = CircuitBreaker::new(
        Settings::new("idle_interval")
            .with_interval(Duration::from_secs(10))
            .with_clock(Arc::clone(&clock) as Arc<dyn Clock>),
    );
    assert!(fail(&cb).is_err());
    assert!(succeed(&cb).is_ok());
    assert_eq!(cb.counts().requests, 2);

    clock.advance_ms(11_000);
    // the counts are cleared by the next call observing the expired interval
    assert_eq!(cb.generation(), 2);
    assert_eq!(cb.counts(), Counts::default());
}

#[test]
fn recovery() {
    let clock = Arc::new(ManualClock::new());
    let states = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let recorded = Arc::clone(&states);
    let cb = CircuitBreaker::new(
        Settings::new("recovery")
            .with_max_requests(2)
            .with_timeout(Duration::from_secs(5))
            .with_ready_to_trip(|counts| counts.consecutive_failures >= 2)
            .with_on_state_change(move |_, from, to| recorded.lock().push((from, to)))
            .with_clock(Arc::clone(&clock) as Arc<dyn Clock>),
    );
    assert!(fail(&cb).is_err());
    assert!(fail(&cb).is_err());
    assert_eq!(cb.state(), State::Open);

    clock.advance_ms(4_999);
    assert_eq!(rejection(succeed(&cb)), Some(BreakerError::OpenState));
    clock.advance_ms(1);
    assert_eq!(cb.state(), State::HalfOpen);

    assert!(succeed(&cb).is_ok());
    assert_eq!(cb.state(), State::HalfOpen);
    assert!(succeed(&cb).is_ok());
    assert_eq!(cb.state(), State::Closed);

    assert_eq!(
        *states.lock(),
        vec![
            (State::Closed, State::Open),
            (State::Open, State::HalfOpen),
            (State::HalfOpen, State::Closed),
        ]
    );
}

#[test]
fn ignored_errors() {
    let cb = CircuitBreaker::new(
        Settings::new("ignored_errors")
            .with_is_successful(|err| err.map_or(true, |err| err.to_string() == "not found")),
    );
    for _ in 0..10 {
        let res: breaker_core::Result<()> = cb.execute(|| Err(Error::msg("not found")));
        assert_eq!(res.unwrap_err().to_string(), "not found");
    }
    assert_eq!(cb.state(), State::Closed);
    assert_eq!(cb.counts().total_successes, 10);
}

#[test]
fn concurrent_execute() {
    let cb = CircuitBreaker::new(
        Settings::new("concurrent_execute")
            .with_max_requests(3)
            .with_timeout(Duration::from_millis(20))
            .with_ready_to_trip(|counts| counts.consecutive_failures > 3),
    );
    let invoked = Arc::new(AtomicUsize::new(0));

    let mut handlers = Vec::new();
    for _ in 0..8 {
        let cb = cb.clone();
        let invoked = Arc::clone(&invoked);
        handlers.push(std::thread::spawn(move || {
            let mut admitted = 0;
            for _ in 0..100 {
                let res = cb.execute(|| {
                    invoked.fetch_add(1, Ordering::SeqCst);
                    sleep_for_ms(rand::random::<u64>() % 2);
                    if thread_rng().gen::<f32>() > 0.5 {
                        return Err(Error::msg("Example"));
                    }
                    Ok(())
                });
                if rejection(res).is_none() {
                    admitted += 1;
                }
                let counts = cb.counts();
                assert!(counts.total_successes + counts.total_failures <= counts.requests);
            }
            admitted
        }));
    }
    let admitted: usize = handlers
        .into_iter()
        .map(|h| h.join().expect("Couldn't join on the associated thread"))
        .sum();
    // only admitted requests run the work
    assert_eq!(invoked.load(Ordering::SeqCst), admitted);

    let counts = cb.counts();
    assert!(counts.total_successes + counts.total_failures <= counts.requests);
    assert!(counts.consecutive_successes == 0 || counts.consecutive_failures == 0);
}
