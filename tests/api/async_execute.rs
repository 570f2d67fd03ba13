use anyhow::Error;
use breaker_core::circuitbreaker::{BreakerError, CircuitBreaker, Settings, State};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, timeout, Duration};

#[tokio::test]
async fn outcomes_are_counted() {
    let cb = CircuitBreaker::new(Settings::new("async_outcomes"));
    let value = cb
        .execute_async(|| async { Ok::<_, Error>(42) })
        .await
        .unwrap();
    assert_eq!(value, 42);
    for _ in 0..6 {
        let res: breaker_core::Result<()> = cb
            .execute_async(|| async {
                sleep(Duration::from_millis(1)).await;
                Err(Error::msg("fail"))
            })
            .await;
        assert!(res.is_err());
    }
    assert_eq!(cb.state(), State::Open);

    let polled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&polled);
    let err = cb
        .execute_async(|| async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<BreakerError>(), Some(&BreakerError::OpenState));
    assert!(!polled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn panic_is_a_failure() {
    let cb = CircuitBreaker::new(
        Settings::new("async_panic").with_ready_to_trip(|counts| counts.consecutive_failures >= 1),
    );
    let handle = {
        let cb = cb.clone();
        tokio::spawn(async move {
            cb.execute_async(|| async {
                if true {
                    panic!("boom");
                }
                Ok(())
            })
            .await
        })
    };
    assert!(handle.await.unwrap_err().is_panic());
    assert_eq!(cb.state(), State::Open);
}

#[tokio::test]
async fn cancelled_request_is_not_reported() {
    let cb = CircuitBreaker::new(Settings::new("async_cancelled"));
    let res = timeout(
        Duration::from_millis(10),
        cb.execute_async(|| async {
            sleep(Duration::from_secs(10)).await;
            Ok(())
        }),
    )
    .await;
    assert!(res.is_err());
    let counts = cb.counts();
    assert_eq!(counts.requests, 1);
    assert_eq!(counts.total_successes + counts.total_failures, 0);
}
