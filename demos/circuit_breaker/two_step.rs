use breaker_core::circuitbreaker::{BreakerError, Settings, TwoStepCircuitBreaker};
use breaker_core::utils::{curr_time_millis, sleep_for_ms};
use rand::prelude::*;
use std::sync::mpsc;
use std::time::Duration;

/// two-step circuit breaking example, the outcome is reported by a worker thread
fn main() {
    breaker_core::init_default().unwrap_or_else(|err| breaker_core::logging::error!("{:?}", err));
    let cb = TwoStepCircuitBreaker::new(
        Settings::new("two_step_example")
            .with_timeout(Duration::from_millis(200))
            .with_on_state_change(|name, from, to| {
                println!("{}: breaker {} from {} to {}", curr_time_millis(), name, from, to)
            }),
    );

    let (tx, rx) = mpsc::channel::<Box<dyn Fn(bool) + Send>>();
    let worker = std::thread::spawn(move || {
        for done in rx {
            sleep_for_ms(rand::random::<u64>() % 10);
            // Report the outcome in the second step.
            done(thread_rng().gen::<f32>() > 0.5);
        }
    });

    for _ in 0..500 {
        match cb.allow() {
            Ok(done) => {
                println!("{}: passed", curr_time_millis());
                if tx.send(Box::new(done)).is_err() {
                    break;
                }
            }
            Err(BreakerError::OpenState) => sleep_for_ms(20),
            Err(BreakerError::TooManyRequests) => sleep_for_ms(5),
        }
    }
    drop(tx);
    worker.join().expect("Couldn't join on the associated thread");
    println!("final counts: {:?}, state: {}", cb.counts(), cb.state());
}
