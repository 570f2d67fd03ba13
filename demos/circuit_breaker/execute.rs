use anyhow::Error;
use breaker_core::circuitbreaker::{
    default_manager, register_state_change_listeners, Settings, State, StateChangeListener,
};
use breaker_core::utils::{curr_time_millis, format_time_curr, sleep_for_ms};
use rand::prelude::*;
use std::sync::Arc;
use std::time::Duration;

struct MyStateListener {}

impl StateChangeListener for MyStateListener {
    fn on_transform_to_closed(&self, name: &str, prev: State) {
        println!(
            "breaker: {}, From {} to Closed, time: {}\n",
            name,
            prev,
            format_time_curr()
        )
    }
    fn on_transform_to_open(&self, name: &str, prev: State) {
        println!(
            "breaker: {}, From {} to Open, time: {}\n",
            name,
            prev,
            format_time_curr()
        )
    }
    fn on_transform_to_half_open(&self, name: &str, prev: State) {
        println!(
            "breaker: {}, From {} to Half-Open, time: {}\n",
            name,
            prev,
            format_time_curr()
        )
    }
}

/// consecutive-failure circuit breaking example, wrapping the work with `execute`
fn main() {
    breaker_core::init_default().unwrap_or_else(|err| breaker_core::logging::error!("{:?}", err));
    let listeners: Vec<Arc<dyn StateChangeListener>> = vec![Arc::new(MyStateListener {})];
    register_state_change_listeners(listeners);

    let cb = default_manager().get_or_create(
        Settings::new("execute_example")
            .with_max_requests(3)
            .with_timeout(Duration::from_millis(500))
            .with_ready_to_trip(|counts| counts.consecutive_failures > 3),
    );

    let mut handlers = Vec::new();
    for _ in 0..10 {
        let cb = cb.clone();
        handlers.push(std::thread::spawn(move || {
            for _ in 0..200 {
                let res = cb.execute(|| {
                    // Passed, wrap the logic here.
                    sleep_for_ms(10);
                    if thread_rng().gen::<f32>() > 0.6 {
                        return Err(Error::msg("Example"));
                    }
                    Ok(curr_time_millis())
                });
                match res {
                    Ok(t) => println!("{}: passed", t),
                    // Blocked, or the work failed.
                    Err(_) => sleep_for_ms(rand::random::<u64>() % 10),
                }
            }
        }));
    }
    for h in handlers {
        h.join().expect("Couldn't join on the associated thread");
    }
    println!("final counts: {:?}, state: {}", cb.counts(), cb.state());
}
