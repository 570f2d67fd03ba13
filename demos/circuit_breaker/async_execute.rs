use anyhow::Error;
use breaker_core::circuitbreaker::{CircuitBreaker, Settings};
use breaker_core::utils::curr_time_millis;
use tokio::time::{sleep, Duration};

/// circuit breaking example on async functions
#[tokio::main]
async fn main() {
    breaker_core::init_default().unwrap_or_else(|err| breaker_core::logging::error!("{:?}", err));
    let cb = CircuitBreaker::new(
        Settings::new("async_execute_example")
            .with_timeout(Duration::from_millis(300))
            .with_on_state_change(|name, from, to| {
                println!("{}: breaker {} from {} to {}", curr_time_millis(), name, from, to)
            }),
    );

    let mut handlers = Vec::new();
    for i in 0..20 {
        let cb = cb.clone();
        handlers.push(tokio::spawn(async move {
            for j in 0..50u64 {
                match cb.execute_async(|| task(i + j)).await {
                    Ok(_) => println!("{}: passed", curr_time_millis()),
                    Err(_) => sleep(Duration::from_millis(50)).await,
                }
            }
        }));
    }
    for h in handlers {
        h.await.expect("Couldn't join on the associated task");
    }
}

async fn task(seed: u64) -> breaker_core::Result<()> {
    sleep(Duration::from_millis(10)).await;
    if seed % 3 == 0 {
        return Err(Error::msg("Example"));
    }
    Ok(())
}
