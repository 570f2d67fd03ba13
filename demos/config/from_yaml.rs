use breaker_core::circuitbreaker::default_manager;
use breaker_core::utils::{curr_time_millis, sleep_for_ms};

fn main() {
    // Init the breakers from yaml file
    let mut yaml_name = String::from("testdata/config/breaker.yaml");
    breaker_core::init_with_config_file(&mut yaml_name)
        .unwrap_or_else(|err| breaker_core::logging::error!("{:?}", err));

    println!("loaded breakers: {:?}", default_manager().names());
    let cb = match default_manager().get("payments") {
        Some(cb) => cb,
        None => return,
    };

    let mut handlers = Vec::new();
    for _ in 0..20 {
        let cb = cb.clone();
        handlers.push(std::thread::spawn(move || {
            for _ in 0..100 {
                cb.execute(task).unwrap_or_else(|_| {
                    // blocked or failed
                    sleep_for_ms(10);
                });
            }
        }));
    }
    for h in handlers {
        h.join().expect("Couldn't join on the associated thread");
    }
}

fn task() -> breaker_core::Result<()> {
    println!("{}: passed", curr_time_millis());
    sleep_for_ms(10);
    Ok(())
}
