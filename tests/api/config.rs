use breaker_core::circuitbreaker::default_manager;
use breaker_core::config::{BreakerConfig, ConfigEntity};
use std::time::Duration;

// every init touches the global config, so they run in a single test
#[test]
fn init_breakers() {
    let mut path = format!("{}/testdata/config/breaker.yaml", env!("CARGO_MANIFEST_DIR"));
    breaker_core::init_with_config_file(&mut path).unwrap();
    let payments = default_manager().get("payments").unwrap();
    assert_eq!(payments.max_requests(), 3);
    assert_eq!(payments.interval(), Duration::from_secs(10));
    assert_eq!(payments.timeout(), Duration::from_secs(30));
    let inventory = default_manager().get("inventory").unwrap();
    assert_eq!(inventory.timeout(), Duration::from_secs(5));

    breaker_core::init_with_config(ConfigEntity {
        breakers: vec![BreakerConfig {
            name: "from_entity".into(),
            max_requests: 2,
            ..Default::default()
        }],
        ..Default::default()
    })
    .unwrap();
    assert_eq!(default_manager().get("from_entity").unwrap().max_requests(), 2);
    // breakers built by former inits are kept
    assert!(default_manager().get("payments").is_some());

    let duplicated = ConfigEntity {
        breakers: vec![BreakerConfig::new("dup"), BreakerConfig::new("dup")],
        ..Default::default()
    };
    assert!(breaker_core::init_with_config(duplicated).is_err());
    assert!(default_manager().get("dup").is_none());

    let mut missing = String::from("testdata/config/not_exist.yaml");
    assert!(breaker_core::init_with_config_file(&mut missing).is_err());

    breaker_core::init_default().unwrap();
}
