// the breaker state machine, its facades and the breaker registry
pub mod circuitbreaker;
pub mod config;
