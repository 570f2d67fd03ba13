mod breaker;
mod config;
mod two_step;

#[cfg(feature = "async")]
mod async_execute;
