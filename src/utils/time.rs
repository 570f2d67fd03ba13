use parking_lot::Mutex;
use std::fmt;
use std::time::{Duration, Instant};
use time::{macros::format_description, OffsetDateTime};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// `Clock` is the time source of a circuit breaker.
/// Deadlines are compared against monotonic `Instant`s, so wall clock adjustments never
/// open or close a breaker.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// `SystemClock` reads `Instant::now()`, it is the default clock of every breaker.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// `ManualClock` only moves when it is told to, which makes expiry driven transitions
/// reproducible in tests and simulations.
pub struct ManualClock {
    base: Instant,
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            base: Instant::now(),
            elapsed: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, d: Duration) {
        *self.elapsed.lock() += d;
    }

    #[inline]
    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    pub fn elapsed(&self) -> Duration {
        *self.elapsed.lock()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        ManualClock::new()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.elapsed.lock()
    }
}

#[inline]
pub fn sleep_for_ms(ms: u64) {
    std::thread::sleep(Duration::from_millis(ms));
}

#[inline]
pub fn curr_time_nanos() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos()
}

#[inline]
pub fn curr_time_millis() -> u64 {
    (curr_time_nanos() / NANOS_PER_MILLI) as u64
}

#[inline]
pub fn milli2nano<T: Into<i128>>(t: T) -> i128 {
    NANOS_PER_MILLI * t.into()
}

/// formats a unix timestamp (in ms) as `hh:mm:ss.SSS`,
/// an empty string is returned if the timestamp is out of range
pub fn format_time_millis(ts_millis: u64) -> String {
    OffsetDateTime::from_unix_timestamp_nanos(milli2nano(ts_millis))
        .ok()
        .and_then(|t| {
            t.format(format_description!(
                "[hour]:[minute]:[second].[subsecond digits:3]"
            ))
            .ok()
        })
        .unwrap_or_default()
}

#[inline]
pub fn format_time_curr() -> String {
    format_time_millis(curr_time_millis())
}
