use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// States of Circuit Breaker State Machine
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    /// all requests are admitted
    Closed,
    /// a bounded number of probe requests are admitted
    HalfOpen,
    /// all requests are rejected
    Open,
}

impl Default for State {
    fn default() -> State {
        State::Closed
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Closed => "closed",
            State::HalfOpen => "half-open",
            State::Open => "open",
        };
        f.write_str(s)
    }
}

impl FromStr for State {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "closed" => Ok(State::Closed),
            "half-open" => Ok(State::HalfOpen),
            "open" => Ok(State::Open),
            _ => Err(Error::msg(format!("unknown state: {}", s))),
        }
    }
}
