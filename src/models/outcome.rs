//! Result of a single review attempt.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Success,
    Failure,
}

impl ReviewOutcome {
    pub fn is_success(self) -> bool {
        self == ReviewOutcome::Success
    }
}

impl From<bool> for ReviewOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            ReviewOutcome::Success
        } else {
            ReviewOutcome::Failure
        }
    }
}

impl FromStr for ReviewOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pass" | "success" | "y" | "yes" => Ok(ReviewOutcome::Success),
            "fail" | "failure" | "n" | "no" => Ok(ReviewOutcome::Failure),
            other => Err(format!("unknown review outcome: {other}")),
        }
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewOutcome::Success => write!(f, "success"),
            ReviewOutcome::Failure => write!(f, "failure"),
        }
    }
}
