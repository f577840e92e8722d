use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::text::TextRange;

/// How one side of a tracked range reacts to text inserted exactly at it.
///
/// An open start stays before the inserted text and an open end moves past
/// it, so the range grows to include it. Closed sides do the reverse and
/// keep the insertion outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeBehavior {
    /// Does not absorb text inserted at the boundary.
    Closed,
    /// Absorbs text inserted at the boundary.
    Open,
}

/// Per-side [`EdgeBehavior`] of a tracked range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BoundaryPolicy {
    pub start: EdgeBehavior,
    pub end: EdgeBehavior,
}

impl BoundaryPolicy {
    pub const CLOSED_CLOSED: Self = Self::new(EdgeBehavior::Closed, EdgeBehavior::Closed);
    pub const OPEN_OPEN: Self = Self::new(EdgeBehavior::Open, EdgeBehavior::Open);
    pub const OPEN_CLOSED: Self = Self::new(EdgeBehavior::Open, EdgeBehavior::Closed);
    pub const CLOSED_OPEN: Self = Self::new(EdgeBehavior::Closed, EdgeBehavior::Open);

    pub const fn new(start: EdgeBehavior, end: EdgeBehavior) -> Self {
        Self { start, end }
    }
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self::CLOSED_CLOSED
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |edge: EdgeBehavior| match edge {
            EdgeBehavior::Closed => "closed",
            EdgeBehavior::Open => "open",
        };
        write!(f, "{}-{}", side(self.start), side(self.end))
    }
}

/// Error returned for a policy name not of the form `<side>-<side>`, each
/// side being `open` or `closed`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown boundary policy `{0}` (expected e.g. `closed-open`)")]
pub struct ParsePolicyError(String);

impl FromStr for BoundaryPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let side = |part: &str| match part {
            "closed" => Ok(EdgeBehavior::Closed),
            "open" => Ok(EdgeBehavior::Open),
            _ => Err(ParsePolicyError(s.to_string())),
        };
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| ParsePolicyError(s.to_string()))?;
        Ok(Self::new(side(start)?, side(end)?))
    }
}

impl TryFrom<String> for BoundaryPolicy {
    type Error = ParsePolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BoundaryPolicy> for String {
    fn from(policy: BoundaryPolicy) -> Self {
        policy.to_string()
    }
}

/// A range whose position must survive a batch, with its boundary policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedRange {
    pub range: TextRange,
    #[serde(default)]
    pub policy: BoundaryPolicy,
}

impl TrackedRange {
    pub const fn new(range: TextRange, policy: BoundaryPolicy) -> Self {
        Self { range, policy }
    }
}
