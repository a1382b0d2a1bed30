//! Core identifier types for the event graph engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Canonical numeric identifier of an actor (a historical person).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub i64);

impl ActorId {
    /// Sentinel returned by resolvers when a reference cannot be matched.
    pub const UNRESOLVED: ActorId = ActorId(-1);

    pub fn is_resolved(self) -> bool {
        self != Self::UNRESOLVED
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ActorId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ActorId)
    }
}

impl From<i64> for ActorId {
    fn from(value: i64) -> Self {
        ActorId(value)
    }
}

/// Unique key of a location node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub i64);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocationId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(LocationId)
    }
}

impl From<i64> for LocationId {
    fn from(value: i64) -> Self {
        LocationId(value)
    }
}

/// Identifies one edge: the owning actor plus the edge's position in that
/// actor's chronological sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId {
    pub actor: ActorId,
    pub seq: u32,
}

impl EdgeId {
    pub fn new(actor: ActorId, seq: u32) -> Self {
        Self { actor, seq }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.actor, self.seq)
    }
}
