//! ActorResolver trait and the heterogeneous actor references it accepts

use std::fmt;
use std::rc::Rc;

use crate::data::{Actor, ActorId};

/// Leading letter of knowledge-base identifiers (`Q` followed by digits).
pub const EXTERNAL_ID_PREFIX: char = 'Q';

/// A user-supplied way of naming an actor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorRef {
    /// Canonical numeric id.
    Id(ActorId),
    /// Knowledge-base identifier such as `Q517`.
    ExternalId(String),
    /// Display name, matched exactly.
    Label(String),
}

impl ActorRef {
    /// Classifies a raw reference: an integer is an id, `Q` plus digits is an
    /// external id, anything else is a display name.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(id) = trimmed.parse::<i64>() {
            return ActorRef::Id(ActorId(id));
        }
        if is_external_id(trimmed) {
            return ActorRef::ExternalId(trimmed.to_string());
        }
        ActorRef::Label(trimmed.to_string())
    }
}

fn is_external_id(raw: &str) -> bool {
    match raw.strip_prefix(EXTERNAL_ID_PREFIX) {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

impl fmt::Display for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRef::Id(id) => write!(f, "{id}"),
            ActorRef::ExternalId(external) => write!(f, "{external}"),
            ActorRef::Label(label) => write!(f, "{label}"),
        }
    }
}

impl From<&str> for ActorRef {
    fn from(raw: &str) -> Self {
        ActorRef::parse(raw)
    }
}

impl From<String> for ActorRef {
    fn from(raw: String) -> Self {
        ActorRef::parse(&raw)
    }
}

impl From<&String> for ActorRef {
    fn from(raw: &String) -> Self {
        ActorRef::parse(raw)
    }
}

impl From<ActorId> for ActorRef {
    fn from(id: ActorId) -> Self {
        ActorRef::Id(id)
    }
}

impl From<i64> for ActorRef {
    fn from(id: i64) -> Self {
        ActorRef::Id(ActorId(id))
    }
}

/// Maps actor references to canonical actor records.
pub trait ActorResolver {
    /// Resolves `reference` to an actor.
    ///
    /// Contract: Ids match by id, external ids by external id and labels by
    /// exact display name; when several actors share a name the first one
    /// wins. A reference that matches nothing yields `Actor::unresolved()`
    /// rather than an error, so batches of mixed-quality references can be
    /// resolved without aborting.
    fn resolve(&self, reference: &ActorRef) -> Actor;
}

impl<T: ActorResolver + ?Sized> ActorResolver for Rc<T> {
    fn resolve(&self, reference: &ActorRef) -> Actor {
        (**self).resolve(reference)
    }
}

impl<T: ActorResolver + ?Sized> ActorResolver for Box<T> {
    fn resolve(&self, reference: &ActorRef) -> Actor {
        (**self).resolve(reference)
    }
}

/// Resolves references against a slice of known actors.
pub fn resolve_in<'a, I>(actors: I, reference: &ActorRef) -> Actor
where
    I: IntoIterator<Item = &'a Actor>,
{
    let mut actors = actors.into_iter();
    let found = match reference {
        ActorRef::Id(id) => actors.find(|a| a.id == *id),
        ActorRef::ExternalId(external) => {
            actors.find(|a| a.external_id.as_deref() == Some(external.as_str()))
        }
        ActorRef::Label(label) => actors.find(|a| a.name == *label),
    };
    found.cloned().unwrap_or_else(Actor::unresolved)
}
