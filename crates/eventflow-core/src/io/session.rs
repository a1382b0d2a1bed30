//! Saved sessions: the date window and the actors on screen with their
//! visibility.
//!
//! ```text
//! Start_date,1900-01-01
//! End_date,1900-12-31
//! actor_id,state
//! 517,2
//! 12,0
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::{format_iso_date, parse_iso_date, ActorId, DateWindow, SessionError};

const START_KEY: &str = "Start_date";
const END_KEY: &str = "End_date";
const ACTOR_HEADER: [&str; 2] = ["actor_id", "state"];

/// Check state of an actor in the overview list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Hidden = 0,
    Partial = 1,
    Visible = 2,
}

impl Visibility {
    pub fn from_state(state: u8) -> Option<Self> {
        match state {
            0 => Some(Visibility::Hidden),
            1 => Some(Visibility::Partial),
            2 => Some(Visibility::Visible),
            _ => None,
        }
    }

    pub fn state(self) -> u8 {
        self as u8
    }

    pub fn is_shown(self) -> bool {
        self != Visibility::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionActor {
    pub id: ActorId,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub actors: Vec<SessionActor>,
}

impl Session {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            actors: Vec::new(),
        }
    }

    pub fn with_actor(mut self, id: ActorId, visibility: Visibility) -> Self {
        self.actors.push(SessionActor { id, visibility });
        self
    }

    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: Some(self.start),
            end: Some(self.end),
        }
    }

    /// Ids of actors that are not hidden, in file order.
    pub fn shown_actors(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.actors
            .iter()
            .filter(|a| a.visibility.is_shown())
            .map(|a| a.id)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        Self::read(File::open(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        self.write(File::create(path)?)
    }

    pub fn read<R: Read>(reader: R) -> Result<Self, SessionError> {
        let mut csv = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = csv.records().enumerate().map(|(i, r)| (i + 1, r));

        let mut next_record = |expected: &str| -> Result<(usize, csv::StringRecord), SessionError> {
            match records.next() {
                Some((line, record)) => Ok((line, record?)),
                None => Err(SessionError::Malformed {
                    line: 0,
                    reason: format!("missing {expected} line"),
                }),
            }
        };

        let start = keyed_date(next_record(START_KEY)?, START_KEY)?;
        let end = keyed_date(next_record(END_KEY)?, END_KEY)?;
        let (line, header) = next_record("actor header")?;
        if header.iter().collect::<Vec<_>>() != ACTOR_HEADER {
            return Err(SessionError::Malformed {
                line,
                reason: format!("expected header '{}'", ACTOR_HEADER.join(",")),
            });
        }

        let mut session = Session::new(start, end);
        for (line, record) in records {
            let record = record?;
            let (Some(id), Some(state), None) = (record.get(0), record.get(1), record.get(2)) else {
                return Err(SessionError::Malformed {
                    line,
                    reason: "expected '<actor_id>,<state>'".to_string(),
                });
            };
            let id = id.parse::<ActorId>().map_err(|_| SessionError::Malformed {
                line,
                reason: format!("invalid actor id '{id}'"),
            })?;
            let visibility = state
                .parse::<u8>()
                .ok()
                .and_then(Visibility::from_state)
                .ok_or_else(|| SessionError::UnknownVisibility(state.to_string()))?;
            session.actors.push(SessionActor { id, visibility });
        }
        Ok(session)
    }

    pub fn write<W: Write>(&self, writer: W) -> Result<(), SessionError> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([START_KEY, format_iso_date(self.start).as_str()])?;
        csv.write_record([END_KEY, format_iso_date(self.end).as_str()])?;
        csv.write_record(ACTOR_HEADER)?;
        for actor in &self.actors {
            csv.write_record([actor.id.to_string(), actor.visibility.state().to_string()])?;
        }
        csv.flush()?;
        Ok(())
    }
}

fn keyed_date((line, record): (usize, csv::StringRecord), key: &str) -> Result<NaiveDate, SessionError> {
    match (record.get(0), record.get(1)) {
        (Some(found), Some(raw)) if found == key => Ok(parse_iso_date(raw)?),
        _ => Err(SessionError::Malformed {
            line,
            reason: format!("expected '{key},<yyyy-mm-dd>'"),
        }),
    }
}
