//! Productions and their scheduled events.
//!
//! Performances and rehearsals share one shape: a timestamp, the hall it
//! takes place in and the production it belongs to. Both references are
//! mandatory.

use super::crud::{date_value, datetime_value, EntityRecord};
use super::error::ValidationError;
use super::registry::Entity;
use crate::libs::validators;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::Row;

const INSERT_PRODUCTION: &str =
    "INSERT INTO production (title, production_date, description, play_id, director_id) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_PRODUCTION: &str =
    "UPDATE production SET title = ?1, production_date = ?2, description = ?3, play_id = ?4, director_id = ?5 WHERE id = ?6";
const SELECT_PRODUCTION_BY_ID: &str = "SELECT * FROM production WHERE id = ?1";

const INSERT_PERFORMANCE: &str = "INSERT INTO performance (datetime, location_id, production_id) VALUES (?1, ?2, ?3)";
const UPDATE_PERFORMANCE: &str = "UPDATE performance SET datetime = ?1, location_id = ?2, production_id = ?3 WHERE id = ?4";
const SELECT_PERFORMANCE_BY_ID: &str = "SELECT * FROM performance WHERE id = ?1";

const INSERT_REHEARSAL: &str = "INSERT INTO rehearsal (datetime, location_id, production_id) VALUES (?1, ?2, ?3)";
const UPDATE_REHEARSAL: &str = "UPDATE rehearsal SET datetime = ?1, location_id = ?2, production_id = ?3 WHERE id = ?4";
const SELECT_REHEARSAL_BY_ID: &str = "SELECT * FROM rehearsal WHERE id = ?1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub id: Option<i64>,
    pub title: String,
    pub production_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub play_id: Option<i64>,
    pub director_id: Option<i64>,
}

impl Production {
    pub fn new(title: &str, play_id: i64, director_id: i64) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            production_date: None,
            description: None,
            play_id: Some(play_id),
            director_id: Some(director_id),
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.production_date = Some(date);
        self
    }
}

impl EntityRecord for Production {
    const ENTITY: Entity = Entity::Productions;
    const INSERT: &'static str = INSERT_PRODUCTION;
    const UPDATE: &'static str = UPDATE_PRODUCTION;
    const SELECT_BY_ID: &'static str = SELECT_PRODUCTION_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            title: validators::title("title", &self.title)?,
            production_date: self.production_date.map(validators::check_date).transpose()?,
            description: self.description.clone(),
            play_id: Some(validators::reference("play_id", self.play_id)?),
            director_id: Some(validators::reference("director_id", self.director_id)?),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            date_value(self.production_date),
            self.description.clone().into(),
            self.play_id.into(),
            self.director_id.into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            production_date: row.get("production_date")?,
            description: row.get("description")?,
            play_id: row.get("play_id")?,
            director_id: row.get("director_id")?,
        })
    }
}

/// Fields shared by performances and rehearsals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Option<i64>,
    pub datetime: NaiveDateTime,
    pub location_id: Option<i64>,
    pub production_id: Option<i64>,
}

impl Session {
    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            datetime: validators::check_datetime(self.datetime)?,
            location_id: Some(validators::reference("location_id", self.location_id)?),
            production_id: Some(validators::reference("production_id", self.production_id)?),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![datetime_value(self.datetime), self.location_id.into(), self.production_id.into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            datetime: row.get("datetime")?,
            location_id: row.get("location_id")?,
            production_id: row.get("production_id")?,
        })
    }
}

/// A public show of a production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Performance(pub Session);

/// A rehearsal of a production; actors attend through `actor_rehearsal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rehearsal(pub Session);

macro_rules! session_record {
    ($name:ident, $entity:expr, $insert:expr, $update:expr, $select:expr) => {
        impl $name {
            pub fn new(datetime: NaiveDateTime, location_id: Option<i64>, production_id: Option<i64>) -> Self {
                Self(Session {
                    id: None,
                    datetime,
                    location_id,
                    production_id,
                })
            }
        }

        impl EntityRecord for $name {
            const ENTITY: Entity = $entity;
            const INSERT: &'static str = $insert;
            const UPDATE: &'static str = $update;
            const SELECT_BY_ID: &'static str = $select;

            fn validate(&self) -> Result<Self, ValidationError> {
                self.0.validate().map(Self)
            }

            fn params(&self) -> Vec<Value> {
                self.0.params()
            }

            fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
                Session::from_row(row).map(Self)
            }
        }
    };
}

session_record!(Performance, Entity::Performances, INSERT_PERFORMANCE, UPDATE_PERFORMANCE, SELECT_PERFORMANCE_BY_ID);
session_record!(Rehearsal, Entity::Rehearsals, INSERT_REHEARSAL, UPDATE_REHEARSAL, SELECT_REHEARSAL_BY_ID);
