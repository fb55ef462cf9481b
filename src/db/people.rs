//! People records: actors, playwrights and directors.
//!
//! Each type implements [`EntityRecord`], so the generic CRUD methods on
//! [`Db`](super::db::Db) work on it directly. Names are trimmed and checked by
//! [`validators::full_name`]. Experience and biography are stored as given.

use super::crud::EntityRecord;
use super::error::ValidationError;
use super::registry::Entity;
use crate::libs::validators;
use rusqlite::types::Value;
use rusqlite::Row;

const INSERT_ACTOR: &str = "INSERT INTO actor (full_name, experience) VALUES (?1, ?2)";
const UPDATE_ACTOR: &str = "UPDATE actor SET full_name = ?1, experience = ?2 WHERE id = ?3";
const SELECT_ACTOR_BY_ID: &str = "SELECT * FROM actor WHERE id = ?1";

const INSERT_AUTHOR: &str = "INSERT INTO author (full_name, biography) VALUES (?1, ?2)";
const UPDATE_AUTHOR: &str = "UPDATE author SET full_name = ?1, biography = ?2 WHERE id = ?3";
const SELECT_AUTHOR_BY_ID: &str = "SELECT * FROM author WHERE id = ?1";

const INSERT_DIRECTOR: &str = "INSERT INTO director (full_name, biography) VALUES (?1, ?2)";
const UPDATE_DIRECTOR: &str = "UPDATE director SET full_name = ?1, biography = ?2 WHERE id = ?3";
const SELECT_DIRECTOR_BY_ID: &str = "SELECT * FROM director WHERE id = ?1";

/// A member of the acting company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: Option<i64>,
    pub full_name: String,
    /// Free-form description of the actor's stage experience.
    pub experience: Option<String>,
}

impl Actor {
    /// Builds an unsaved actor.
    ///
    /// # Arguments
    ///
    /// * `full_name` - Display name; validation requires at least two characters
    /// * `experience` - Optional free-form notes
    ///
    /// # Example
    ///
    /// ```rust
    /// use curtain::db::people::Actor;
    ///
    /// let actor = Actor::new("Anna Ray", Some("Ten seasons at the Globe"));
    /// assert!(actor.id.is_none());
    /// ```
    pub fn new(full_name: &str, experience: Option<&str>) -> Self {
        Self {
            id: None,
            full_name: full_name.to_string(),
            experience: experience.map(String::from),
        }
    }
}

impl EntityRecord for Actor {
    const ENTITY: Entity = Entity::Actors;
    const INSERT: &'static str = INSERT_ACTOR;
    const UPDATE: &'static str = UPDATE_ACTOR;
    const SELECT_BY_ID: &'static str = SELECT_ACTOR_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            full_name: validators::full_name("full_name", &self.full_name)?,
            experience: self.experience.clone(),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![self.full_name.clone().into(), self.experience.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            experience: row.get("experience")?,
        })
    }
}

/// A playwright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Option<i64>,
    pub full_name: String,
    pub biography: Option<String>,
}

impl Author {
    pub fn new(full_name: &str, biography: Option<&str>) -> Self {
        Self {
            id: None,
            full_name: full_name.to_string(),
            biography: biography.map(String::from),
        }
    }
}

impl EntityRecord for Author {
    const ENTITY: Entity = Entity::Authors;
    const INSERT: &'static str = INSERT_AUTHOR;
    const UPDATE: &'static str = UPDATE_AUTHOR;
    const SELECT_BY_ID: &'static str = SELECT_AUTHOR_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            full_name: validators::full_name("full_name", &self.full_name)?,
            biography: self.biography.clone(),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![self.full_name.clone().into(), self.biography.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            biography: row.get("biography")?,
        })
    }
}

/// Directs productions. Shares the author's shape but lives in its own table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Director {
    pub id: Option<i64>,
    pub full_name: String,
    pub biography: Option<String>,
}

impl Director {
    pub fn new(full_name: &str, biography: Option<&str>) -> Self {
        Self {
            id: None,
            full_name: full_name.to_string(),
            biography: biography.map(String::from),
        }
    }
}

impl EntityRecord for Director {
    const ENTITY: Entity = Entity::Directors;
    const INSERT: &'static str = INSERT_DIRECTOR;
    const UPDATE: &'static str = UPDATE_DIRECTOR;
    const SELECT_BY_ID: &'static str = SELECT_DIRECTOR_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            full_name: validators::full_name("full_name", &self.full_name)?,
            biography: self.biography.clone(),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![self.full_name.clone().into(), self.biography.clone().into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            full_name: row.get("full_name")?,
            biography: row.get("biography")?,
        })
    }
}
