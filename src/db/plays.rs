//! Plays and the roles written into them.
//!
//! A [`Role`] always belongs to one play; deleting a play that still has
//! roles is refused by the store.

use super::crud::EntityRecord;
use super::error::ValidationError;
use super::registry::Entity;
use crate::libs::validators;
use rusqlite::types::Value;
use rusqlite::Row;

const INSERT_PLAY: &str = "INSERT INTO play (title, genre, year_written, description) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_PLAY: &str = "UPDATE play SET title = ?1, genre = ?2, year_written = ?3, description = ?4 WHERE id = ?5";
const SELECT_PLAY_BY_ID: &str = "SELECT * FROM play WHERE id = ?1";

const INSERT_ROLE: &str = "INSERT INTO role (title, description, play_id) VALUES (?1, ?2, ?3)";
const UPDATE_ROLE: &str = "UPDATE role SET title = ?1, description = ?2, play_id = ?3 WHERE id = ?4";
const SELECT_ROLE_BY_ID: &str = "SELECT * FROM role WHERE id = ?1";

/// A written play, independent of any staging of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    pub id: Option<i64>,
    pub title: String,
    pub genre: Option<String>,
    pub year_written: Option<i32>,
    pub description: Option<String>,
}

impl Play {
    pub fn new(title: &str, genre: Option<&str>, year_written: Option<i32>) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            genre: genre.map(String::from),
            year_written,
            description: None,
        }
    }

    /// Sets the synopsis.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl EntityRecord for Play {
    const ENTITY: Entity = Entity::Plays;
    const INSERT: &'static str = INSERT_PLAY;
    const UPDATE: &'static str = UPDATE_PLAY;
    const SELECT_BY_ID: &'static str = SELECT_PLAY_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            title: validators::title("title", &self.title)?,
            genre: validators::optional_text(self.genre.as_deref()),
            year_written: validators::year(self.year_written)?,
            description: self.description.clone(),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![
            self.title.clone().into(),
            self.genre.clone().into(),
            self.year_written.into(),
            self.description.clone().into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            genre: row.get("genre")?,
            year_written: row.get("year_written")?,
            description: row.get("description")?,
        })
    }
}

/// A character in a play, cast per production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub play_id: Option<i64>,
}

impl Role {
    pub fn new(title: &str, play_id: i64) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            description: None,
            play_id: Some(play_id),
        }
    }
}

impl EntityRecord for Role {
    const ENTITY: Entity = Entity::Roles;
    const INSERT: &'static str = INSERT_ROLE;
    const UPDATE: &'static str = UPDATE_ROLE;
    const SELECT_BY_ID: &'static str = SELECT_ROLE_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            title: validators::title("title", &self.title)?,
            description: self.description.clone(),
            play_id: Some(validators::reference("play_id", self.play_id)?),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![self.title.clone().into(), self.description.clone().into(), self.play_id.into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            play_id: row.get("play_id")?,
        })
    }
}
