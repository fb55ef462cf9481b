//! Theatres and the halls inside them.

use super::crud::EntityRecord;
use super::error::ValidationError;
use super::registry::Entity;
use crate::libs::validators;
use rusqlite::types::Value;
use rusqlite::Row;

const INSERT_THEATRE: &str = "INSERT INTO theatre (name, city, street, house_number, postal_code) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_THEATRE: &str =
    "UPDATE theatre SET name = ?1, city = ?2, street = ?3, house_number = ?4, postal_code = ?5 WHERE id = ?6";
const SELECT_THEATRE_BY_ID: &str = "SELECT * FROM theatre WHERE id = ?1";

const INSERT_LOCATION: &str = "INSERT INTO location (theatre_id, hall_name, capacity) VALUES (?1, ?2, ?3)";
const UPDATE_LOCATION: &str = "UPDATE location SET theatre_id = ?1, hall_name = ?2, capacity = ?3 WHERE id = ?4";
const SELECT_LOCATION_BY_ID: &str = "SELECT * FROM location WHERE id = ?1";

/// A theatre and its postal address. Address parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theatre {
    pub id: Option<i64>,
    pub name: String,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
}

impl Theatre {
    /// Builds an unsaved theatre with only a name and city. Fill the other
    /// address fields directly when needed.
    pub fn new(name: &str, city: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            city: city.map(String::from),
            ..Self::default()
        }
    }
}

impl EntityRecord for Theatre {
    const ENTITY: Entity = Entity::Theatres;
    const INSERT: &'static str = INSERT_THEATRE;
    const UPDATE: &'static str = UPDATE_THEATRE;
    const SELECT_BY_ID: &'static str = SELECT_THEATRE_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            name: validators::title("name", &self.name)?,
            city: validators::optional_text(self.city.as_deref()),
            street: validators::optional_text(self.street.as_deref()),
            house_number: validators::optional_text(self.house_number.as_deref()),
            postal_code: validators::optional_text(self.postal_code.as_deref()),
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.city.clone().into(),
            self.street.clone().into(),
            self.house_number.clone().into(),
            self.postal_code.clone().into(),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            city: row.get("city")?,
            street: row.get("street")?,
            house_number: row.get("house_number")?,
            postal_code: row.get("postal_code")?,
        })
    }
}

/// A hall inside a theatre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: Option<i64>,
    pub theatre_id: Option<i64>,
    pub hall_name: String,
    pub capacity: Option<i64>,
}

impl Location {
    pub fn new(theatre_id: i64, hall_name: &str, capacity: Option<i64>) -> Self {
        Self {
            id: None,
            theatre_id: Some(theatre_id),
            hall_name: hall_name.to_string(),
            capacity,
        }
    }
}

impl EntityRecord for Location {
    const ENTITY: Entity = Entity::Locations;
    const INSERT: &'static str = INSERT_LOCATION;
    const UPDATE: &'static str = UPDATE_LOCATION;
    const SELECT_BY_ID: &'static str = SELECT_LOCATION_BY_ID;

    fn validate(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            id: self.id,
            theatre_id: Some(validators::reference("theatre_id", self.theatre_id)?),
            hall_name: validators::title("hall_name", &self.hall_name)?,
            capacity: validators::capacity(self.capacity)?,
        })
    }

    fn params(&self) -> Vec<Value> {
        vec![self.theatre_id.into(), self.hall_name.clone().into(), self.capacity.into()]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            theatre_id: row.get("theatre_id")?,
            hall_name: row.get("hall_name")?,
            capacity: row.get("capacity")?,
        })
    }
}
