//! Form model for entering and editing records.
//!
//! Every entity has a fixed list of fields. Input arrives as raw strings
//! (typed at a prompt, or taken from an existing record for editing), is
//! checked field by field, and only then turned into the typed record that
//! the data layer stores. All failures are reported together so the user can
//! fix a form in one pass.

use crate::db::db::Db;
use crate::db::error::{DbResult, ValidationError};
use crate::db::people::{Actor, Author, Director};
use crate::db::plays::{Play, Role};
use crate::db::productions::{Performance, Production, Rehearsal};
use crate::db::record::Record;
use crate::db::registry::Entity;
use crate::db::venues::{Location, Theatre};
use crate::libs::validators;
use std::collections::HashMap;
use thiserror::Error;

/// Raw form input keyed by field name.
pub type FormValues = HashMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    FullName,
    Title,
    Text,
    Year,
    Date,
    DateTime,
    Capacity,
    /// Id of a record of the given entity.
    Reference(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, required: bool, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            required,
            kind,
        }
    }

    pub fn check(&self, value: &str) -> Result<(), ValidationError> {
        let value = value.trim();
        if value.is_empty() {
            return if self.required {
                Err(ValidationError::Required { field: self.name })
            } else {
                Ok(())
            };
        }

        match self.kind {
            FieldKind::FullName => validators::full_name(self.name, value).map(drop),
            FieldKind::Title => validators::title(self.name, value).map(drop),
            FieldKind::Text => Ok(()),
            FieldKind::Year => validators::parse_year(value).map(drop),
            FieldKind::Date => validators::date(value).map(drop),
            FieldKind::DateTime => validators::datetime(value).map(drop),
            FieldKind::Capacity => validators::parse_capacity(value).map(drop),
            FieldKind::Reference(_) => validators::parse_reference(self.name, value).map(drop),
        }
    }
}

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{label}: {error}")]
pub struct FieldError {
    pub field: &'static str,
    pub label: &'static str,
    pub error: ValidationError,
}

use FieldKind::*;

const PERSON_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new("full_name", "Full name", true, FullName),
    FieldSpec::new("biography", "Biography", false, Text),
];
const ACTOR_FIELDS: [FieldSpec; 2] = [
    FieldSpec::new("full_name", "Full name", true, FullName),
    FieldSpec::new("experience", "Experience", false, Text),
];
const PLAY_FIELDS: [FieldSpec; 4] = [
    FieldSpec::new("title", "Title", true, Title),
    FieldSpec::new("genre", "Genre", false, Text),
    FieldSpec::new("year_written", "Year written", false, Year),
    FieldSpec::new("description", "Description", false, Text),
];
const ROLE_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("title", "Title", true, Title),
    FieldSpec::new("description", "Description", false, Text),
    FieldSpec::new("play_id", "Play", true, Reference(Entity::Plays)),
];
const PRODUCTION_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("title", "Title", true, Title),
    FieldSpec::new("production_date", "Premiere date", false, Date),
    FieldSpec::new("description", "Description", false, Text),
    FieldSpec::new("play_id", "Play", true, Reference(Entity::Plays)),
    FieldSpec::new("director_id", "Director", true, Reference(Entity::Directors)),
];
const SESSION_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("datetime", "Date and time", true, DateTime),
    FieldSpec::new("location_id", "Location", true, Reference(Entity::Locations)),
    FieldSpec::new("production_id", "Production", true, Reference(Entity::Productions)),
];
const THEATRE_FIELDS: [FieldSpec; 5] = [
    FieldSpec::new("name", "Name", true, Title),
    FieldSpec::new("city", "City", false, Text),
    FieldSpec::new("street", "Street", false, Text),
    FieldSpec::new("house_number", "House number", false, Text),
    FieldSpec::new("postal_code", "Postal code", false, Text),
];
const LOCATION_FIELDS: [FieldSpec; 3] = [
    FieldSpec::new("theatre_id", "Theatre", true, Reference(Entity::Theatres)),
    FieldSpec::new("hall_name", "Hall", true, Title),
    FieldSpec::new("capacity", "Capacity", false, Capacity),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormModel {
    pub entity: Entity,
    fields: &'static [FieldSpec],
}

impl FormModel {
    pub fn for_entity(entity: Entity) -> Self {
        let fields: &'static [FieldSpec] = match entity {
            Entity::Actors => &ACTOR_FIELDS,
            Entity::Authors | Entity::Directors => &PERSON_FIELDS,
            Entity::Plays => &PLAY_FIELDS,
            Entity::Roles => &ROLE_FIELDS,
            Entity::Productions => &PRODUCTION_FIELDS,
            Entity::Performances | Entity::Rehearsals => &SESSION_FIELDS,
            Entity::Theatres => &THEATRE_FIELDS,
            Entity::Locations => &LOCATION_FIELDS,
        };
        Self { entity, fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Checks every field; missing keys count as empty input.
    pub fn validate_all(&self, values: &FormValues) -> Result<(), Vec<FieldError>> {
        let errors: Vec<FieldError> = self
            .fields
            .iter()
            .filter_map(|field| {
                let value = values.get(field.name).map(String::as_str).unwrap_or("");
                field.check(value).err().map(|error| FieldError {
                    field: field.name,
                    label: field.label,
                    error,
                })
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Prefills the form from a stored record. NULL columns become empty.
    pub fn values_from(&self, record: &Record) -> FormValues {
        self.fields
            .iter()
            .map(|field| (field.name.to_string(), record.display(field.name)))
            .collect()
    }
}

/// A typed record built from a validated form.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityInput {
    Actor(Actor),
    Author(Author),
    Director(Director),
    Play(Play),
    Role(Role),
    Production(Production),
    Performance(Performance),
    Rehearsal(Rehearsal),
    Theatre(Theatre),
    Location(Location),
}

struct Fields<'a> {
    model: FormModel,
    values: &'a FormValues,
}

impl Fields<'_> {
    fn raw(&self, name: &str) -> &str {
        self.values.get(name).map(|value| value.trim()).unwrap_or("")
    }

    fn text(&self, name: &str) -> String {
        self.raw(name).to_string()
    }

    fn optional(&self, name: &str) -> Option<String> {
        validators::optional_text(Some(self.raw(name)))
    }

    fn wrap<T>(&self, name: &'static str, result: Result<T, ValidationError>) -> Result<T, Vec<FieldError>> {
        result.map_err(|error| {
            vec![FieldError {
                field: name,
                label: self.model.field(name).map(|field| field.label).unwrap_or(name),
                error,
            }]
        })
    }

    fn reference(&self, name: &'static str) -> Result<Option<i64>, Vec<FieldError>> {
        self.wrap(name, validators::parse_reference(name, self.raw(name)).map(Some))
    }
}

impl EntityInput {
    pub fn from_form(entity: Entity, values: &FormValues) -> Result<Self, Vec<FieldError>> {
        let model = FormModel::for_entity(entity);
        model.validate_all(values)?;
        let fields = Fields { model, values };

        let input = match entity {
            Entity::Actors => EntityInput::Actor(Actor {
                id: None,
                full_name: fields.text("full_name"),
                experience: fields.optional("experience"),
            }),
            Entity::Authors => EntityInput::Author(Author {
                id: None,
                full_name: fields.text("full_name"),
                biography: fields.optional("biography"),
            }),
            Entity::Directors => EntityInput::Director(Director {
                id: None,
                full_name: fields.text("full_name"),
                biography: fields.optional("biography"),
            }),
            Entity::Plays => EntityInput::Play(Play {
                id: None,
                title: fields.text("title"),
                genre: fields.optional("genre"),
                year_written: fields.wrap("year_written", validators::parse_year(fields.raw("year_written")))?,
                description: fields.optional("description"),
            }),
            Entity::Roles => EntityInput::Role(Role {
                id: None,
                title: fields.text("title"),
                description: fields.optional("description"),
                play_id: fields.reference("play_id")?,
            }),
            Entity::Productions => EntityInput::Production(Production {
                id: None,
                title: fields.text("title"),
                production_date: fields.wrap("production_date", validators::date(fields.raw("production_date")))?,
                description: fields.optional("description"),
                play_id: fields.reference("play_id")?,
                director_id: fields.reference("director_id")?,
            }),
            Entity::Performances | Entity::Rehearsals => {
                let datetime = fields.wrap("datetime", validators::datetime(fields.raw("datetime")))?;
                let location_id = fields.reference("location_id")?;
                let production_id = fields.reference("production_id")?;
                if entity == Entity::Performances {
                    EntityInput::Performance(Performance::new(datetime, location_id, production_id))
                } else {
                    EntityInput::Rehearsal(Rehearsal::new(datetime, location_id, production_id))
                }
            }
            Entity::Theatres => EntityInput::Theatre(Theatre {
                id: None,
                name: fields.text("name"),
                city: fields.optional("city"),
                street: fields.optional("street"),
                house_number: fields.optional("house_number"),
                postal_code: fields.optional("postal_code"),
            }),
            Entity::Locations => EntityInput::Location(Location {
                id: None,
                theatre_id: fields.reference("theatre_id")?,
                hall_name: fields.text("hall_name"),
                capacity: fields.wrap("capacity", validators::parse_capacity(fields.raw("capacity")))?,
            }),
        };
        Ok(input)
    }

    pub fn entity(&self) -> Entity {
        match self {
            EntityInput::Actor(_) => Entity::Actors,
            EntityInput::Author(_) => Entity::Authors,
            EntityInput::Director(_) => Entity::Directors,
            EntityInput::Play(_) => Entity::Plays,
            EntityInput::Role(_) => Entity::Roles,
            EntityInput::Production(_) => Entity::Productions,
            EntityInput::Performance(_) => Entity::Performances,
            EntityInput::Rehearsal(_) => Entity::Rehearsals,
            EntityInput::Theatre(_) => Entity::Theatres,
            EntityInput::Location(_) => Entity::Locations,
        }
    }

    pub async fn add(&self, db: &Db) -> DbResult<i64> {
        match self {
            EntityInput::Actor(record) => db.add(record).await,
            EntityInput::Author(record) => db.add(record).await,
            EntityInput::Director(record) => db.add(record).await,
            EntityInput::Play(record) => db.add(record).await,
            EntityInput::Role(record) => db.add(record).await,
            EntityInput::Production(record) => db.add(record).await,
            EntityInput::Performance(record) => db.add(record).await,
            EntityInput::Rehearsal(record) => db.add(record).await,
            EntityInput::Theatre(record) => db.add(record).await,
            EntityInput::Location(record) => db.add(record).await,
        }
    }

    pub async fn update(&self, db: &Db, id: i64) -> DbResult<()> {
        match self {
            EntityInput::Actor(record) => db.update(id, record).await,
            EntityInput::Author(record) => db.update(id, record).await,
            EntityInput::Director(record) => db.update(id, record).await,
            EntityInput::Play(record) => db.update(id, record).await,
            EntityInput::Role(record) => db.update(id, record).await,
            EntityInput::Production(record) => db.update(id, record).await,
            EntityInput::Performance(record) => db.update(id, record).await,
            EntityInput::Rehearsal(record) => db.update(id, record).await,
            EntityInput::Theatre(record) => db.update(id, record).await,
            EntityInput::Location(record) => db.update(id, record).await,
        }
    }
}
