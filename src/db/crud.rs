//! Generic single-row mutations.
//!
//! Each entity record type knows its SQL, how to bind itself and how to check
//! its own fields. [`Db::add`], [`Db::update`], [`Db::delete`] and
//! [`Db::get`] drive any of them: validation always runs first, so a bad
//! value never reaches the store.

use super::db::Db;
use super::error::{DbError, DbResult, ValidationError};
use super::query::compose_by_id;
use super::record::Record;
use super::registry::Entity;
use crate::libs::validators::{DATETIME_FORMAT, DATE_FORMAT};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::Row;

/// A typed row of one of the ten entity tables.
pub trait EntityRecord: Sized {
    const ENTITY: Entity;
    /// INSERT with one placeholder per bound field.
    const INSERT: &'static str;
    /// UPDATE binding the fields first and the id last.
    const UPDATE: &'static str;
    const SELECT_BY_ID: &'static str;

    /// Checks every field and returns the normalised record.
    fn validate(&self) -> Result<Self, ValidationError>;

    /// Field values in the order of `INSERT`/`UPDATE` placeholders.
    fn params(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub(crate) fn date_value(value: Option<NaiveDate>) -> Value {
    match value {
        Some(date) => Value::Text(date.format(DATE_FORMAT).to_string()),
        None => Value::Null,
    }
}

pub(crate) fn datetime_value(value: NaiveDateTime) -> Value {
    Value::Text(value.format(DATETIME_FORMAT).to_string())
}

impl Db {
    /// Validates and inserts `record`, returning the new id.
    pub async fn add<T: EntityRecord>(&self, record: &T) -> DbResult<i64> {
        let clean = record.validate()?;
        let id = self.insert(T::INSERT, &clean.params()).await?;
        tracing::info!(entity = %T::ENTITY, id, "record added");
        Ok(id)
    }

    /// Validates `record` and overwrites row `id` with it.
    pub async fn update<T: EntityRecord>(&self, id: i64, record: &T) -> DbResult<()> {
        let clean = record.validate()?;
        let mut params = clean.params();
        params.push(Value::Integer(id));

        let affected = self.execute(T::UPDATE, &params).await?;
        if affected == 0 {
            return Err(DbError::NotFound {
                entity: T::ENTITY.name(),
                id,
            });
        }
        tracing::info!(entity = %T::ENTITY, id, "record updated");
        Ok(())
    }

    /// Removes row `id`. Rows still referenced by other entities are
    /// refused with [`DbError::Integrity`].
    pub async fn delete(&self, entity: Entity, id: i64) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", entity.table());
        let affected = self.execute(&sql, &[Value::Integer(id)]).await?;
        if affected == 0 {
            return Err(DbError::NotFound { entity: entity.name(), id });
        }
        tracing::info!(%entity, id, "record deleted");
        Ok(())
    }

    pub async fn get<T: EntityRecord>(&self, id: i64) -> DbResult<Option<T>> {
        let rows = self.query_map(T::SELECT_BY_ID, &[Value::Integer(id)], T::from_row).await?;
        Ok(rows.into_iter().next())
    }

    /// Row `id` of `entity` as listed, including joined display columns.
    pub async fn get_record(&self, entity: Entity, id: i64) -> DbResult<Option<Record>> {
        let query = compose_by_id(entity.config(), id);
        let rows = self.query(&query.sql, &query.params, false).await?;
        Ok(rows.records().first().cloned())
    }
}
