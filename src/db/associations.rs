//! Many-to-many links between entities.
//!
//! The replace operations swap the whole link set owned by one record in a
//! single transaction: the old rows are deleted and the new ones inserted,
//! or, on any failure, nothing changes at all. Single-link helpers add or
//! remove one row at a time; adding an existing link is a no-op.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use curtain::db::associations::CastAssignment;
//! use curtain::db::db::Db;
//!
//! # async fn run(db: Db) -> curtain::db::error::DbResult<()> {
//! let cast = [CastAssignment::new(1, 10), CastAssignment::new(2, 11)];
//! db.set_production_cast(7, &cast).await?;
//! assert_eq!(db.production_cast(7).await?.len(), 2);
//! # Ok(())
//! # }
//! ```

use super::db::Db;
use super::error::DbResult;
use super::record::RecordSet;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use std::collections::HashSet;

const SELECT_CAST_FOR_PRODUCTION: &str = "
    SELECT a.id AS actor_id, a.full_name AS actor_name,
           r.id AS role_id, r.title AS role_name
    FROM actor_role ar
    JOIN actor a ON ar.actor_id = a.id
    JOIN role r ON ar.role_id = r.id
    WHERE ar.production_id = ?1
    ORDER BY a.full_name, r.title
";
const SELECT_ACTORS_FOR_PRODUCTION: &str = "
    SELECT a.* FROM actor a
    JOIN actor_production ap ON a.id = ap.actor_id
    WHERE ap.production_id = ?1
    ORDER BY a.full_name
";
const SELECT_ACTORS_FOR_REHEARSAL: &str = "
    SELECT a.* FROM actor a
    JOIN actor_rehearsal ar ON a.id = ar.actor_id
    WHERE ar.rehearsal_id = ?1
    ORDER BY a.full_name
";
const SELECT_AUTHORS_FOR_PLAY: &str = "
    SELECT a.id, a.full_name
    FROM author_play ap
    JOIN author a ON ap.author_id = a.id
    WHERE ap.play_id = ?1
    ORDER BY a.full_name
";
const SELECT_PLAYS_FOR_AUTHOR: &str = "
    SELECT p.* FROM play p
    JOIN author_play ap ON p.id = ap.play_id
    WHERE ap.author_id = ?1
    ORDER BY p.title
";
const SELECT_ROLES_FOR_PLAY: &str = "SELECT id, title FROM role WHERE play_id = ?1 ORDER BY title";
const SELECT_ACTOR_ROLES: &str = "
    SELECT ar.actor_id, ar.role_id, ar.production_id,
           r.title AS role_name, r.description AS role_description,
           p.title AS production_title, p.production_date,
           pl.title AS play_title
    FROM actor_role ar
    JOIN role r ON ar.role_id = r.id
    JOIN production p ON ar.production_id = p.id
    JOIN play pl ON p.play_id = pl.id
    WHERE ar.actor_id = ?1
    ORDER BY p.production_date DESC, r.title
";
const SELECT_ACTOR_REHEARSALS: &str = "
    SELECT r.id AS rehearsal_id, r.datetime, r.production_id,
           p.title AS production_title,
           l.hall_name, l.capacity,
           t.name AS theatre_name, t.city, t.street, t.house_number
    FROM actor_rehearsal ar
    JOIN rehearsal r ON ar.rehearsal_id = r.id
    JOIN production p ON r.production_id = p.id
    JOIN location l ON r.location_id = l.id
    JOIN theatre t ON l.theatre_id = t.id
    WHERE ar.actor_id = ?1
    ORDER BY r.datetime DESC
";
const SELECT_ACTOR_PRODUCTIONS: &str = "
    SELECT p.id AS production_id, p.title, p.production_date, p.description,
           pl.title AS play_title, pl.genre,
           d.full_name AS director_name
    FROM actor_production ap
    JOIN production p ON ap.production_id = p.id
    JOIN play pl ON p.play_id = pl.id
    JOIN director d ON p.director_id = d.id
    WHERE ap.actor_id = ?1
    ORDER BY p.production_date DESC
";
const INSERT_ACTOR_PRODUCTION: &str = "INSERT OR IGNORE INTO actor_production (actor_id, production_id) VALUES (?1, ?2)";
const DELETE_ACTOR_PRODUCTION: &str = "DELETE FROM actor_production WHERE actor_id = ?1 AND production_id = ?2";
const INSERT_ACTOR_ROLE: &str = "INSERT OR IGNORE INTO actor_role (actor_id, role_id, production_id) VALUES (?1, ?2, ?3)";
const DELETE_ACTOR_ROLE: &str = "DELETE FROM actor_role WHERE actor_id = ?1 AND role_id = ?2 AND production_id = ?3";
const INSERT_ACTOR_REHEARSAL: &str = "INSERT OR IGNORE INTO actor_rehearsal (actor_id, rehearsal_id) VALUES (?1, ?2)";
const DELETE_ACTOR_REHEARSAL: &str = "DELETE FROM actor_rehearsal WHERE actor_id = ?1 AND rehearsal_id = ?2";

/// An association table seen from one owning side.
#[derive(Debug)]
pub struct LinkTable {
    /// Name reported when a replacement is rolled back.
    pub operation: &'static str,
    pub table: &'static str,
    pub owner_column: &'static str,
    /// Columns supplied per row, in order. The owner id is added on insert.
    pub member_columns: &'static [&'static str],
}

impl LinkTable {
    fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE {} = ?", self.table, self.owner_column)
    }

    fn insert_sql(&self) -> String {
        let placeholders = vec!["?"; self.member_columns.len() + 1].join(", ");
        format!(
            "INSERT INTO {} ({}, {}) VALUES ({})",
            self.table,
            self.member_columns.join(", "),
            self.owner_column,
            placeholders
        )
    }

    fn select_sql(&self) -> String {
        let members = self.member_columns.join(", ");
        format!(
            "SELECT {members} FROM {} WHERE {} = ? ORDER BY {members}",
            self.table, self.owner_column
        )
    }
}

/// Cast of a production: (actor, role) pairs.
pub const PRODUCTION_CAST: LinkTable = LinkTable {
    operation: "set_production_cast",
    table: "actor_role",
    owner_column: "production_id",
    member_columns: &["actor_id", "role_id"],
};

pub const REHEARSAL_ACTORS: LinkTable = LinkTable {
    operation: "set_rehearsal_actors",
    table: "actor_rehearsal",
    owner_column: "rehearsal_id",
    member_columns: &["actor_id"],
};

pub const PLAY_AUTHORS: LinkTable = LinkTable {
    operation: "set_play_authors",
    table: "author_play",
    owner_column: "play_id",
    member_columns: &["author_id"],
};

pub const AUTHOR_PLAYS: LinkTable = LinkTable {
    operation: "set_author_plays",
    table: "author_play",
    owner_column: "author_id",
    member_columns: &["play_id"],
};

/// One actor playing one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CastAssignment {
    pub actor_id: i64,
    pub role_id: i64,
}

impl CastAssignment {
    pub fn new(actor_id: i64, role_id: i64) -> Self {
        Self { actor_id, role_id }
    }
}

fn single_members(ids: &[i64]) -> Vec<Vec<i64>> {
    ids.iter().map(|id| vec![*id]).collect()
}

fn ids(value: i64) -> [Value; 1] {
    [Value::Integer(value)]
}

fn integer_values(values: &[Value]) -> Vec<i64> {
    values
        .iter()
        .filter_map(|value| match value {
            Value::Integer(id) => Some(*id),
            _ => None,
        })
        .collect()
}

impl Db {
    /// Replaces every link owned by `owner_id` with `rows` atomically.
    /// Duplicate rows are stored once. Returns the number of rows written.
    pub async fn replace_associations(&self, link: &LinkTable, owner_id: i64, rows: &[Vec<i64>]) -> DbResult<usize> {
        let mut seen = HashSet::new();
        let unique: Vec<&Vec<i64>> = rows.iter().filter(|row| seen.insert(row.as_slice())).collect();
        let delete_sql = link.delete_sql();
        let insert_sql = link.insert_sql();

        let written = self
            .transaction(link.operation, |tx| {
                tx.execute(&delete_sql, [owner_id])?;
                if !unique.is_empty() {
                    let mut stmt = tx.prepare_cached(&insert_sql)?;
                    for row in &unique {
                        stmt.execute(params_from_iter(row.iter().chain(std::iter::once(&owner_id))))?;
                    }
                }
                Ok(unique.len())
            })
            .await?;

        tracing::info!(operation = link.operation, owner_id, rows = written, "associations replaced");
        Ok(written)
    }

    /// Member tuples currently linked to `owner_id`, sorted.
    pub async fn association_rows(&self, link: &LinkTable, owner_id: i64) -> DbResult<Vec<Vec<i64>>> {
        let sql = link.select_sql();
        let rows = self.query(&sql, &ids(owner_id), false).await?;
        Ok(rows.iter().map(|record| integer_values(record.values())).collect())
    }

    /// Replaces the whole cast of a production.
    ///
    /// # Arguments
    ///
    /// * `production_id` - The production that owns the cast
    /// * `cast` - The new cast; an empty slice removes every assignment
    ///
    /// # Errors
    ///
    /// [`DbError::RolledBack`](super::error::DbError::RolledBack) when any
    /// actor or role does not exist. The previous cast is kept in that case.
    pub async fn set_production_cast(&self, production_id: i64, cast: &[CastAssignment]) -> DbResult<usize> {
        let rows: Vec<Vec<i64>> = cast.iter().map(|c| vec![c.actor_id, c.role_id]).collect();
        self.replace_associations(&PRODUCTION_CAST, production_id, &rows).await
    }

    /// Replaces the actors called to a rehearsal.
    pub async fn set_rehearsal_actors(&self, rehearsal_id: i64, actor_ids: &[i64]) -> DbResult<usize> {
        self.replace_associations(&REHEARSAL_ACTORS, rehearsal_id, &single_members(actor_ids)).await
    }

    pub async fn set_play_authors(&self, play_id: i64, author_ids: &[i64]) -> DbResult<usize> {
        self.replace_associations(&PLAY_AUTHORS, play_id, &single_members(author_ids)).await
    }

    /// The inverse of [`Db::set_play_authors`], seen from the author.
    pub async fn set_author_plays(&self, author_id: i64, play_ids: &[i64]) -> DbResult<usize> {
        self.replace_associations(&AUTHOR_PLAYS, author_id, &single_members(play_ids)).await
    }

    /// Cast of a production as typed pairs, sorted by actor then role.
    pub async fn production_cast(&self, production_id: i64) -> DbResult<Vec<CastAssignment>> {
        let rows = self.association_rows(&PRODUCTION_CAST, production_id).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [actor_id, role_id] => Some(CastAssignment::new(*actor_id, *role_id)),
                _ => None,
            })
            .collect())
    }

    /// Cast with actor and role names.
    pub async fn cast_for_production(&self, production_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_CAST_FOR_PRODUCTION, &ids(production_id), false).await
    }

    pub async fn actors_for_production(&self, production_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_ACTORS_FOR_PRODUCTION, &ids(production_id), false).await
    }

    pub async fn actors_for_rehearsal(&self, rehearsal_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_ACTORS_FOR_REHEARSAL, &ids(rehearsal_id), false).await
    }

    pub async fn authors_for_play(&self, play_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_AUTHORS_FOR_PLAY, &ids(play_id), false).await
    }

    pub async fn plays_for_author(&self, author_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_PLAYS_FOR_AUTHOR, &ids(author_id), false).await
    }

    pub async fn roles_for_play(&self, play_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_ROLES_FOR_PLAY, &ids(play_id), false).await
    }

    /// Every role an actor has been cast in, newest production first.
    pub async fn actor_roles(&self, actor_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_ACTOR_ROLES, &ids(actor_id), false).await
    }

    pub async fn actor_rehearsals(&self, actor_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_ACTOR_REHEARSALS, &ids(actor_id), false).await
    }

    pub async fn actor_productions(&self, actor_id: i64) -> DbResult<RecordSet> {
        self.query(SELECT_ACTOR_PRODUCTIONS, &ids(actor_id), false).await
    }

    /// Links one actor to a production. Linking twice is a no-op.
    pub async fn add_actor_to_production(&self, actor_id: i64, production_id: i64) -> DbResult<()> {
        self.execute(INSERT_ACTOR_PRODUCTION, &[actor_id.into(), production_id.into()]).await?;
        Ok(())
    }

    pub async fn remove_actor_from_production(&self, actor_id: i64, production_id: i64) -> DbResult<()> {
        self.execute(DELETE_ACTOR_PRODUCTION, &[actor_id.into(), production_id.into()]).await?;
        Ok(())
    }

    /// Casts an actor in one role for one production, keeping other links.
    pub async fn add_actor_role(&self, actor_id: i64, role_id: i64, production_id: i64) -> DbResult<()> {
        self.execute(INSERT_ACTOR_ROLE, &[actor_id.into(), role_id.into(), production_id.into()]).await?;
        Ok(())
    }

    pub async fn remove_actor_role(&self, actor_id: i64, role_id: i64, production_id: i64) -> DbResult<()> {
        self.execute(DELETE_ACTOR_ROLE, &[actor_id.into(), role_id.into(), production_id.into()]).await?;
        Ok(())
    }

    pub async fn add_actor_to_rehearsal(&self, actor_id: i64, rehearsal_id: i64) -> DbResult<()> {
        self.execute(INSERT_ACTOR_REHEARSAL, &[actor_id.into(), rehearsal_id.into()]).await?;
        Ok(())
    }

    pub async fn remove_actor_from_rehearsal(&self, actor_id: i64, rehearsal_id: i64) -> DbResult<()> {
        self.execute(DELETE_ACTOR_REHEARSAL, &[actor_id.into(), rehearsal_id.into()]).await?;
        Ok(())
    }
}
