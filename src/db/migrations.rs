//! Schema versioning for the theatre database.
//!
//! Migrations are registered in version order and applied inside a single
//! transaction the first time a connection is opened. Applied versions are
//! recorded in the `migrations` table.
//!
//! ## Usage
//!
//! ```rust
//! use curtain::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), curtain::db::error::DbError>(())
//! ```

use super::error::DbResult;
use crate::libs::messages::Message;
use crate::msg_debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

/// Tracking table for applied migrations.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> rusqlite::Result<()>,
}

/// A row of the migration history: version, name and application time.
pub type MigrationRecord = (u32, String, String);

/// Ordered registry of schema migrations.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // People and venues have no outgoing references.
        self.add_migration(1, "create_people_and_venues", |tx| {
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS actor (
                    id INTEGER PRIMARY KEY,
                    full_name TEXT NOT NULL,
                    experience TEXT
                );
                CREATE TABLE IF NOT EXISTS author (
                    id INTEGER PRIMARY KEY,
                    full_name TEXT NOT NULL,
                    biography TEXT
                );
                CREATE TABLE IF NOT EXISTS director (
                    id INTEGER PRIMARY KEY,
                    full_name TEXT NOT NULL,
                    biography TEXT
                );
                CREATE TABLE IF NOT EXISTS theatre (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    city TEXT,
                    street TEXT,
                    house_number TEXT,
                    postal_code TEXT
                );
                CREATE TABLE IF NOT EXISTS location (
                    id INTEGER PRIMARY KEY,
                    theatre_id INTEGER NOT NULL REFERENCES theatre(id) ON DELETE RESTRICT,
                    hall_name TEXT NOT NULL,
                    capacity INTEGER
                );",
            )
        });

        self.add_migration(2, "create_plays_and_productions", |tx| {
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS play (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    genre TEXT,
                    year_written INTEGER,
                    description TEXT
                );
                CREATE TABLE IF NOT EXISTS role (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT,
                    play_id INTEGER REFERENCES play(id) ON DELETE RESTRICT
                );
                CREATE TABLE IF NOT EXISTS production (
                    id INTEGER PRIMARY KEY,
                    title TEXT NOT NULL,
                    production_date DATE,
                    description TEXT,
                    play_id INTEGER NOT NULL REFERENCES play(id) ON DELETE RESTRICT,
                    director_id INTEGER NOT NULL REFERENCES director(id) ON DELETE RESTRICT
                );",
            )
        });

        self.add_migration(3, "create_schedule", |tx| {
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS performance (
                    id INTEGER PRIMARY KEY,
                    datetime DATETIME NOT NULL,
                    location_id INTEGER NOT NULL REFERENCES location(id) ON DELETE RESTRICT,
                    production_id INTEGER NOT NULL REFERENCES production(id) ON DELETE RESTRICT
                );
                CREATE TABLE IF NOT EXISTS rehearsal (
                    id INTEGER PRIMARY KEY,
                    datetime DATETIME NOT NULL,
                    location_id INTEGER NOT NULL REFERENCES location(id) ON DELETE RESTRICT,
                    production_id INTEGER NOT NULL REFERENCES production(id) ON DELETE RESTRICT
                );",
            )
        });

        // Link rows disappear together with either side.
        self.add_migration(4, "create_association_tables", |tx| {
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS actor_production (
                    actor_id INTEGER NOT NULL REFERENCES actor(id) ON DELETE CASCADE,
                    production_id INTEGER NOT NULL REFERENCES production(id) ON DELETE CASCADE,
                    PRIMARY KEY (actor_id, production_id)
                );
                CREATE TABLE IF NOT EXISTS actor_rehearsal (
                    actor_id INTEGER NOT NULL REFERENCES actor(id) ON DELETE CASCADE,
                    rehearsal_id INTEGER NOT NULL REFERENCES rehearsal(id) ON DELETE CASCADE,
                    PRIMARY KEY (actor_id, rehearsal_id)
                );
                CREATE TABLE IF NOT EXISTS actor_role (
                    actor_id INTEGER NOT NULL REFERENCES actor(id) ON DELETE CASCADE,
                    role_id INTEGER NOT NULL REFERENCES role(id) ON DELETE CASCADE,
                    production_id INTEGER NOT NULL REFERENCES production(id) ON DELETE CASCADE,
                    PRIMARY KEY (actor_id, role_id, production_id)
                );
                CREATE TABLE IF NOT EXISTS author_play (
                    author_id INTEGER NOT NULL REFERENCES author(id) ON DELETE CASCADE,
                    play_id INTEGER NOT NULL REFERENCES play(id) ON DELETE CASCADE,
                    PRIMARY KEY (author_id, play_id)
                );",
            )
        });

        self.add_migration(5, "add_lookup_indices", |tx| {
            tx.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_location_theatre ON location(theatre_id);
                CREATE INDEX IF NOT EXISTS idx_role_play ON role(play_id);
                CREATE INDEX IF NOT EXISTS idx_production_play ON production(play_id);
                CREATE INDEX IF NOT EXISTS idx_production_director ON production(director_id);
                CREATE INDEX IF NOT EXISTS idx_performance_datetime ON performance(datetime);
                CREATE INDEX IF NOT EXISTS idx_rehearsal_datetime ON rehearsal(datetime);
                CREATE INDEX IF NOT EXISTS idx_rehearsal_production ON rehearsal(production_id);
                CREATE INDEX IF NOT EXISTS idx_actor_role_production ON actor_role(production_id);
                CREATE INDEX IF NOT EXISTS idx_actor_rehearsal_rehearsal ON actor_rehearsal(rehearsal_id);
                CREATE INDEX IF NOT EXISTS idx_author_play_play ON author_play(play_id);",
            )
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> rusqlite::Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Newest registered schema version.
    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    /// Applies every pending migration in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> DbResult<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));
        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                tracing::error!(version = migration.version, error = %e, "migration failed");
                return Err(e.into());
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
        }

        tx.commit()?;
        tracing::info!(version = self.latest_version(), "database schema migrated");

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> DbResult<u32> {
        if !is_tracked(conn)? {
            return Ok(0);
        }
        let version: Option<u32> = conn
            .query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0))
            .optional()?
            .flatten();

        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> DbResult<bool> {
        if !is_tracked(conn)? {
            return Ok(false);
        }
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations, oldest first. Empty for a database that was
    /// never migrated.
    pub fn get_migration_history(&self, conn: &Connection) -> DbResult<Vec<MigrationRecord>> {
        if !is_tracked(conn)? {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `conn` has the migrations tracking table yet.
fn is_tracked(conn: &Connection) -> DbResult<bool> {
    let tracked: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'migrations')",
        [],
        |row| row.get(0),
    )?;
    Ok(tracked)
}

/// Brings the schema of `conn` to the latest version.
pub fn init_with_migrations(conn: &mut Connection) -> DbResult<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> DbResult<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
