//! Data-access layer for curtain.
//!
//! Everything goes through one [`db::Db`] handle: a single SQLite connection
//! guarded by an async mutex, with retry on transient lock errors. On top of
//! it sit
//!
//! - the table registry ([`registry`]) declaring how each of the ten logical
//!   entities is selected, sorted and searched,
//! - the query composer ([`query`]) building parameterised list and search
//!   statements from that registry,
//! - typed single-row mutations ([`crud`] and the entity modules),
//! - transactional replacement of many-to-many links ([`associations`]),
//! - dashboard and report statistics ([`stats`]).
//!
//! ## Usage
//!
//! ```rust
//! use curtain::db::db::Db;
//! use curtain::db::query::ListOptions;
//! use curtain::db::registry::Entity;
//! use curtain::db::venues::Theatre;
//!
//! # #[tokio::main]
//! # async fn main() -> curtain::db::error::DbResult<()> {
//! let db = Db::open_in_memory()?;
//! db.add(&Theatre::new("Globe", Some("London"))).await?;
//!
//! let theatres = db.list(Entity::Theatres, &ListOptions::sorted_by("city", false)).await?;
//! assert_eq!(theatres.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod associations;
pub mod crud;
pub mod db;
pub mod error;
pub mod migrations;
pub mod people;
pub mod plays;
pub mod productions;
pub mod query;
pub mod record;
pub mod registry;
pub mod stats;
pub mod venues;
