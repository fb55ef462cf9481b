//! Table registry: the fixed set of logical entities and how each one is
//! selected, sorted and searched.
//!
//! Caller-supplied sort columns and search requests never reach SQL as raw
//! identifiers. Each entity declares an allow-list of orderable columns
//! (logical name to physical expression) and the expressions eligible for
//! free-text matching; anything outside that list falls back to the entity's
//! default sort column.
//!
//! ## Usage
//!
//! ```rust
//! use curtain::db::registry::{table_config, Entity};
//!
//! let config = Entity::Theatres.config();
//! assert_eq!(config.resolve_sort(Some("city")), "t.city");
//! assert_eq!(config.resolve_sort(Some("1; DROP TABLE theatre")), "t.name");
//! assert!(table_config("ghosts").is_err());
//! ```

use super::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declaration of one logical entity's SQL source and column allow-lists.
#[derive(Debug)]
pub struct TableConfig {
    /// Aliased base table, e.g. `theatre t`.
    pub from: &'static str,
    /// Select list, including denormalised parent display fields.
    pub select: &'static str,
    /// Join clause surfacing parent names, if any.
    pub joins: Option<&'static str>,
    /// Logical column name to physical sort expression.
    pub orderable: &'static [(&'static str, &'static str)],
    /// Logical column used when the requested one is absent or not allowed.
    pub default_sort: &'static str,
    /// Expressions matched by free-text search.
    pub searchable: &'static [&'static str],
}

impl TableConfig {
    /// Physical expression for `column`, or for the default sort column when
    /// `column` is `None` or not in the allow-list.
    pub fn resolve_sort(&self, column: Option<&str>) -> &'static str {
        let requested = column.and_then(|name| self.orderable_expr(name));
        match requested {
            Some(expr) => expr,
            None => self
                .orderable_expr(self.default_sort)
                .unwrap_or(self.orderable[0].1),
        }
    }

    /// Whether `column` is a declared sortable column.
    pub fn is_orderable(&self, column: &str) -> bool {
        self.orderable_expr(column).is_some()
    }

    /// Logical names of the sortable columns, in declaration order.
    pub fn orderable_columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.orderable.iter().map(|(name, _)| *name)
    }

    /// `SELECT <select> FROM <from> [<joins>]`
    pub fn base_query(&self) -> String {
        match self.joins {
            Some(joins) => format!("SELECT {} FROM {} {}", self.select, self.from, joins),
            None => format!("SELECT {} FROM {}", self.select, self.from),
        }
    }

    fn orderable_expr(&self, column: &str) -> Option<&'static str> {
        self.orderable
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, expr)| *expr)
    }
}

/// The ten logical entities exposed by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Actors,
    Authors,
    Directors,
    Plays,
    Productions,
    Performances,
    Rehearsals,
    Roles,
    Theatres,
    Locations,
}

impl Entity {
    pub const ALL: [Entity; 10] = [
        Entity::Actors,
        Entity::Authors,
        Entity::Directors,
        Entity::Plays,
        Entity::Productions,
        Entity::Performances,
        Entity::Rehearsals,
        Entity::Roles,
        Entity::Theatres,
        Entity::Locations,
    ];

    /// Logical name used as the registry key.
    pub fn name(self) -> &'static str {
        match self {
            Entity::Actors => "actors",
            Entity::Authors => "authors",
            Entity::Directors => "directors",
            Entity::Plays => "plays",
            Entity::Productions => "productions",
            Entity::Performances => "performances",
            Entity::Rehearsals => "rehearsals",
            Entity::Roles => "roles",
            Entity::Theatres => "theatres",
            Entity::Locations => "locations",
        }
    }

    /// Physical table holding the entity's rows.
    pub fn table(self) -> &'static str {
        match self {
            Entity::Actors => "actor",
            Entity::Authors => "author",
            Entity::Directors => "director",
            Entity::Plays => "play",
            Entity::Productions => "production",
            Entity::Performances => "performance",
            Entity::Rehearsals => "rehearsal",
            Entity::Roles => "role",
            Entity::Theatres => "theatre",
            Entity::Locations => "location",
        }
    }

    pub fn config(self) -> &'static TableConfig {
        match self {
            Entity::Actors => &ACTORS,
            Entity::Authors => &AUTHORS,
            Entity::Directors => &DIRECTORS,
            Entity::Plays => &PLAYS,
            Entity::Productions => &PRODUCTIONS,
            Entity::Performances => &PERFORMANCES,
            Entity::Rehearsals => &REHEARSALS,
            Entity::Roles => &ROLES,
            Entity::Theatres => &THEATRES,
            Entity::Locations => &LOCATIONS,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Entity {
    type Err = DbError;

    fn from_str(name: &str) -> DbResult<Self> {
        Entity::ALL
            .into_iter()
            .find(|entity| entity.name() == name)
            .ok_or_else(|| DbError::UnknownEntity(name.to_string()))
    }
}

/// Looks up a declaration by logical name.
pub fn table_config(name: &str) -> DbResult<&'static TableConfig> {
    name.parse::<Entity>().map(Entity::config)
}

static ACTORS: TableConfig = TableConfig {
    from: "actor a",
    select: "a.*",
    joins: None,
    orderable: &[("id", "a.id"), ("full_name", "a.full_name"), ("experience", "a.experience")],
    default_sort: "id",
    searchable: &["a.full_name", "a.experience"],
};

static AUTHORS: TableConfig = TableConfig {
    from: "author a",
    select: "a.*",
    joins: None,
    orderable: &[("id", "a.id"), ("full_name", "a.full_name"), ("biography", "a.biography")],
    default_sort: "id",
    searchable: &["a.full_name", "a.biography"],
};

static DIRECTORS: TableConfig = TableConfig {
    from: "director d",
    select: "d.*",
    joins: None,
    orderable: &[("id", "d.id"), ("full_name", "d.full_name"), ("biography", "d.biography")],
    default_sort: "id",
    searchable: &["d.full_name", "d.biography"],
};

static PLAYS: TableConfig = TableConfig {
    from: "play p",
    select: "p.*",
    joins: None,
    orderable: &[
        ("id", "p.id"),
        ("title", "p.title"),
        ("genre", "p.genre"),
        ("year_written", "p.year_written"),
        ("description", "p.description"),
    ],
    default_sort: "id",
    searchable: &["p.title", "p.genre", "p.description"],
};

static PRODUCTIONS: TableConfig = TableConfig {
    from: "production p",
    select: "p.*",
    joins: None,
    orderable: &[
        ("id", "p.id"),
        ("title", "p.title"),
        ("production_date", "p.production_date"),
        ("description", "p.description"),
    ],
    default_sort: "id",
    searchable: &["p.title", "p.description"],
};

static PERFORMANCES: TableConfig = TableConfig {
    from: "performance p",
    select: "p.*, t.name AS theatre_name, l.hall_name, pr.title AS production_title",
    joins: Some(
        "JOIN location l ON p.location_id = l.id \
         JOIN theatre t ON l.theatre_id = t.id \
         JOIN production pr ON p.production_id = pr.id",
    ),
    orderable: &[("id", "p.id"), ("datetime", "p.datetime")],
    default_sort: "id",
    searchable: &["CAST(p.datetime AS TEXT)", "t.name", "l.hall_name", "pr.title"],
};

static REHEARSALS: TableConfig = TableConfig {
    from: "rehearsal r",
    select: "r.*, t.name AS theatre_name, l.hall_name, pr.title AS production_title",
    joins: Some(
        "JOIN location l ON r.location_id = l.id \
         JOIN theatre t ON l.theatre_id = t.id \
         JOIN production pr ON r.production_id = pr.id",
    ),
    orderable: &[("id", "r.id"), ("datetime", "r.datetime")],
    default_sort: "id",
    searchable: &["CAST(r.datetime AS TEXT)", "t.name", "l.hall_name", "pr.title"],
};

static ROLES: TableConfig = TableConfig {
    from: "role r",
    select: "r.*, p.title AS play_title",
    joins: Some("LEFT JOIN play p ON r.play_id = p.id"),
    orderable: &[("id", "r.id"), ("title", "r.title"), ("description", "r.description")],
    default_sort: "id",
    searchable: &["r.title", "r.description", "p.title"],
};

static THEATRES: TableConfig = TableConfig {
    from: "theatre t",
    select: "t.*",
    joins: None,
    orderable: &[
        ("id", "t.id"),
        ("name", "t.name"),
        ("city", "t.city"),
        ("street", "t.street"),
        ("house_number", "t.house_number"),
        ("postal_code", "t.postal_code"),
    ],
    default_sort: "name",
    searchable: &["t.name", "t.city", "t.street", "t.house_number", "t.postal_code"],
};

static LOCATIONS: TableConfig = TableConfig {
    from: "location l",
    select: "l.*, t.name AS theatre_name, t.city, t.street, t.house_number, t.postal_code",
    joins: Some("JOIN theatre t ON l.theatre_id = t.id"),
    orderable: &[
        ("id", "l.id"),
        ("theatre_name", "t.name"),
        ("hall_name", "l.hall_name"),
        ("capacity", "l.capacity"),
    ],
    default_sort: "hall_name",
    searchable: &["t.name", "l.hall_name", "t.city", "t.street", "t.house_number", "t.postal_code"],
};
