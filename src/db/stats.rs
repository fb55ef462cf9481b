//! Dashboard statistics and report data sets.
//!
//! Rehearsal statistics honour [`DashboardFilters`]: a look-back period plus
//! optional director and theatre names. Cut-off timestamps are computed from
//! the local clock and bound as parameters, never formatted into SQL.

use super::crud::datetime_value;
use super::db::Db;
use super::error::DbResult;
use super::record::RecordSet;
use chrono::{Duration, Local, Months, NaiveDateTime};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

const REHEARSAL_JOINS: &str = "FROM rehearsal r
    JOIN production pr ON r.production_id = pr.id
    JOIN play pl ON pr.play_id = pl.id
    JOIN director d ON pr.director_id = d.id
    JOIN location l ON r.location_id = l.id
    JOIN theatre t ON l.theatre_id = t.id";
const SELECT_PLAYS_BY_GENRE: &str = "
    SELECT genre AS label, COUNT(*) AS count
    FROM play
    WHERE genre IS NOT NULL AND genre != ''
    GROUP BY genre
    ORDER BY count DESC, genre
";
const SELECT_PRODUCTIONS_BY_THEATRE: &str = "
    SELECT t.name AS label, COUNT(DISTINCT p.id) AS count
    FROM production p
    JOIN performance perf ON p.id = perf.production_id
    JOIN location l ON perf.location_id = l.id
    JOIN theatre t ON l.theatre_id = t.id
    GROUP BY t.id, t.name
    ORDER BY count DESC, t.name
";
const SELECT_PRODUCTIONS_BY_DIRECTOR: &str = "
    SELECT d.full_name AS label, COUNT(p.id) AS count
    FROM production p
    JOIN director d ON p.director_id = d.id
    GROUP BY d.id, d.full_name
    ORDER BY count DESC, d.full_name
    LIMIT 10
";
const COUNT_ACTORS_BY_PRODUCTION: &str = "SELECT COUNT(*) FROM actor_production WHERE production_id = ?1";
const COUNT_ROLES: &str = "SELECT COUNT(*) FROM role";

const REPORT_PRODUCTIONS: &str = "
    SELECT
        p.id,
        p.title AS production_title,
        p.production_date,
        pl.title AS play_title,
        pl.genre,
        pl.year_written,
        d.full_name AS director_name,
        (SELECT a.full_name FROM author_play ap
         JOIN author a ON ap.author_id = a.id
         WHERE ap.play_id = pl.id ORDER BY a.full_name LIMIT 1) AS author_name,
        (SELECT t.name FROM performance perf
         JOIN location loc ON perf.location_id = loc.id
         JOIN theatre t ON loc.theatre_id = t.id
         WHERE perf.production_id = p.id ORDER BY perf.datetime LIMIT 1) AS theatre_name,
        (SELECT t.city FROM performance perf
         JOIN location loc ON perf.location_id = loc.id
         JOIN theatre t ON loc.theatre_id = t.id
         WHERE perf.production_id = p.id ORDER BY perf.datetime LIMIT 1) AS city,
        (SELECT COUNT(*) FROM performance WHERE production_id = p.id) AS performances_count,
        (SELECT COUNT(*) FROM rehearsal WHERE production_id = p.id) AS rehearsals_count,
        (SELECT COUNT(DISTINCT actor_id) FROM actor_production WHERE production_id = p.id) AS actors_count
    FROM production p
    LEFT JOIN play pl ON p.play_id = pl.id
    LEFT JOIN director d ON p.director_id = d.id
    ORDER BY p.production_date DESC, p.title
";
const REPORT_GENRES: &str = "
    SELECT
        pl.genre,
        COUNT(DISTINCT p.id) AS productions_count,
        COUNT(DISTINCT perf.id) AS performances_count,
        COUNT(DISTINCT ap.actor_id) AS actors_count
    FROM play pl
    LEFT JOIN production p ON pl.id = p.play_id
    LEFT JOIN performance perf ON p.id = perf.production_id
    LEFT JOIN actor_production ap ON p.id = ap.production_id
    WHERE pl.genre IS NOT NULL AND pl.genre != ''
    GROUP BY pl.genre
    ORDER BY productions_count DESC, pl.genre
";
const REPORT_THEATRES: &str = "
    SELECT
        t.name AS theatre_name,
        t.city,
        COUNT(DISTINCT loc.id) AS locations_count,
        COUNT(DISTINCT perf.id) AS performances_count,
        (SELECT COALESCE(SUM(capacity), 0) FROM location WHERE theatre_id = t.id) AS total_capacity
    FROM theatre t
    LEFT JOIN location loc ON t.id = loc.theatre_id
    LEFT JOIN performance perf ON loc.id = perf.location_id
    GROUP BY t.id, t.name, t.city
    ORDER BY performances_count DESC, t.name
";
const REPORT_DIRECTORS: &str = "
    SELECT
        d.full_name AS director_name,
        COUNT(DISTINCT p.id) AS productions_count,
        COUNT(DISTINCT perf.id) AS performances_count
    FROM director d
    LEFT JOIN production p ON d.id = p.director_id
    LEFT JOIN performance perf ON p.id = perf.production_id
    GROUP BY d.id, d.full_name
    ORDER BY productions_count DESC, d.full_name
";
const REPORT_ACTORS: &str = "
    SELECT
        a.full_name AS actor_name,
        COUNT(DISTINCT ap.production_id) AS productions_count,
        COUNT(DISTINCT ar.rehearsal_id) AS rehearsals_count
    FROM actor a
    LEFT JOIN actor_production ap ON a.id = ap.actor_id
    LEFT JOIN actor_rehearsal ar ON a.id = ar.actor_id
    GROUP BY a.id, a.full_name
    ORDER BY productions_count DESC, a.full_name
";
const REPORT_REHEARSALS_BY_MONTH: &str = "
    SELECT
        strftime('%Y-%m', r.datetime) AS month,
        COUNT(r.id) AS rehearsals_count,
        COUNT(DISTINCT r.production_id) AS productions_count
    FROM rehearsal r
    GROUP BY month
    ORDER BY month
";

/// Look-back window for rehearsal statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    All,
    Week,
    Month,
    Quarter,
    Year,
}

impl Period {
    /// Earliest timestamp inside the window ending at `now`.
    pub fn cutoff(self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            Period::All => None,
            Period::Week => Some(now - Duration::weeks(1)),
            Period::Month => now.checked_sub_months(Months::new(1)),
            Period::Quarter => now.checked_sub_months(Months::new(3)),
            Period::Year => now.checked_sub_months(Months::new(12)),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Period::All => "all",
            Period::Week => "week",
            Period::Month => "month",
            Period::Quarter => "quarter",
            Period::Year => "year",
        };
        f.write_str(name)
    }
}

/// Current dashboard selection. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardFilters {
    pub period: Period,
    pub director: Option<String>,
    pub theatre: Option<String>,
}

impl DashboardFilters {
    fn conditions(&self, now: NaiveDateTime, default_period: Period) -> (Vec<&'static str>, Vec<Value>) {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        let period = if self.period == Period::All { default_period } else { self.period };
        if let Some(cutoff) = period.cutoff(now) {
            conditions.push("r.datetime >= ?");
            params.push(datetime_value(cutoff));
        }
        if let Some(director) = &self.director {
            conditions.push("d.full_name = ?");
            params.push(Value::Text(director.clone()));
        }
        if let Some(theatre) = &self.theatre {
            conditions.push("t.name = ?");
            params.push(Value::Text(theatre.clone()));
        }
        (conditions, params)
    }
}

fn where_clause(conditions: &[&str]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// A labelled count, e.g. a genre and how many plays it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

impl LabelCount {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            label: row.get::<_, Option<String>>("label")?.unwrap_or_default(),
            count: row.get("count")?,
        })
    }
}

/// Columns offered as dashboard filter choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueColumn {
    Genres,
    ActorNames,
    AuthorNames,
    DirectorNames,
    PlayTitles,
    Theatres,
    Locations,
    ProductionTitles,
    RoleTitles,
}

impl UniqueColumn {
    fn source(self) -> (&'static str, &'static str) {
        match self {
            UniqueColumn::Genres => ("play", "genre"),
            UniqueColumn::ActorNames => ("actor", "full_name"),
            UniqueColumn::AuthorNames => ("author", "full_name"),
            UniqueColumn::DirectorNames => ("director", "full_name"),
            UniqueColumn::PlayTitles => ("play", "title"),
            UniqueColumn::Theatres => ("theatre", "name"),
            UniqueColumn::Locations => ("location", "hall_name"),
            UniqueColumn::ProductionTitles => ("production", "title"),
            UniqueColumn::RoleTitles => ("role", "title"),
        }
    }
}

impl Db {
    /// Rehearsal counts per `YYYY-MM`, oldest first. Without a period the
    /// last year is used.
    pub async fn rehearsals_by_month(&self, filters: &DashboardFilters) -> DbResult<Vec<LabelCount>> {
        self.rehearsals_by_month_at(filters, Local::now().naive_local()).await
    }

    /// [`Db::rehearsals_by_month`] with an explicit clock.
    pub async fn rehearsals_by_month_at(&self, filters: &DashboardFilters, now: NaiveDateTime) -> DbResult<Vec<LabelCount>> {
        let (conditions, params) = filters.conditions(now, Period::Year);
        let sql = format!(
            "SELECT strftime('%Y-%m', r.datetime) AS label, COUNT(*) AS count {} {} GROUP BY label ORDER BY label",
            REHEARSAL_JOINS,
            where_clause(&conditions)
        );
        self.query_map(&sql, &params, LabelCount::from_row).await
    }

    /// Next rehearsals from now on, soonest first.
    pub async fn upcoming_rehearsals(&self, limit: u32, filters: &DashboardFilters) -> DbResult<RecordSet> {
        let now = Local::now().naive_local();
        let (mut conditions, mut params) = filters.conditions(now, Period::All);
        conditions.push("r.datetime >= ?");
        params.push(datetime_value(now));
        params.push(Value::Integer(i64::from(limit)));

        let sql = format!(
            "SELECT r.*, pr.title AS production_title, d.full_name AS director_name, \
             pl.title AS play_title, pl.genre, t.name AS theatre_name, l.hall_name AS location_name \
             {} {} ORDER BY r.datetime ASC LIMIT ?",
            REHEARSAL_JOINS,
            where_clause(&conditions)
        );
        self.query(&sql, &params, false).await
    }

    /// Rehearsals matching the theatre and director filters. The period is
    /// ignored unless one is selected.
    pub async fn filtered_rehearsals_count(&self, filters: &DashboardFilters) -> DbResult<i64> {
        let (conditions, params) = filters.conditions(Local::now().naive_local(), Period::All);
        let sql = format!("SELECT COUNT(*) {} {}", REHEARSAL_JOINS, where_clause(&conditions));
        self.scalar(&sql, &params).await
    }

    pub async fn plays_by_genre(&self) -> DbResult<Vec<LabelCount>> {
        self.query_map(SELECT_PLAYS_BY_GENRE, &[], LabelCount::from_row).await
    }

    /// Productions per theatre, counted through their performances.
    pub async fn productions_by_theatre(&self) -> DbResult<Vec<LabelCount>> {
        self.query_map(SELECT_PRODUCTIONS_BY_THEATRE, &[], LabelCount::from_row).await
    }

    /// The ten busiest directors.
    pub async fn productions_by_director(&self) -> DbResult<Vec<LabelCount>> {
        self.query_map(SELECT_PRODUCTIONS_BY_DIRECTOR, &[], LabelCount::from_row).await
    }

    pub async fn actors_count_by_production(&self, production_id: i64) -> DbResult<i64> {
        self.scalar(COUNT_ACTORS_BY_PRODUCTION, &[Value::Integer(production_id)]).await
    }

    pub async fn total_roles(&self) -> DbResult<i64> {
        self.scalar(COUNT_ROLES, &[]).await
    }

    /// Distinct non-empty values of an allow-listed column, sorted.
    pub async fn unique_values(&self, column: UniqueColumn) -> DbResult<Vec<String>> {
        let (table, column) = column.source();
        let sql = format!(
            "SELECT DISTINCT {column} AS value FROM {table} WHERE {column} IS NOT NULL AND {column} != '' ORDER BY value"
        );
        self.query_map(&sql, &[], |row| row.get(0)).await
    }
}

/// Everything shown on the dashboard for one filter selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardMetrics {
    pub rehearsals_count: i64,
    pub total_roles: i64,
    pub rehearsals_by_month: Vec<LabelCount>,
    pub plays_by_genre: Vec<LabelCount>,
    pub productions_by_theatre: Vec<LabelCount>,
    pub productions_by_director: Vec<LabelCount>,
    pub upcoming: RecordSet,
}

impl DashboardMetrics {
    pub const UPCOMING_LIMIT: u32 = 10;

    /// Runs every dashboard query for `filters`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use curtain::db::db::Db;
    /// use curtain::db::stats::{DashboardFilters, DashboardMetrics};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> curtain::db::error::DbResult<()> {
    /// let db = Db::open_in_memory()?;
    /// let metrics = DashboardMetrics::load(&db, &DashboardFilters::default()).await?;
    /// assert_eq!(metrics.rehearsals_count, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load(db: &Db, filters: &DashboardFilters) -> DbResult<Self> {
        Ok(Self {
            rehearsals_count: db.filtered_rehearsals_count(filters).await?,
            total_roles: db.total_roles().await?,
            rehearsals_by_month: db.rehearsals_by_month(filters).await?,
            plays_by_genre: db.plays_by_genre().await?,
            productions_by_theatre: db.productions_by_theatre().await?,
            productions_by_director: db.productions_by_director().await?,
            upcoming: db.upcoming_rehearsals(Self::UPCOMING_LIMIT, filters).await?,
        })
    }
}

/// Data sets behind the analytics report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportData {
    pub productions: RecordSet,
    pub genres: RecordSet,
    pub theatres: RecordSet,
    pub directors: RecordSet,
    pub actors: RecordSet,
    pub rehearsals_by_month: RecordSet,
}

impl ReportData {
    pub async fn gather(db: &Db) -> DbResult<Self> {
        Ok(Self {
            productions: db.query(REPORT_PRODUCTIONS, &[], true).await?,
            genres: db.query(REPORT_GENRES, &[], false).await?,
            theatres: db.query(REPORT_THEATRES, &[], false).await?,
            directors: db.query(REPORT_DIRECTORS, &[], false).await?,
            actors: db.query(REPORT_ACTORS, &[], false).await?,
            rehearsals_by_month: db.query(REPORT_REHEARSALS_BY_MONTH, &[], false).await?,
        })
    }

    /// Named sections in report order.
    pub fn sections(&self) -> [(&'static str, &RecordSet); 6] {
        [
            ("productions", &self.productions),
            ("genres", &self.genres),
            ("theatres", &self.theatres),
            ("directors", &self.directors),
            ("actors", &self.actors),
            ("rehearsals_by_month", &self.rehearsals_by_month),
        ]
    }
}
