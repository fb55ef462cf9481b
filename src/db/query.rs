//! Query composer: turns a registry declaration plus caller options into a
//! parameterised SELECT.
//!
//! Sort columns are resolved through [`TableConfig::resolve_sort`], so a
//! caller-supplied name never reaches SQL. Search text is always bound as a
//! parameter, once per searchable expression.

use super::db::{Db, CASEFOLD_FN};
use super::error::DbResult;
use super::record::RecordSet;
use super::registry::{Entity, TableConfig};
use rusqlite::types::Value;

/// Sorting and freshness options shared by list and search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub sort_column: Option<String>,
    pub ascending: bool,
    pub force_refresh: bool,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            sort_column: None,
            ascending: true,
            force_refresh: false,
        }
    }
}

impl ListOptions {
    pub fn sorted_by(column: impl Into<String>, ascending: bool) -> Self {
        Self {
            sort_column: Some(column.into()),
            ascending,
            force_refresh: false,
        }
    }

    /// Discards cached statements before running the query.
    pub fn fresh(mut self) -> Self {
        self.force_refresh = true;
        self
    }
}

/// SQL text plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

fn order_clause(config: &TableConfig, options: &ListOptions) -> String {
    let expr = config.resolve_sort(options.sort_column.as_deref());
    let direction = if options.ascending { "ASC" } else { "DESC" };
    format!("ORDER BY {} {}", expr, direction)
}

/// `SELECT ... ORDER BY <resolved> ASC|DESC`
pub fn compose_list(config: &TableConfig, options: &ListOptions) -> ComposedQuery {
    ComposedQuery {
        sql: format!("{} {}", config.base_query(), order_clause(config, options)),
        params: Vec::new(),
    }
}

/// Case-insensitive substring match OR-ed across every searchable
/// expression. Empty text composes the plain list query.
pub fn compose_search(config: &TableConfig, text: &str, options: &ListOptions) -> ComposedQuery {
    if text.is_empty() {
        return compose_list(config, options);
    }

    let pattern = format!("%{}%", escape_like(text));
    let where_clause = config
        .searchable
        .iter()
        .map(|expr| format!("{f}({expr}) LIKE {f}(?) ESCAPE '\\'", f = CASEFOLD_FN, expr = expr))
        .collect::<Vec<_>>()
        .join(" OR ");

    ComposedQuery {
        sql: format!("{} WHERE {} {}", config.base_query(), where_clause, order_clause(config, options)),
        params: config.searchable.iter().map(|_| Value::Text(pattern.clone())).collect(),
    }
}

/// A single row by primary key, with the same columns as the list query.
pub fn compose_by_id(config: &TableConfig, id: i64) -> ComposedQuery {
    ComposedQuery {
        sql: format!("{} WHERE {} = ?", config.base_query(), config.resolve_sort(Some("id"))),
        params: vec![Value::Integer(id)],
    }
}

/// Escapes LIKE wildcards so the text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

impl Db {
    /// Every row of `entity`, sorted.
    pub async fn list(&self, entity: Entity, options: &ListOptions) -> DbResult<RecordSet> {
        let query = compose_list(entity.config(), options);
        self.query(&query.sql, &query.params, options.force_refresh).await
    }

    /// Rows of `entity` whose searchable columns contain `text`.
    pub async fn search(&self, entity: Entity, text: &str, options: &ListOptions) -> DbResult<RecordSet> {
        let query = compose_search(entity.config(), text, options);
        self.query(&query.sql, &query.params, options.force_refresh).await
    }

    /// [`Db::list`] keyed by logical name; unknown names fail before any
    /// statement is issued.
    pub async fn list_by_name(&self, name: &str, options: &ListOptions) -> DbResult<RecordSet> {
        let entity: Entity = name.parse()?;
        self.list(entity, options).await
    }

    /// Like [`Db::search`], but takes the logical table name as typed by a
    /// caller.
    ///
    /// # Errors
    ///
    /// [`DbError::UnknownEntity`](super::error::DbError::UnknownEntity) when
    /// `name` is not registered.
    pub async fn search_by_name(&self, name: &str, text: &str, options: &ListOptions) -> DbResult<RecordSet> {
        let entity: Entity = name.parse()?;
        self.search(entity, text, options).await
    }
}
