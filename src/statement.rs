//! Statement construction.
//!
//! Pure, side-effect-free builders: one function per operation kind, each
//! returning a [`Statement`] holding rendered SQL and its positional
//! parameters. No I/O happens here.
//!
//! Every caller-supplied value is bound as a driver-level parameter; only
//! table names, index hints, projection lists and direct SQL are rendered
//! verbatim, and those are caller-trusted by contract. Identifiers taken from
//! field maps are backtick-quoted. Data values always bind before condition
//! values, each exactly once, in map order.

use crate::error::{DalResult, Error};
use crate::value::{FieldMap, Value};

/// Expected result shape of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Driver-reported last-insert id.
    InsertedId,
    /// Driver-reported affected-row count.
    AffectedCount,
    /// First row of the result set, or absent.
    SingleRow,
    /// Full ordered row set.
    RowSet,
    /// No result expected.
    None,
}

/// Rendered SQL text plus its bound parameters, ready for dispatch.
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    params: Vec<Value>,
    kind: StatementKind,
}

impl Statement {
    fn new(sql: String, params: Vec<Value>, kind: StatementKind) -> Self {
        Self { sql, params, kind }
    }

    /// Wrap caller-supplied SQL expected to return rows.
    pub fn direct_rows(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self::new(sql.into(), params, StatementKind::RowSet)
    }

    /// Wrap caller-supplied SQL expected to return an affected-row count.
    pub fn direct_affected(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self::new(sql.into(), params, StatementKind::AffectedCount)
    }

    /// Wrap caller-supplied SQL with no expected result.
    pub fn direct_exec(sql: impl Into<String>) -> Self {
        Self::new(sql.into(), Vec::new(), StatementKind::None)
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }
}

/// Options for find operations.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Comma-separated projection list. Defaults to `*`. Caller-trusted.
    pub columns: Option<String>,
    /// MySQL index hint, emitted as `USE INDEX (...)`. Caller-trusted.
    pub use_index: Option<String>,
}

impl QueryOptions {
    /// Select specific columns.
    pub fn columns(columns: impl Into<String>) -> Self {
        Self {
            columns: Some(columns.into()),
            ..Self::default()
        }
    }

    /// Add an index hint.
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.use_index = Some(index.into());
        self
    }

    fn projection(&self) -> &str {
        match self.columns.as_deref() {
            Some(cols) if !cols.is_empty() => cols,
            _ => "*",
        }
    }

    fn index_hint(&self) -> Option<&str> {
        self.use_index.as_deref().filter(|idx| !idx.is_empty())
    }
}

/// Quote an identifier with backticks, doubling embedded backticks.
fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Render `\`a\`,\`b\`` from the map's keys, in map order.
fn column_list(fields: &FieldMap) -> String {
    fields
        .keys()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(",")
}

/// Render `?,?,?` for one row of `n` columns.
fn placeholders(n: usize) -> String {
    vec!["?"; n].join(",")
}

/// Render `\`a\` = ?, \`b\` = ?` from the map's keys, in map order.
fn set_clause(fields: &FieldMap) -> String {
    fields
        .keys()
        .map(|col| format!("{} = ?", quote_ident(col)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render `\`a\` = ? AND \`b\` = ?`, or None for an empty condition.
fn where_clause(condition: &FieldMap) -> Option<String> {
    if condition.is_empty() {
        return None;
    }
    Some(
        condition
            .keys()
            .map(|col| format!("{} = ?", quote_ident(col)))
            .collect::<Vec<_>>()
            .join(" AND "),
    )
}

/// Condition maps may be empty (no filter) but never carry an empty column
/// name; that would render invalid SQL.
fn check_condition(condition: &FieldMap) -> DalResult<()> {
    if condition.keys().any(str::is_empty) {
        return Err(Error::invalid_argument(
            "condition received an empty column name",
        ));
    }
    Ok(())
}

fn require_fields(fields: &FieldMap, operation: &str) -> DalResult<()> {
    if fields.is_empty() {
        return Err(Error::invalid_argument(format!(
            "{operation} requires at least one field"
        )));
    }
    if fields.keys().any(str::is_empty) {
        return Err(Error::invalid_argument(format!(
            "{operation} received an empty column name"
        )));
    }
    Ok(())
}

fn insert_like(
    verb: &str,
    table: &str,
    data: &FieldMap,
    kind: StatementKind,
) -> DalResult<Statement> {
    require_fields(data, verb)?;
    let sql = format!(
        "{verb} INTO {table} ({}) VALUES ({})",
        column_list(data),
        placeholders(data.len()),
    );
    Ok(Statement::new(sql, data.values().cloned().collect(), kind))
}

/// Column set comes from the first row; all rows must supply the same set
/// (caller contract). Missing keys in later rows bind NULL.
fn insert_like_many(verb: &str, table: &str, rows: &[FieldMap]) -> DalResult<Statement> {
    let first = rows
        .first()
        .ok_or_else(|| Error::invalid_argument(format!("{verb} requires a non-empty row set")))?;
    require_fields(first, verb)?;

    let row_placeholders = format!("({})", placeholders(first.len()));
    let all_placeholders = vec![row_placeholders; rows.len()].join(",");
    let sql = format!(
        "{verb} INTO {table} ({}) VALUES {}",
        column_list(first),
        all_placeholders,
    );

    let mut params = Vec::with_capacity(rows.len() * first.len());
    for row in rows {
        for col in first.keys() {
            params.push(row.get(col).cloned().unwrap_or(Value::Null));
        }
    }
    Ok(Statement::new(sql, params, StatementKind::AffectedCount))
}

/// `INSERT INTO t (cols) VALUES (...)`; result is the inserted id.
pub fn insert_one(table: &str, data: &FieldMap) -> DalResult<Statement> {
    insert_like("INSERT", table, data, StatementKind::InsertedId)
}

/// Multi-row `INSERT INTO t (cols) VALUES (...),(...)`.
pub fn insert_many(table: &str, rows: &[FieldMap]) -> DalResult<Statement> {
    insert_like_many("INSERT", table, rows)
}

/// `INSERT IGNORE`: duplicate-key rows are silently skipped.
pub fn insert_ignore_one(table: &str, data: &FieldMap) -> DalResult<Statement> {
    insert_like("INSERT IGNORE", table, data, StatementKind::AffectedCount)
}

pub fn insert_ignore_many(table: &str, rows: &[FieldMap]) -> DalResult<Statement> {
    insert_like_many("INSERT IGNORE", table, rows)
}

/// `REPLACE INTO`: full-row replace on unique-key conflict, not a
/// column-level merge.
pub fn upsert_one(table: &str, data: &FieldMap) -> DalResult<Statement> {
    insert_like("REPLACE", table, data, StatementKind::AffectedCount)
}

pub fn upsert_many(table: &str, rows: &[FieldMap]) -> DalResult<Statement> {
    insert_like_many("REPLACE", table, rows)
}

fn update(
    table: &str,
    data: &FieldMap,
    condition: &FieldMap,
    limit_one: bool,
) -> DalResult<Statement> {
    require_fields(data, "UPDATE")?;
    check_condition(condition)?;
    let mut sql = format!("UPDATE {table} SET {}", set_clause(data));
    if let Some(clause) = where_clause(condition) {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
    if limit_one {
        sql.push_str(" LIMIT 1");
    }
    let params = data
        .values()
        .chain(condition.values())
        .cloned()
        .collect();
    Ok(Statement::new(sql, params, StatementKind::AffectedCount))
}

/// `UPDATE t SET ... [WHERE ...] LIMIT 1`.
///
/// With an empty condition this updates one arbitrary row; when the condition
/// matches several rows, which one changes is undefined (no ordering).
pub fn update_one(table: &str, data: &FieldMap, condition: &FieldMap) -> DalResult<Statement> {
    update(table, data, condition, true)
}

/// `UPDATE t SET ... [WHERE ...]`. An empty condition updates every row.
pub fn update_many(table: &str, data: &FieldMap, condition: &FieldMap) -> DalResult<Statement> {
    update(table, data, condition, false)
}

fn delete(table: &str, condition: &FieldMap, limit_one: bool) -> DalResult<Statement> {
    check_condition(condition)?;
    let mut sql = format!("DELETE FROM {table}");
    if let Some(clause) = where_clause(condition) {
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
    if limit_one {
        sql.push_str(" LIMIT 1");
    }
    Ok(Statement::new(
        sql,
        condition.values().cloned().collect(),
        StatementKind::AffectedCount,
    ))
}

/// `DELETE FROM t [WHERE ...] LIMIT 1`. Same arbitrary-row hazard as
/// [`update_one`].
pub fn delete_one(table: &str, condition: &FieldMap) -> DalResult<Statement> {
    delete(table, condition, true)
}

/// `DELETE FROM t [WHERE ...]`. An empty condition deletes every row.
pub fn delete_many(table: &str, condition: &FieldMap) -> DalResult<Statement> {
    delete(table, condition, false)
}

fn select(
    table: &str,
    condition: &FieldMap,
    options: &QueryOptions,
    limit_one: bool,
    kind: StatementKind,
) -> DalResult<Statement> {
    check_condition(condition)?;
    let mut sql = format!("SELECT {} FROM {table}", options.projection());
    // The index hint only makes sense alongside a filter; an unconditional
    // scan ignores it, matching the original behavior.
    if let Some(clause) = where_clause(condition) {
        if let Some(idx) = options.index_hint() {
            sql.push_str(&format!(" USE INDEX ({idx})"));
        }
        sql.push_str(" WHERE ");
        sql.push_str(&clause);
    }
    if limit_one {
        sql.push_str(" LIMIT 1");
    }
    Ok(Statement::new(sql, condition.values().cloned().collect(), kind))
}

/// `SELECT cols FROM t [USE INDEX (i)] [WHERE ...] LIMIT 1`.
pub fn find_one(table: &str, condition: &FieldMap, options: &QueryOptions) -> DalResult<Statement> {
    select(table, condition, options, true, StatementKind::SingleRow)
}

/// `SELECT cols FROM t [USE INDEX (i)] [WHERE ...]`.
pub fn find_many(table: &str, condition: &FieldMap, options: &QueryOptions) -> DalResult<Statement> {
    select(table, condition, options, false, StatementKind::RowSet)
}
