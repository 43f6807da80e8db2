//! Statement execution and result normalization.
//!
//! [`execute`] takes a built [`Statement`], dispatches it through any sqlx
//! executor (the pool, or a transaction's pinned connection) and interprets
//! the driver result according to the statement's [`StatementKind`] tag.

use crate::error::{DalResult, Error};
use crate::row::Row;
use crate::statement::{Statement, StatementKind};
use crate::value::bind_value;
use sqlx::MySql;
use tracing::debug;

/// A normalized execution result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Last-insert identifier; 0 when the table has no auto-increment key.
    InsertedId(u64),
    /// Driver-reported affected-row count.
    AffectedCount(u64),
    /// First row of the result set, or `None` when it was empty.
    SingleRow(Option<Row>),
    /// Full ordered row set; may be empty.
    RowSet(Vec<Row>),
    /// Nothing was expected.
    None,
}

impl Outcome {
    /// Extract an inserted id; 0 for any other shape.
    pub fn inserted_id(self) -> u64 {
        match self {
            Self::InsertedId(id) => id,
            _ => 0,
        }
    }

    /// Extract an affected-row count; 0 for any other shape.
    pub fn affected(self) -> u64 {
        match self {
            Self::AffectedCount(n) => n,
            _ => 0,
        }
    }

    /// Extract the single row; `None` for any other shape.
    pub fn row(self) -> Option<Row> {
        match self {
            Self::SingleRow(row) => row,
            _ => None,
        }
    }

    /// Extract the row set; empty for any other shape.
    pub fn rows(self) -> Vec<Row> {
        match self {
            Self::RowSet(rows) => rows,
            _ => Vec::new(),
        }
    }
}

/// Execute a statement and normalize the driver result.
///
/// Blank SQL is rejected with [`Error::EmptyQuery`] before any dispatch.
/// Driver failures surface as [`Error::Query`] with the original message.
pub async fn execute<'c, E>(executor: E, statement: &Statement) -> DalResult<Outcome>
where
    E: sqlx::Executor<'c, Database = MySql>,
{
    if statement.sql().trim().is_empty() {
        return Err(Error::EmptyQuery);
    }

    debug!(
        sql = %statement.sql(),
        params = statement.params().len(),
        kind = ?statement.kind(),
        "Executing statement"
    );

    let mut query = sqlx::query(statement.sql());
    for param in statement.params() {
        query = bind_value(query, param);
    }

    match statement.kind() {
        StatementKind::InsertedId => {
            let result = query.execute(executor).await?;
            Ok(Outcome::InsertedId(result.last_insert_id()))
        }
        StatementKind::AffectedCount => {
            let result = query.execute(executor).await?;
            Ok(Outcome::AffectedCount(result.rows_affected()))
        }
        StatementKind::SingleRow => {
            let row = query.fetch_optional(executor).await?;
            Ok(Outcome::SingleRow(row.as_ref().map(Row::from)))
        }
        StatementKind::RowSet => {
            let rows = query.fetch_all(executor).await?;
            Ok(Outcome::RowSet(rows.iter().map(Row::from).collect()))
        }
        StatementKind::None => {
            query.execute(executor).await?;
            Ok(Outcome::None)
        }
    }
}
