//! The data-access facade.
//!
//! [`Db`] composes the statement builders with the executor over the shared
//! pool, exposing the full operation set callers work with. Construct it once
//! at startup and inject it by reference; cloning is cheap.
//!
//! Table names and direct SQL are caller-trusted throughout; everything else
//! binds as driver parameters.

use crate::config::DbConfig;
use crate::error::DalResult;
use crate::executor::{self, Outcome};
use crate::pool::Database;
use crate::row::Row;
use crate::statement::{self, QueryOptions, Statement};
use crate::transaction::Transaction;
use crate::value::{FieldMap, Value};
use tracing::info;

/// Process-wide data-access handle.
#[derive(Debug, Clone)]
pub struct Db {
    database: Database,
}

impl Db {
    /// Create the pool, health-check it and wrap it in a facade.
    pub async fn connect(config: &DbConfig) -> DalResult<Self> {
        let database = Database::connect(config).await?;
        Ok(Self { database })
    }

    /// Wrap an already-connected pool handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// The underlying pool handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    async fn run(&self, stmt: &Statement) -> DalResult<Outcome> {
        executor::execute(self.database.pool(), stmt).await
    }

    /// Begin a transaction on a pinned connection.
    ///
    /// All statements issued through the returned handle run on that one
    /// connection; commit or roll back to release it.
    pub async fn begin(&self) -> DalResult<Transaction> {
        let tx = self.database.pool().begin().await?;
        info!("Transaction started");
        Ok(Transaction::new(tx))
    }

    /// Insert one row; returns the inserted id (0 without an auto-increment
    /// key).
    pub async fn insert_one(&self, table: &str, data: &FieldMap) -> DalResult<u64> {
        let stmt = statement::insert_one(table, data)?;
        Ok(self.run(&stmt).await?.inserted_id())
    }

    /// Insert multiple rows in one statement; returns the affected count.
    /// The column set comes from the first row (caller contract: uniform).
    pub async fn insert_many(&self, table: &str, rows: &[FieldMap]) -> DalResult<u64> {
        let stmt = statement::insert_many(table, rows)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Insert one row, silently skipping a duplicate key.
    pub async fn insert_ignore_one(&self, table: &str, data: &FieldMap) -> DalResult<u64> {
        let stmt = statement::insert_ignore_one(table, data)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Insert multiple rows, silently skipping duplicate keys.
    pub async fn insert_ignore_many(&self, table: &str, rows: &[FieldMap]) -> DalResult<u64> {
        let stmt = statement::insert_ignore_many(table, rows)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Insert or full-row replace on unique-key conflict (REPLACE INTO
    /// semantics, not a column-level merge).
    pub async fn upsert_one(&self, table: &str, data: &FieldMap) -> DalResult<u64> {
        let stmt = statement::upsert_one(table, data)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Bulk insert-or-replace.
    pub async fn upsert_many(&self, table: &str, rows: &[FieldMap]) -> DalResult<u64> {
        let stmt = statement::upsert_many(table, rows)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Update at most one row.
    ///
    /// With an empty condition this updates an arbitrary single row; when the
    /// condition matches several rows, which one changes is undefined. Both
    /// are deliberate, documented hazards.
    pub async fn update_one(
        &self,
        table: &str,
        data: &FieldMap,
        condition: &FieldMap,
    ) -> DalResult<u64> {
        let stmt = statement::update_one(table, data, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Update all matching rows. An empty condition updates every row in the
    /// table.
    pub async fn update_many(
        &self,
        table: &str,
        data: &FieldMap,
        condition: &FieldMap,
    ) -> DalResult<u64> {
        let stmt = statement::update_many(table, data, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Run caller-trusted update SQL; returns the affected count.
    pub async fn update_direct(&self, sql: &str, params: Vec<Value>) -> DalResult<u64> {
        let stmt = Statement::direct_affected(sql, params);
        Ok(self.run(&stmt).await?.affected())
    }

    /// Delete at most one row. Same arbitrary-row hazard as [`Db::update_one`].
    pub async fn delete_one(&self, table: &str, condition: &FieldMap) -> DalResult<u64> {
        let stmt = statement::delete_one(table, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Delete all matching rows. An empty condition deletes every row in the
    /// table.
    pub async fn delete_many(&self, table: &str, condition: &FieldMap) -> DalResult<u64> {
        let stmt = statement::delete_many(table, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Run caller-trusted delete SQL; returns the affected count.
    pub async fn delete_direct(&self, sql: &str, params: Vec<Value>) -> DalResult<u64> {
        let stmt = Statement::direct_affected(sql, params);
        Ok(self.run(&stmt).await?.affected())
    }

    /// Fetch the first matching row, or `None` when nothing matches.
    pub async fn find_one(
        &self,
        table: &str,
        condition: &FieldMap,
        options: &QueryOptions,
    ) -> DalResult<Option<Row>> {
        let stmt = statement::find_one(table, condition, options)?;
        Ok(self.run(&stmt).await?.row())
    }

    /// Fetch all matching rows. An empty condition returns the whole table.
    pub async fn find_many(
        &self,
        table: &str,
        condition: &FieldMap,
        options: &QueryOptions,
    ) -> DalResult<Vec<Row>> {
        let stmt = statement::find_many(table, condition, options)?;
        Ok(self.run(&stmt).await?.rows())
    }

    /// Run caller-trusted select SQL with bound parameters.
    pub async fn find_direct(&self, sql: &str, params: Vec<Value>) -> DalResult<Vec<Row>> {
        let stmt = Statement::direct_rows(sql, params);
        Ok(self.run(&stmt).await?.rows())
    }

    /// Run caller-trusted SQL without parameters, returning rows.
    pub async fn query(&self, sql: &str) -> DalResult<Vec<Row>> {
        self.find_direct(sql, Vec::new()).await
    }

    /// Run caller-trusted SQL with no expected result (DDL and the like).
    pub async fn execute_direct(&self, sql: &str) -> DalResult<()> {
        let stmt = Statement::direct_exec(sql);
        self.run(&stmt).await?;
        Ok(())
    }
}
