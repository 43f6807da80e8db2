//! Explicit transaction handles.
//!
//! [`crate::Db::begin`] checks one connection out of the pool and pins it for
//! the lifetime of the returned [`Transaction`]; every operation on the
//! handle runs on that connection, so the begin/commit pairing can never
//! interleave with other callers. `commit` and `rollback` consume the handle.
//! Dropping an uncommitted handle rolls the transaction back.

use crate::error::{DalResult, Error};
use crate::executor::{self, Outcome};
use crate::row::Row;
use crate::statement::{self, QueryOptions, Statement};
use crate::value::{FieldMap, Value};
use sqlx::MySql;
use tracing::info;

/// An open transaction on a pinned pool connection.
pub struct Transaction {
    tx: sqlx::Transaction<'static, MySql>,
}

impl Transaction {
    pub(crate) fn new(tx: sqlx::Transaction<'static, MySql>) -> Self {
        Self { tx }
    }

    /// Commit the transaction, returning the connection to the pool.
    pub async fn commit(self) -> DalResult<()> {
        self.tx.commit().await.map_err(Error::from)?;
        info!("Transaction committed");
        Ok(())
    }

    /// Roll the transaction back, returning the connection to the pool.
    pub async fn rollback(self) -> DalResult<()> {
        self.tx.rollback().await.map_err(Error::from)?;
        info!("Transaction rolled back");
        Ok(())
    }

    async fn run(&mut self, stmt: &Statement) -> DalResult<Outcome> {
        executor::execute(&mut *self.tx, stmt).await
    }

    /// Insert one row; returns the inserted id (0 without an auto-increment
    /// key).
    pub async fn insert_one(&mut self, table: &str, data: &FieldMap) -> DalResult<u64> {
        let stmt = statement::insert_one(table, data)?;
        Ok(self.run(&stmt).await?.inserted_id())
    }

    /// Insert multiple rows; returns the affected count.
    pub async fn insert_many(&mut self, table: &str, rows: &[FieldMap]) -> DalResult<u64> {
        let stmt = statement::insert_many(table, rows)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Insert one row, silently skipping a duplicate key.
    pub async fn insert_ignore_one(&mut self, table: &str, data: &FieldMap) -> DalResult<u64> {
        let stmt = statement::insert_ignore_one(table, data)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Insert multiple rows, silently skipping duplicate keys.
    pub async fn insert_ignore_many(&mut self, table: &str, rows: &[FieldMap]) -> DalResult<u64> {
        let stmt = statement::insert_ignore_many(table, rows)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Insert or full-row replace on unique-key conflict.
    pub async fn upsert_one(&mut self, table: &str, data: &FieldMap) -> DalResult<u64> {
        let stmt = statement::upsert_one(table, data)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Bulk insert-or-replace.
    pub async fn upsert_many(&mut self, table: &str, rows: &[FieldMap]) -> DalResult<u64> {
        let stmt = statement::upsert_many(table, rows)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Update at most one row. An empty condition updates an arbitrary row.
    pub async fn update_one(
        &mut self,
        table: &str,
        data: &FieldMap,
        condition: &FieldMap,
    ) -> DalResult<u64> {
        let stmt = statement::update_one(table, data, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Update all matching rows. An empty condition updates every row.
    pub async fn update_many(
        &mut self,
        table: &str,
        data: &FieldMap,
        condition: &FieldMap,
    ) -> DalResult<u64> {
        let stmt = statement::update_many(table, data, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Delete at most one row. An empty condition deletes an arbitrary row.
    pub async fn delete_one(&mut self, table: &str, condition: &FieldMap) -> DalResult<u64> {
        let stmt = statement::delete_one(table, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Delete all matching rows. An empty condition deletes every row.
    pub async fn delete_many(&mut self, table: &str, condition: &FieldMap) -> DalResult<u64> {
        let stmt = statement::delete_many(table, condition)?;
        Ok(self.run(&stmt).await?.affected())
    }

    /// Fetch the first matching row, if any.
    pub async fn find_one(
        &mut self,
        table: &str,
        condition: &FieldMap,
        options: &QueryOptions,
    ) -> DalResult<Option<Row>> {
        let stmt = statement::find_one(table, condition, options)?;
        Ok(self.run(&stmt).await?.row())
    }

    /// Fetch all matching rows.
    pub async fn find_many(
        &mut self,
        table: &str,
        condition: &FieldMap,
        options: &QueryOptions,
    ) -> DalResult<Vec<Row>> {
        let stmt = statement::find_many(table, condition, options)?;
        Ok(self.run(&stmt).await?.rows())
    }

    /// Run caller-trusted SQL returning rows.
    pub async fn find_direct(&mut self, sql: &str, params: Vec<Value>) -> DalResult<Vec<Row>> {
        let stmt = Statement::direct_rows(sql, params);
        Ok(self.run(&stmt).await?.rows())
    }

    /// Run caller-trusted update SQL; returns the affected count.
    pub async fn update_direct(&mut self, sql: &str, params: Vec<Value>) -> DalResult<u64> {
        let stmt = Statement::direct_affected(sql, params);
        Ok(self.run(&stmt).await?.affected())
    }

    /// Run caller-trusted delete SQL; returns the affected count.
    pub async fn delete_direct(&mut self, sql: &str, params: Vec<Value>) -> DalResult<u64> {
        let stmt = Statement::direct_affected(sql, params);
        Ok(self.run(&stmt).await?.affected())
    }

    /// Run caller-trusted SQL with no expected result.
    pub async fn execute_direct(&mut self, sql: &str) -> DalResult<()> {
        let stmt = Statement::direct_exec(sql);
        self.run(&stmt).await?;
        Ok(())
    }
}
