//! MySQL data-access layer.
//!
//! Named CRUD primitives (insert/update/delete/find, single and bulk,
//! upsert, insert-ignore), caller-trusted direct queries and explicit
//! transactions, built on parameterized statement construction over a pooled
//! sqlx connection.
//!
//! ```no_run
//! use mysql_dal::{Db, DbConfig, FieldMap, QueryOptions};
//!
//! # async fn demo() -> mysql_dal::DalResult<()> {
//! let db = Db::connect(&DbConfig::from_env()?).await?;
//!
//! let id = db
//!     .insert_one("user", &FieldMap::new().with("name", "Ada"))
//!     .await?;
//! let row = db
//!     .find_one(
//!         "user",
//!         &FieldMap::new().with("id", id as i64),
//!         &QueryOptions::default(),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod executor;
pub mod pool;
pub mod row;
pub mod statement;
pub mod transaction;
pub mod value;

pub use config::DbConfig;
pub use db::Db;
pub use error::{DalResult, Error};
pub use executor::Outcome;
pub use pool::Database;
pub use row::Row;
pub use statement::{QueryOptions, Statement, StatementKind};
pub use transaction::Transaction;
pub use value::{FieldMap, Value};
