//! Integration tests against a live MySQL server.
//!
//! These run only when `DB_HOST`, `DB_USER`, `DB_PASSWORD` and `DB_DATABASE`
//! are set (plus optional `DB_PORT`); without them every test skips, so the
//! suite stays green on machines without a database.
//!
//! Each test works in its own table and drops it afterwards.

use mysql_dal::{Db, DbConfig, FieldMap, QueryOptions, Value};

async fn test_db() -> Option<Db> {
    for var in ["DB_HOST", "DB_USER", "DB_PASSWORD", "DB_DATABASE"] {
        if std::env::var(var).is_err() {
            eprintln!("skipping: {var} not set");
            return None;
        }
    }
    let config = DbConfig::from_env().expect("config parse failed");
    Some(Db::connect(&config).await.expect("connect failed"))
}

async fn setup_table(db: &Db, table: &str) {
    db.execute_direct(&format!("DROP TABLE IF EXISTS {table}"))
        .await
        .unwrap();
    db.execute_direct(&format!(
        "CREATE TABLE {table} (\
            id BIGINT AUTO_INCREMENT PRIMARY KEY, \
            name VARCHAR(64) NOT NULL, \
            age INT NULL, \
            UNIQUE KEY uk_name (name)\
        )"
    ))
    .await
    .unwrap();
}

async fn drop_table(db: &Db, table: &str) {
    db.execute_direct(&format!("DROP TABLE IF EXISTS {table}"))
        .await
        .unwrap();
}

#[tokio::test]
async fn insert_then_find_round_trip() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_roundtrip";
    setup_table(&db, t).await;

    let data = FieldMap::new().with("name", "Ada").with("age", 36);
    let id = db.insert_one(t, &data).await.unwrap();
    assert!(id > 0);

    let cond = FieldMap::new().with("id", id as i64);
    let row = db
        .find_one(t, &cond, &QueryOptions::default())
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(row.get("name"), Some(&Value::Text("Ada".into())));
    assert_eq!(row.get("age"), Some(&Value::Int(36)));

    drop_table(&db, t).await;
}

#[tokio::test]
async fn find_one_on_no_match_returns_none() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_absent";
    setup_table(&db, t).await;

    let cond = FieldMap::new().with("id", 999_999);
    let row = db.find_one(t, &cond, &QueryOptions::default()).await.unwrap();
    assert!(row.is_none());

    drop_table(&db, t).await;
}

#[tokio::test]
async fn insert_many_preserves_insertion_order() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_bulk";
    setup_table(&db, t).await;

    let rows = vec![
        FieldMap::new().with("name", "A"),
        FieldMap::new().with("name", "B"),
    ];
    let affected = db.insert_many(t, &rows).await.unwrap();
    assert_eq!(affected, 2);

    let all = db
        .find_many(t, &FieldMap::new(), &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].get("name"), Some(&Value::Text("A".into())));
    assert_eq!(all[1].get("name"), Some(&Value::Text("B".into())));

    drop_table(&db, t).await;
}

#[tokio::test]
async fn upsert_is_idempotent_on_unique_key() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_upsert";
    setup_table(&db, t).await;

    db.insert_one(t, &FieldMap::new().with("name", "A").with("age", 1))
        .await
        .unwrap();
    let replacement = FieldMap::new().with("name", "A").with("age", 2);
    db.upsert_one(t, &replacement).await.unwrap();
    db.upsert_one(t, &replacement).await.unwrap();

    let all = db
        .find_many(t, &FieldMap::new().with("name", "A"), &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("age"), Some(&Value::Int(2)));

    drop_table(&db, t).await;
}

#[tokio::test]
async fn insert_ignore_skips_duplicates() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_ignore";
    setup_table(&db, t).await;

    let data = FieldMap::new().with("name", "dup");
    assert_eq!(db.insert_ignore_one(t, &data).await.unwrap(), 1);
    assert_eq!(db.insert_ignore_one(t, &data).await.unwrap(), 0);

    drop_table(&db, t).await;
}

#[tokio::test]
async fn update_one_zero_match_is_not_an_error() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_update_zero";
    setup_table(&db, t).await;

    let affected = db
        .update_one(
            t,
            &FieldMap::new().with("name", "C"),
            &FieldMap::new().with("id", 1),
        )
        .await
        .unwrap();
    assert_eq!(affected, 0);

    drop_table(&db, t).await;
}

#[tokio::test]
async fn delete_many_with_empty_condition_clears_table() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_delete_all";
    setup_table(&db, t).await;

    db.insert_many(
        t,
        &[
            FieldMap::new().with("name", "X"),
            FieldMap::new().with("name", "Y"),
        ],
    )
    .await
    .unwrap();

    // The documented hazardous default: no condition means the whole table.
    let affected = db.delete_many(t, &FieldMap::new()).await.unwrap();
    assert_eq!(affected, 2);
    let remaining = db
        .find_many(t, &FieldMap::new(), &QueryOptions::default())
        .await
        .unwrap();
    assert!(remaining.is_empty());

    drop_table(&db, t).await;
}

#[tokio::test]
async fn query_with_empty_sql_fails_fast() {
    let Some(db) = test_db().await else { return };
    let err = db.query("").await.unwrap_err();
    assert!(matches!(err, mysql_dal::Error::EmptyQuery));
}

#[tokio::test]
async fn transaction_commit_and_rollback() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_tx";
    setup_table(&db, t).await;

    let mut tx = db.begin().await.unwrap();
    tx.insert_one(t, &FieldMap::new().with("name", "kept"))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = db.begin().await.unwrap();
    tx.insert_one(t, &FieldMap::new().with("name", "discarded"))
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    let all = db
        .find_many(t, &FieldMap::new(), &QueryOptions::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].get("name"), Some(&Value::Text("kept".into())));

    drop_table(&db, t).await;
}

#[tokio::test]
async fn dropping_transaction_without_commit_rolls_back() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_tx_drop";
    setup_table(&db, t).await;

    {
        let mut tx = db.begin().await.unwrap();
        tx.insert_one(t, &FieldMap::new().with("name", "ghost"))
            .await
            .unwrap();
        // neither commit nor rollback; the handle drops here
    }

    let all = db
        .find_many(t, &FieldMap::new(), &QueryOptions::default())
        .await
        .unwrap();
    assert!(all.is_empty());

    drop_table(&db, t).await;
}

#[tokio::test]
async fn find_many_filters_by_equality_conjunction() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_filter";
    setup_table(&db, t).await;

    db.insert_many(
        t,
        &[
            FieldMap::new().with("name", "P").with("age", 10),
            FieldMap::new().with("name", "Q").with("age", 10),
            FieldMap::new().with("name", "R").with("age", 20),
        ],
    )
    .await
    .unwrap();

    let cond = FieldMap::new().with("age", 10).with("name", "Q");
    let hits = db.find_many(t, &cond, &QueryOptions::default()).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].get("name"), Some(&Value::Text("Q".into())));

    drop_table(&db, t).await;
}

#[tokio::test]
async fn direct_queries_bind_parameters() {
    let Some(db) = test_db().await else { return };
    let t = "dal_it_direct";
    setup_table(&db, t).await;

    db.insert_one(t, &FieldMap::new().with("name", "D").with("age", 5))
        .await
        .unwrap();

    let rows = db
        .find_direct(
            &format!("SELECT name FROM {t} WHERE age = ?"),
            vec![Value::Int(5)],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    let affected = db
        .update_direct(
            &format!("UPDATE {t} SET age = ? WHERE name = ?"),
            vec![Value::Int(6), Value::Text("D".into())],
        )
        .await
        .unwrap();
    assert_eq!(affected, 1);

    drop_table(&db, t).await;
}
