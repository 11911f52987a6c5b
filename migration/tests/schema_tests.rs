/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the schema migrations

use migration::{Migrator, MigratorTrait, SchemaManager};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

const TABLES: [&str; 7] = [
    "application",
    "build",
    "output",
    "input",
    "build_output",
    "build_input",
    "upload",
];

async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    Database::connect(opt).await.unwrap()
}

#[tokio::test]
async fn test_up_creates_all_tables() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    for table in TABLES {
        assert!(manager.has_table(table).await.unwrap(), "{table} missing");
    }
}

#[tokio::test]
async fn test_down_drops_all_tables() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();
    Migrator::down(&db, None).await.unwrap();

    let manager = SchemaManager::new(&db);
    for table in TABLES {
        assert!(!manager.has_table(table).await.unwrap(), "{table} left behind");
    }
}

#[tokio::test]
async fn test_input_natural_key_is_unique() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    db.execute_unprepared("INSERT INTO input (id, locator, fingerprint) VALUES ('a', 'build.sh', 'sha256:00')")
        .await
        .unwrap();
    db.execute_unprepared("INSERT INTO input (id, locator, fingerprint) VALUES ('b', 'build.sh', 'sha256:11')")
        .await
        .unwrap();

    let duplicate = db
        .execute_unprepared("INSERT INTO input (id, locator, fingerprint) VALUES ('c', 'build.sh', 'sha256:00')")
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_output_natural_key_includes_size() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    db.execute_unprepared(
        "INSERT INTO output (id, name, kind, fingerprint, size_bytes) VALUES ('a', 'bin', 0, 'sha256:00', 10)",
    )
    .await
    .unwrap();
    db.execute_unprepared(
        "INSERT INTO output (id, name, kind, fingerprint, size_bytes) VALUES ('b', 'bin', 0, 'sha256:00', 11)",
    )
    .await
    .unwrap();

    let duplicate = db
        .execute_unprepared(
            "INSERT INTO output (id, name, kind, fingerprint, size_bytes) VALUES ('c', 'bin', 1, 'sha256:00', 10)",
        )
        .await;
    assert!(duplicate.is_err());
}

#[tokio::test]
async fn test_output_kind_is_small_integer() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT type FROM pragma_table_info('output') WHERE name = 'kind'",
        ))
        .await
        .unwrap()
        .unwrap();
    let column_type: String = row.try_get("", "type").unwrap();

    assert_eq!(column_type.to_lowercase(), "smallint");
}
