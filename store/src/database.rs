/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::error::StoreError;
use super::input::load_secret;
use super::types::*;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use tracing::log::LevelFilter;

pub fn database_url(config: &DatabaseConfig) -> Result<String, StoreError> {
    if let Some(file) = &config.database_url_file {
        load_secret(file).map_err(|e| {
            StoreError::Config(format!("failed to read database url from {}: {}", file, e))
        })
    } else if let Some(url) = &config.database_url {
        Ok(url.clone())
    } else {
        Err(StoreError::Config("no database url provided".to_string()))
    }
}

pub async fn connect_db(config: &DatabaseConfig) -> Result<DatabaseConnection, StoreError> {
    let mut opt = ConnectOptions::new(database_url(config)?);

    if config.sql_logging {
        opt.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    } else {
        opt.sqlx_logging(false);
    }

    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .acquire_timeout(Duration::from_secs(config.connect_timeout));

    let db = Database::connect(opt)
        .await
        .map_err(StoreError::Connection)?;
    db.ping().await.map_err(StoreError::Connection)?;

    tracing::debug!(backend = ?db.get_database_backend(), "connected to database");

    if !config.skip_migrations {
        migrate(&db).await?;
    }

    Ok(db)
}

pub async fn migrate(db: &DatabaseConnection) -> Result<(), StoreError> {
    Migrator::up(db, None).await.map_err(StoreError::Migration)?;
    tracing::info!("database schema is up to date");
    Ok(())
}
