/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::consts::*;
use super::input::greater_than_zero;
use clap::Args;
use entity::*;

#[derive(Args, Debug, Clone)]
pub struct DatabaseConfig {
    #[arg(long, env = "BAUR_DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long, env = "BAUR_DATABASE_URL_FILE")]
    pub database_url_file: Option<String>,
    #[arg(long, env = "BAUR_MAX_CONNECTIONS", value_parser = greater_than_zero::<u32>, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
    /// Seconds to wait for a connection to the database.
    #[arg(long, env = "BAUR_CONNECT_TIMEOUT", value_parser = greater_than_zero::<u64>, default_value_t = DEFAULT_CONNECT_TIMEOUT.as_secs())]
    pub connect_timeout: u64,
    #[arg(long, env = "BAUR_SQL_LOGGING", default_value = "false")]
    pub sql_logging: bool,
    #[arg(long, env = "BAUR_SKIP_MIGRATIONS", default_value = "false")]
    pub skip_migrations: bool,
}

impl DatabaseConfig {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            database_url: Some(url.into()),
            database_url_file: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT.as_secs(),
            sql_logging: false,
            skip_migrations: false,
        }
    }
}

pub type EApplication = application::Entity;
pub type EBuild = build::Entity;
pub type EBuildInput = build_input::Entity;
pub type EBuildOutput = build_output::Entity;
pub type EInput = input::Entity;
pub type EOutput = output::Entity;
pub type EUpload = upload::Entity;

pub type MApplication = application::Model;
pub type MBuild = build::Model;
pub type MBuildInput = build_input::Model;
pub type MBuildOutput = build_output::Model;
pub type MInput = input::Model;
pub type MOutput = output::Model;
pub type MUpload = upload::Model;

pub type AApplication = application::ActiveModel;
pub type ABuild = build::ActiveModel;
pub type ABuildInput = build_input::ActiveModel;
pub type ABuildOutput = build_output::ActiveModel;
pub type AInput = input::ActiveModel;
pub type AOutput = output::ActiveModel;
pub type AUpload = upload::ActiveModel;

pub type CApplication = application::Column;
pub type CBuild = build::Column;
pub type CBuildInput = build_input::Column;
pub type CBuildOutput = build_output::Column;
pub type CInput = input::Column;
pub type COutput = output::Column;
pub type CUpload = upload::Column;
