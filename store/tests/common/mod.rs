/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use store::*;
use tempfile::TempDir;

/// Opens a migrated SQLite database in a fresh temporary directory. The
/// directory must outlive the storage.
pub async fn sqlite_storage() -> (TempDir, Storage) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("cache.db").display()
    );
    let storage = Storage::connect_url(&url).await.unwrap();

    (dir, storage)
}

pub fn fingerprint(seed: &str) -> Fingerprint {
    Fingerprint::sha256(seed)
}

pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, minute, 0).unwrap()
}

pub fn input(locator: &str, seed: &str) -> Input {
    Input::new(locator, fingerprint(seed)).unwrap()
}

pub fn build(app: &str, started: u32, stopped: u32, inputs: &[Input]) -> Build {
    Build::new(
        Application::new(app).unwrap(),
        at(started),
        at(stopped),
        Input::total_fingerprint(inputs),
    )
    .unwrap()
}

pub fn file_output(name: &str, seed: &str, size_bytes: u64, uris: &[&str]) -> Output {
    Output::new(name, OutputKind::File, fingerprint(seed), size_bytes)
        .unwrap()
        .with_uploads(
            uris.iter()
                .map(|uri| Upload::new(*uri, std::time::Duration::from_millis(1500)).unwrap()),
        )
}

static POSTGRES_MIGRATED: tokio::sync::OnceCell<()> = tokio::sync::OnceCell::const_new();

/// Connects to the Postgres database named by `BAUR_TEST_DATABASE_URL`.
/// Returns `None` when the variable is unset so the caller can skip.
pub async fn postgres_storage() -> Option<Storage> {
    let Ok(url) = std::env::var("BAUR_TEST_DATABASE_URL") else {
        eprintln!("BAUR_TEST_DATABASE_URL not set, skipping");
        return None;
    };

    POSTGRES_MIGRATED
        .get_or_init(|| async {
            let storage = Storage::connect_url(&url).await.unwrap();
            storage.close().await.unwrap();
        })
        .await;

    let mut config = DatabaseConfig::from_url(url);
    config.skip_migrations = true;

    Some(Storage::connect(&config).await.unwrap())
}

/// Lower-case suffix keeping names and fingerprints of one test run apart
/// from earlier runs against the same database.
pub fn run_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}
