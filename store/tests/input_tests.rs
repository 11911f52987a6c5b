/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for configuration input parsing

use std::fs;
use store::input::*;

#[test]
fn test_greater_than_zero() {
    let num = greater_than_zero::<u32>("1").unwrap();
    assert_eq!(num, 1);

    let num = greater_than_zero::<usize>("0").unwrap_err();
    assert_eq!(num, "`0` is not larger than 0");

    let num = greater_than_zero::<u32>("-1").unwrap_err();
    assert_eq!(num, "`-1` is not a valid number");

    let num = greater_than_zero::<i32>("-1").unwrap_err();
    assert_eq!(num, "`-1` is not larger than 0");

    let num = greater_than_zero::<u64>("a").unwrap_err();
    assert_eq!(num, "`a` is not a valid number");
}

#[test]
fn test_load_secret() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("database_url");
    fs::write(&path, "postgres://baur@localhost/baur\n").unwrap();
    let secret = load_secret(path.to_str().unwrap()).unwrap();
    assert_eq!(secret, "postgres://baur@localhost/baur");

    let empty = dir.path().join("empty");
    fs::write(&empty, "  \n").unwrap();
    let err = load_secret(empty.to_str().unwrap()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let missing = dir.path().join("missing");
    assert!(load_secret(missing.to_str().unwrap()).is_err());
}

#[test]
fn test_database_url_prefers_file() {
    use store::database::database_url;
    use store::{DatabaseConfig, StoreError};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database_url");
    fs::write(&path, "postgres://from-file/baur\n").unwrap();

    let mut config = DatabaseConfig::from_url("postgres://from-env/baur");
    assert_eq!(database_url(&config).unwrap(), "postgres://from-env/baur");

    config.database_url_file = Some(path.to_str().unwrap().to_string());
    assert_eq!(database_url(&config).unwrap(), "postgres://from-file/baur");

    config.database_url = None;
    config.database_url_file = None;
    assert!(matches!(database_url(&config), Err(StoreError::Config(_))));
}
