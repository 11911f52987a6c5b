/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for entity enums

use entity::*;
use sea_orm::{ActiveEnum, ColumnType};

#[test]
fn test_output_kind_display() {
    assert_eq!(output::OutputKind::File.to_string(), "file");
    assert_eq!(output::OutputKind::DockerImage.to_string(), "docker");
}

#[test]
fn test_output_kind_db_values() {
    assert_eq!(output::OutputKind::File.to_value(), 0);
    assert_eq!(output::OutputKind::DockerImage.to_value(), 1);
    assert_eq!(
        output::OutputKind::try_from_value(&1).unwrap(),
        output::OutputKind::DockerImage
    );
    assert!(output::OutputKind::try_from_value(&7).is_err());
}

#[test]
fn test_output_kind_serde() {
    assert_eq!(
        serde_json::to_string(&output::OutputKind::DockerImage).unwrap(),
        "\"docker\""
    );
    assert_eq!(
        serde_json::from_str::<output::OutputKind>("\"file\"").unwrap(),
        output::OutputKind::File
    );
}

#[test]
fn test_output_kind_column_is_small_integer() {
    assert_eq!(
        output::OutputKind::db_type().get_column_type(),
        &ColumnType::SmallInteger
    );
}
