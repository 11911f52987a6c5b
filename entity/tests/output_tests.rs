/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for output and upload entities

use entity::*;
use sea_orm::{DatabaseBackend, MockDatabase, entity::prelude::*};
use uuid::Uuid;

#[tokio::test]
async fn test_output_with_uploads() -> Result<(), DbErr> {
    let output_id = Uuid::new_v4();
    let output = output::Model {
        id: output_id,
        name: "bin".to_owned(),
        kind: output::OutputKind::File,
        fingerprint: format!("sha256:{}", "aa".repeat(32)),
        size_bytes: 1024,
    };

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![output.clone()]])
        .append_query_results([vec![
            upload::Model {
                id: Uuid::new_v4(),
                output_id,
                destination_uri: "s3://bucket/bin".to_owned(),
                upload_duration_ms: 1200,
            },
            upload::Model {
                id: Uuid::new_v4(),
                output_id,
                destination_uri: "file:///var/cache/bin".to_owned(),
                upload_duration_ms: 3,
            },
        ]])
        .into_connection();

    let found = output::Entity::find_by_id(output_id).one(&db).await?.unwrap();
    assert_eq!(found, output);
    assert_eq!(found.kind, output::OutputKind::File);

    let uploads = found.find_related(upload::Entity).all(&db).await?;
    assert_eq!(uploads.len(), 2);
    assert!(uploads.iter().all(|u| u.output_id == output_id));
    assert_eq!(uploads[0].upload_duration_ms, 1200);

    Ok(())
}
