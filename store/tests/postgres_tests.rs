/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Tests for the storage engine against Postgres.
//!
//! They run when `BAUR_TEST_DATABASE_URL` points at a database the tests may
//! write to and pass trivially otherwise.

mod common;

use common::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::sync::Arc;
use std::time::Duration;
use store::types::*;
use store::*;
use tokio::sync::Barrier;

#[tokio::test]
async fn test_postgres_list_returns_outputs() {
    let Some(storage) = postgres_storage().await else {
        return;
    };

    let run = run_id();
    let app = format!("svc-a-{run}");

    let output = Output::new(
        format!("bin-{run}"),
        OutputKind::DockerImage,
        fingerprint(&format!("bin-{run}")),
        1024,
    )
    .unwrap()
    .with_upload(Upload::new("s3://bucket/bin", Duration::from_millis(1200)).unwrap());
    let inputs = vec![input(&format!("build-{run}.sh"), &run)];
    let build = build(&app, 0, 1, &inputs);

    let id = storage
        .save(&build, std::slice::from_ref(&output), &inputs)
        .await
        .unwrap();

    let records = storage.list_builds_per_app(&app, 10).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, id);
    assert_eq!(records[0].build, build);
    assert_eq!(records[0].outputs, vec![output]);
    assert_eq!(records[0].inputs, inputs);

    let hit = storage
        .find_latest_build_by_fingerprint(&app, build.total_input_fingerprint())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(hit.id, id);
    assert_eq!(hit.outputs[0].kind(), OutputKind::DockerImage);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_postgres_racing_saves_share_rows() {
    let Some(storage) = postgres_storage().await else {
        return;
    };

    let writers: u32 = 10;
    let run = run_id();
    let app = format!("svc-race-{run}");
    let output_name = format!("shared-bin-{run}");
    let shared_locator = format!("shared-{run}.go");
    let barrier = Arc::new(Barrier::new(writers as usize));

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let storage = storage.clone();
            let barrier = Arc::clone(&barrier);
            let app = app.clone();
            let output_name = output_name.clone();
            let shared_locator = shared_locator.clone();

            tokio::spawn(async move {
                let inputs = vec![input(&shared_locator, &shared_locator)];
                let outputs = vec![file_output(
                    &output_name,
                    &output_name,
                    42,
                    &[format!("s3://bucket/{output_name}/{i}").as_str()],
                )];
                let build = build(&app, i, i + 1, &inputs);

                barrier.wait().await;
                storage.save(&build, &outputs, &inputs).await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let outputs = EOutput::find()
        .filter(COutput::Name.eq(output_name.as_str()))
        .count(storage.connection())
        .await
        .unwrap();
    assert_eq!(outputs, 1);

    let inputs = EInput::find()
        .filter(CInput::Locator.eq(shared_locator.as_str()))
        .count(storage.connection())
        .await
        .unwrap();
    assert_eq!(inputs, 1);

    let applications = EApplication::find()
        .filter(CApplication::Name.eq(app.as_str()))
        .count(storage.connection())
        .await
        .unwrap();
    assert_eq!(applications, 1);

    let records = storage
        .list_builds_per_app(&app, writers as usize * 2)
        .await
        .unwrap();
    assert_eq!(records.len(), writers as usize);

    for record in &records {
        assert_eq!(record.outputs.len(), 1);
        assert_eq!(record.outputs[0].name(), output_name);
        assert_eq!(record.outputs[0].uploads().len(), writers as usize);
        assert_eq!(record.inputs.len(), 1);
    }
}
