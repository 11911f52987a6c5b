/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Transactional persistence of build records.
//!
//! A [`Storage::save`] writes the whole graph of one build in a single
//! transaction. Applications, inputs and outputs are identified by their
//! natural key and are inserted with `ON CONFLICT DO NOTHING` inside a
//! savepoint, followed by a lookup when the row already existed. Concurrent
//! writers introducing the same key therefore end up sharing one row instead
//! of failing. Join and upload rows are only ever appended.

use super::consts::NATURAL_KEY_ATTEMPTS;
use super::database::connect_db;
use super::error::StoreError;
use super::fingerprint::Fingerprint;
use super::model::*;
use super::types::*;
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder,
    QuerySelect, SqlErr, TransactionTrait,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, Span, debug, debug_span, info, info_span, warn};
use uuid::Uuid;

/// Handle to the build cache database.
///
/// Cloning is cheap and shares the underlying connection pool. Every
/// operation logs below the span given to [`Storage::with_span`].
#[derive(Debug, Clone)]
pub struct Storage {
    db: Arc<DatabaseConnection>,
    span: Span,
}

/// Natural key of a deduplicated row and how to find the row owning it.
struct NaturalKey<E: EntityTrait> {
    entity: &'static str,
    key: String,
    columns: Vec<E::Column>,
    filter: Condition,
    id: E::Column,
}

impl Storage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db: Arc::new(db),
            span: info_span!("storage"),
        }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Ok(Self::new(connect_db(config).await?))
    }

    pub async fn connect_url(url: &str) -> Result<Self, StoreError> {
        Self::connect(&DatabaseConfig::from_url(url)).await
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Closes the pool once this is the last handle. Clones still alive keep
    /// the pool open and it is closed when the last of them is dropped.
    pub async fn close(self) -> Result<(), StoreError> {
        let Self { db, span } = self;
        match Arc::try_unwrap(db) {
            Ok(db) => db.close().await.map_err(StoreError::Connection),
            Err(_) => {
                debug!(parent: &span, "connection still shared, not closing");
                Ok(())
            }
        }
    }

    /// Persists a finished build with its outputs, their uploads and its
    /// inputs. Either everything becomes visible or nothing does.
    pub async fn save(
        &self,
        build: &Build,
        outputs: &[Output],
        inputs: &[Input],
    ) -> Result<Uuid, StoreError> {
        let span = info_span!(
            parent: &self.span,
            "save",
            application = build.application().name(),
            outputs = outputs.len(),
            inputs = inputs.len(),
            build_id = tracing::field::Empty,
        );

        async {
            let txn = self
                .db
                .begin()
                .await
                .map_err(StoreError::storage("starting transaction"))?;

            match store_build(&txn, build, outputs, inputs).await {
                Ok(build_id) => {
                    txn.commit()
                        .await
                        .map_err(StoreError::storage("committing transaction"))?;

                    Span::current().record("build_id", tracing::field::display(build_id));
                    info!("stored build");
                    Ok(build_id)
                }
                Err(err) => {
                    if let Err(rollback_err) = txn.rollback().await {
                        warn!(error = %rollback_err, "rolling back transaction failed");
                    }

                    warn!(error = %err, "storing build failed, nothing was persisted");
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Like [`Storage::save`] but gives up once `deadline` has passed. The
    /// abandoned transaction is rolled back when it is dropped.
    pub async fn save_within(
        &self,
        deadline: Duration,
        build: &Build,
        outputs: &[Output],
        inputs: &[Input],
    ) -> Result<Uuid, StoreError> {
        match tokio::time::timeout(deadline, self.save(build, outputs, inputs)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(parent: &self.span, ?deadline, "save exceeded its deadline");
                Err(StoreError::DeadlineExceeded(deadline))
            }
        }
    }

    /// Most recent builds of an application, newest start time first.
    pub async fn list_builds_per_app(
        &self,
        app_name: &str,
        max_results: usize,
    ) -> Result<Vec<BuildRecord>, StoreError> {
        let application = Application::new(app_name)?;
        let span = debug_span!(
            parent: &self.span,
            "list_builds_per_app",
            application = application.name(),
            max_results,
        );

        async {
            if max_results == 0 {
                return Ok(Vec::new());
            }

            let Some(app) = self.find_application(&application).await? else {
                debug!("application has no builds");
                return Ok(Vec::new());
            };

            let builds = EBuild::find()
                .filter(CBuild::ApplicationId.eq(app.id))
                .order_by_desc(CBuild::StartTimestamp)
                .order_by_desc(CBuild::StopTimestamp)
                .limit(u64::try_from(max_results).unwrap_or(u64::MAX))
                .all(self.connection())
                .await
                .map_err(StoreError::storage(format!(
                    "listing builds of application {}",
                    application.name()
                )))?;

            let mut records = Vec::with_capacity(builds.len());
            for build in builds {
                records.push(load_record(self.connection(), application.clone(), build).await?);
            }

            Ok(records)
        }
        .instrument(span)
        .await
    }

    /// Newest build of an application whose inputs had the given total
    /// fingerprint, i.e. the build a cache hit would reuse.
    pub async fn find_latest_build_by_fingerprint(
        &self,
        app_name: &str,
        total_input_fingerprint: &Fingerprint,
    ) -> Result<Option<BuildRecord>, StoreError> {
        let application = Application::new(app_name)?;
        let span = debug_span!(
            parent: &self.span,
            "find_latest_build_by_fingerprint",
            application = application.name(),
            fingerprint = %total_input_fingerprint,
        );

        async {
            let Some(app) = self.find_application(&application).await? else {
                return Ok(None);
            };

            let build = EBuild::find()
                .filter(CBuild::ApplicationId.eq(app.id))
                .filter(CBuild::TotalInputFingerprint.eq(total_input_fingerprint.to_string()))
                .order_by_desc(CBuild::StartTimestamp)
                .order_by_desc(CBuild::StopTimestamp)
                .one(self.connection())
                .await
                .map_err(StoreError::storage(format!(
                    "looking up build of application {} by fingerprint {}",
                    application.name(),
                    total_input_fingerprint
                )))?;

            match build {
                Some(build) => {
                    debug!(build_id = %build.id, "cache hit");
                    Ok(Some(load_record(self.connection(), application, build).await?))
                }
                None => {
                    debug!("cache miss");
                    Ok(None)
                }
            }
        }
        .instrument(span)
        .await
    }

    pub async fn get_build(&self, id: Uuid) -> Result<Option<BuildRecord>, StoreError> {
        let span = debug_span!(parent: &self.span, "get_build", build_id = %id);

        async {
            let found = EBuild::find_by_id(id)
                .find_also_related(entity::application::Entity)
                .one(self.connection())
                .await
                .map_err(StoreError::storage(format!("looking up build {}", id)))?;

            match found {
                Some((build, Some(app))) => {
                    let application = Application::new(&app.name)?;
                    Ok(Some(load_record(self.connection(), application, build).await?))
                }
                Some((_, None)) => Err(StoreError::Storage {
                    context: format!("looking up application of build {}", id),
                    source: DbErr::RecordNotFound(format!("application of build {}", id)),
                }),
                None => Ok(None),
            }
        }
        .instrument(span)
        .await
    }

    async fn find_application(
        &self,
        application: &Application,
    ) -> Result<Option<MApplication>, StoreError> {
        EApplication::find()
            .filter(CApplication::Name.eq(application.name()))
            .one(self.connection())
            .await
            .map_err(StoreError::storage(format!(
                "looking up application {}",
                application.name()
            )))
    }
}

/// Writes the build graph in dependency order. Rows referenced by identity
/// are always created before the rows referencing them.
async fn store_build(
    txn: &DatabaseTransaction,
    build: &Build,
    outputs: &[Output],
    inputs: &[Input],
) -> Result<Uuid, StoreError> {
    let application_id = store_application(txn, build.application()).await?;

    let build_id = Uuid::new_v4();
    let abuild = ABuild {
        id: Set(build_id),
        application_id: Set(application_id),
        start_timestamp: Set(build.started_at().naive_utc()),
        stop_timestamp: Set(build.stopped_at().naive_utc()),
        total_input_fingerprint: Set(build.total_input_fingerprint().to_string()),
    };

    abuild
        .insert(txn)
        .await
        .map_err(StoreError::storage("storing build record"))?;

    for output in outputs {
        store_output(txn, build_id, output).await?;
    }

    for input in inputs {
        store_input(txn, build_id, input).await?;
    }

    Ok(build_id)
}

async fn store_application(
    txn: &DatabaseTransaction,
    application: &Application,
) -> Result<Uuid, StoreError> {
    let key = NaturalKey::<EApplication> {
        entity: "application",
        key: application.name().to_string(),
        columns: vec![CApplication::Name],
        filter: Condition::all().add(CApplication::Name.eq(application.name())),
        id: CApplication::Id,
    };

    let id = Uuid::new_v4();
    let aapplication = AApplication {
        id: Set(id),
        name: Set(application.name().to_string()),
    };

    insert_or_get(txn, &key, id, aapplication).await
}

async fn store_output(
    txn: &DatabaseTransaction,
    build_id: Uuid,
    output: &Output,
) -> Result<(), StoreError> {
    let fingerprint = output.fingerprint().to_string();
    let size_bytes = i64::try_from(output.size_bytes())
        .map_err(|_| ValidationError::new("size_bytes", "exceeds the storable range"))?;

    let key = NaturalKey::<EOutput> {
        entity: "output",
        key: format!("{} ({}, {} bytes)", output.name(), fingerprint, size_bytes),
        columns: vec![COutput::Name, COutput::Fingerprint, COutput::SizeBytes],
        filter: Condition::all()
            .add(COutput::Name.eq(output.name()))
            .add(COutput::Fingerprint.eq(fingerprint.as_str()))
            .add(COutput::SizeBytes.eq(size_bytes)),
        id: COutput::Id,
    };

    let id = Uuid::new_v4();
    let aoutput = AOutput {
        id: Set(id),
        name: Set(output.name().to_string()),
        kind: Set(output.kind()),
        fingerprint: Set(fingerprint.clone()),
        size_bytes: Set(size_bytes),
    };

    let output_id = insert_or_get(txn, &key, id, aoutput).await?;

    EBuildOutput::insert(ABuildOutput {
        build_id: Set(build_id),
        output_id: Set(output_id),
    })
    .on_conflict(
        OnConflict::columns([CBuildOutput::BuildId, CBuildOutput::OutputId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await
    .map_err(StoreError::storage(format!(
        "storing build_output record for output {}",
        key.key
    )))?;

    for upload in output.uploads() {
        let duration_ms = i64::try_from(upload.duration().as_millis())
            .map_err(|_| ValidationError::new("duration", "exceeds the storable range"))?;

        let aupload = AUpload {
            id: Set(Uuid::new_v4()),
            output_id: Set(output_id),
            destination_uri: Set(upload.destination_uri().to_string()),
            upload_duration_ms: Set(duration_ms),
        };

        aupload.insert(txn).await.map_err(StoreError::storage(format!(
            "storing upload record {} for output {}",
            upload.destination_uri(),
            key.key
        )))?;
    }

    Ok(())
}

async fn store_input(
    txn: &DatabaseTransaction,
    build_id: Uuid,
    input: &Input,
) -> Result<(), StoreError> {
    let fingerprint = input.fingerprint().to_string();

    let key = NaturalKey::<EInput> {
        entity: "input",
        key: format!("{} ({})", input.locator(), fingerprint),
        columns: vec![CInput::Locator, CInput::Fingerprint],
        filter: Condition::all()
            .add(CInput::Locator.eq(input.locator()))
            .add(CInput::Fingerprint.eq(fingerprint.as_str())),
        id: CInput::Id,
    };

    let id = Uuid::new_v4();
    let ainput = AInput {
        id: Set(id),
        locator: Set(input.locator().to_string()),
        fingerprint: Set(fingerprint.clone()),
    };

    let input_id = insert_or_get(txn, &key, id, ainput).await?;

    EBuildInput::insert(ABuildInput {
        build_id: Set(build_id),
        input_id: Set(input_id),
    })
    .on_conflict(
        OnConflict::columns([CBuildInput::BuildId, CBuildInput::InputId])
            .do_nothing()
            .to_owned(),
    )
    .exec_without_returning(txn)
    .await
    .map_err(StoreError::storage(format!(
        "storing build_input record for input {}",
        key.key
    )))?;

    Ok(())
}

/// Inserts `row` unless a row with the same natural key exists and returns
/// the identity of whichever row owns the key afterwards.
///
/// The insert runs in a savepoint so that a unique violation raised by a
/// store without conflict clauses leaves the enclosing transaction usable. A
/// lookup that finds nothing after a conflict means the competing row is not
/// visible to this transaction yet; the sequence is retried a bounded number
/// of times.
async fn insert_or_get<A>(
    txn: &DatabaseTransaction,
    key: &NaturalKey<A::Entity>,
    id: Uuid,
    row: A,
) -> Result<Uuid, StoreError>
where
    A: ActiveModelTrait + Clone + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let on_conflict = OnConflict::columns(key.columns.clone())
        .do_nothing()
        .to_owned();

    for attempt in 1..=NATURAL_KEY_ATTEMPTS {
        let savepoint = txn.begin().await.map_err(StoreError::storage(format!(
            "opening savepoint for {} record {}",
            key.entity, key.key
        )))?;

        let inserted = <A::Entity as EntityTrait>::insert(row.clone())
            .on_conflict(on_conflict.clone())
            .exec_without_returning(&savepoint)
            .await;

        match inserted {
            Ok(0) => release(savepoint, key).await?,
            Ok(_) => {
                release(savepoint, key).await?;
                debug!(entity = key.entity, key = %key.key, %id, "created record");
                return Ok(id);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await.map_err(StoreError::storage(format!(
                    "rolling back savepoint for {} record {}",
                    key.entity, key.key
                )))?;
            }
            Err(err) => {
                return Err(StoreError::Storage {
                    context: format!("storing {} record {}", key.entity, key.key),
                    source: err,
                });
            }
        }

        let existing = <A::Entity as EntityTrait>::find()
            .select_only()
            .column(key.id)
            .filter(key.filter.clone())
            .into_tuple::<Uuid>()
            .one(txn)
            .await
            .map_err(|source| StoreError::ConflictRecovery {
                entity: key.entity,
                key: key.key.clone(),
                source: Some(source),
            })?;

        if let Some(existing) = existing {
            debug!(entity = key.entity, key = %key.key, id = %existing, "reusing existing record");
            return Ok(existing);
        }

        warn!(
            entity = key.entity,
            key = %key.key,
            attempt,
            "insert conflicted but the existing record is not visible, retrying"
        );
    }

    Err(StoreError::ConflictRecovery {
        entity: key.entity,
        key: key.key.clone(),
        source: None,
    })
}

async fn release<E: EntityTrait>(
    savepoint: DatabaseTransaction,
    key: &NaturalKey<E>,
) -> Result<(), StoreError> {
    savepoint.commit().await.map_err(StoreError::storage(format!(
        "releasing savepoint for {} record {}",
        key.entity, key.key
    )))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Rows are append-only and a build's graph commits atomically, so any build
/// visible here already has all of its links; no transaction is needed.
async fn load_record<C: ConnectionTrait>(
    db: &C,
    application: Application,
    row: MBuild,
) -> Result<BuildRecord, StoreError> {
    let context = format!("loading build {}", row.id);

    let output_rows = row
        .find_related(entity::output::Entity)
        .order_by_asc(COutput::Name)
        .order_by_asc(COutput::Fingerprint)
        .all(db)
        .await
        .map_err(StoreError::storage(context.clone()))?;

    let mut outputs = Vec::with_capacity(output_rows.len());
    for output_row in output_rows {
        let upload_rows = output_row
            .find_related(entity::upload::Entity)
            .order_by_asc(CUpload::DestinationUri)
            .all(db)
            .await
            .map_err(StoreError::storage(context.clone()))?;

        outputs.push(output_from_rows(output_row, upload_rows)?);
    }

    let inputs = row
        .find_related(entity::input::Entity)
        .order_by_asc(CInput::Locator)
        .order_by_asc(CInput::Fingerprint)
        .all(db)
        .await
        .map_err(StoreError::storage(context))?
        .into_iter()
        .map(input_from_row)
        .collect::<Result<Vec<_>, _>>()?;

    let build = Build::new(
        application,
        row.start_timestamp.and_utc(),
        row.stop_timestamp.and_utc(),
        row.total_input_fingerprint.parse()?,
    )?;

    Ok(BuildRecord {
        id: row.id,
        build,
        outputs,
        inputs,
    })
}

fn output_from_rows(row: MOutput, uploads: Vec<MUpload>) -> Result<Output, StoreError> {
    let size_bytes = u64::try_from(row.size_bytes)
        .map_err(|_| ValidationError::new("size_bytes", format!("negative size {}", row.size_bytes)))?;

    let uploads = uploads
        .into_iter()
        .map(|upload| {
            let duration_ms = u64::try_from(upload.upload_duration_ms).map_err(|_| {
                ValidationError::new(
                    "duration",
                    format!("negative duration {}ms", upload.upload_duration_ms),
                )
            })?;
            Upload::new(upload.destination_uri, Duration::from_millis(duration_ms))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Output::new(row.name, row.kind, row.fingerprint.parse()?, size_bytes)?.with_uploads(uploads))
}

fn input_from_row(row: MInput) -> Result<Input, StoreError> {
    Ok(Input::new(row.locator, row.fingerprint.parse()?)?)
}
