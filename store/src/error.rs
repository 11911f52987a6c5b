/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use super::fingerprint::FingerprintError;
use super::model::ValidationError;
use sea_orm::DbErr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("malformed fingerprint: {0}")]
    MalformedFingerprint(#[from] FingerprintError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid database configuration: {0}")]
    Config(String),
    #[error("connecting to database failed: {0}")]
    Connection(#[source] DbErr),
    #[error("applying database migrations failed: {0}")]
    Migration(#[source] DbErr),
    #[error("{entity} record {key} conflicted on insert but could not be looked up")]
    ConflictRecovery {
        entity: &'static str,
        key: String,
        #[source]
        source: Option<DbErr>,
    },
    #[error("{context} failed: {source}")]
    Storage {
        context: String,
        #[source]
        source: DbErr,
    },
    #[error("operation did not finish within {0:?}")]
    DeadlineExceeded(Duration),
}

impl StoreError {
    pub(crate) fn storage(context: impl Into<String>) -> impl FnOnce(DbErr) -> Self {
        let context = context.into();
        move |source| StoreError::Storage { context, source }
    }
}
