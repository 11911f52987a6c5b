/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod consts;
pub mod database;
pub mod error;
pub mod fingerprint;
pub mod input;
pub mod model;
pub mod storage;
pub mod types;

pub use error::StoreError;
pub use fingerprint::{Algorithm, Fingerprint, FingerprintError};
pub use model::{Application, Build, BuildRecord, Input, Output, OutputKind, Upload, ValidationError};
pub use storage::Storage;
pub use types::DatabaseConfig;
