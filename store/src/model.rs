/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Build records as handed to and returned from the store.
//!
//! All types validate their fields on construction and are immutable
//! afterwards. Persistence lives in [`crate::storage`].

use super::fingerprint::Fingerprint;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;
use uuid::Uuid;

pub use entity::output::OutputKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation error in field '{field}': {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

/// A task owner, identified by its lower-cased name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Application {
    name: String,
}

impl Application {
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        require_non_empty("application", name)?;

        Ok(Self {
            name: name.trim().to_lowercase(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Build {
    application: Application,
    started_at: DateTime<Utc>,
    stopped_at: DateTime<Utc>,
    total_input_fingerprint: Fingerprint,
}

impl Build {
    pub fn new(
        application: Application,
        started_at: DateTime<Utc>,
        stopped_at: DateTime<Utc>,
        total_input_fingerprint: Fingerprint,
    ) -> Result<Self, ValidationError> {
        if stopped_at < started_at {
            return Err(ValidationError::new(
                "stopped_at",
                format!("{} is before start {}", stopped_at, started_at),
            ));
        }

        Ok(Self {
            application,
            started_at,
            stopped_at,
            total_input_fingerprint,
        })
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn stopped_at(&self) -> DateTime<Utc> {
        self.stopped_at
    }

    pub fn total_input_fingerprint(&self) -> &Fingerprint {
        &self.total_input_fingerprint
    }
}

/// A source consumed by a build. The locator is opaque to the store: a repo
/// relative path, a URL, or whatever the resolver produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Input {
    locator: String,
    fingerprint: Fingerprint,
}

impl Input {
    pub fn new(locator: impl Into<String>, fingerprint: Fingerprint) -> Result<Self, ValidationError> {
        let locator = locator.into();
        require_non_empty("locator", &locator)?;

        Ok(Self {
            locator,
            fingerprint,
        })
    }

    /// Fingerprint over the whole input set, independent of input order.
    pub fn total_fingerprint(inputs: &[Input]) -> Fingerprint {
        Fingerprint::total(inputs.iter().map(|input| &input.fingerprint))
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    name: String,
    kind: OutputKind,
    fingerprint: Fingerprint,
    size_bytes: u64,
    uploads: Vec<Upload>,
}

impl Output {
    pub fn new(
        name: impl Into<String>,
        kind: OutputKind,
        fingerprint: Fingerprint,
        size_bytes: u64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        require_non_empty("name", &name)?;

        if i64::try_from(size_bytes).is_err() {
            return Err(ValidationError::new(
                "size_bytes",
                format!("{} exceeds {}", size_bytes, i64::MAX),
            ));
        }

        Ok(Self {
            name,
            kind,
            fingerprint,
            size_bytes,
            uploads: Vec::new(),
        })
    }

    pub fn with_upload(mut self, upload: Upload) -> Self {
        self.uploads.push(upload);
        self
    }

    pub fn with_uploads(mut self, uploads: impl IntoIterator<Item = Upload>) -> Self {
        self.uploads.extend(uploads);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }
}

/// One placement of an output, e.g. an object in a bucket or an image tag in a
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upload {
    destination_uri: String,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    duration: Duration,
}

impl Upload {
    pub fn new(destination_uri: impl Into<String>, duration: Duration) -> Result<Self, ValidationError> {
        let destination_uri = destination_uri.into();
        require_non_empty("destination_uri", &destination_uri)?;

        if i64::try_from(duration.as_millis()).is_err() {
            return Err(ValidationError::new(
                "duration",
                format!("{:?} does not fit into milliseconds", duration),
            ));
        }

        Ok(Self {
            destination_uri,
            duration,
        })
    }

    pub fn destination_uri(&self) -> &str {
        &self.destination_uri
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// A stored build together with everything linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildRecord {
    pub id: Uuid,
    pub build: Build,
    pub outputs: Vec<Output>,
    pub inputs: Vec<Input>,
}
