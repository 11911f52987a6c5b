/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

//! Content fingerprints in their `<algorithm>:<value>` text form.

use super::consts::FINGERPRINT_SEPARATOR;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    Sha256,
}

impl Algorithm {
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Sha256 => "sha256",
        }
    }

    /// Length of the hex encoded digest.
    pub const fn value_len(self) -> usize {
        match self {
            Algorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Algorithm::Sha256),
            other => Err(FingerprintError::UnknownAlgorithm(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FingerprintError {
    #[error("invalid format, must contain exactly 1 ':' but has {0}")]
    SeparatorCount(usize),
    #[error("unsupported algorithm {0:?}")]
    UnknownAlgorithm(String),
    #[error("{algorithm} value length is {actual}, expected length {expected}")]
    ValueLength {
        algorithm: Algorithm,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint {
    algorithm: Algorithm,
    value: String,
}

impl Fingerprint {
    pub fn new(algorithm: Algorithm, value: impl Into<String>) -> Result<Self, FingerprintError> {
        let value = value.into();

        let separators = value.matches(FINGERPRINT_SEPARATOR).count();
        if separators > 0 {
            return Err(FingerprintError::SeparatorCount(separators + 1));
        }

        if value.len() != algorithm.value_len() {
            return Err(FingerprintError::ValueLength {
                algorithm,
                expected: algorithm.value_len(),
                actual: value.len(),
            });
        }

        Ok(Self { algorithm, value })
    }

    /// Fingerprints arbitrary bytes with sha256.
    pub fn sha256(data: impl AsRef<[u8]>) -> Self {
        Self {
            algorithm: Algorithm::Sha256,
            value: hex::encode(Sha256::digest(data.as_ref())),
        }
    }

    /// Combines fingerprints into one that does not depend on their order or
    /// on duplicates.
    pub fn total<'a, I>(fingerprints: I) -> Self
    where
        I: IntoIterator<Item = &'a Fingerprint>,
    {
        let sorted: BTreeSet<String> = fingerprints
            .into_iter()
            .map(ToString::to_string)
            .collect();

        let mut hasher = Sha256::new();
        for fingerprint in &sorted {
            hasher.update(fingerprint.as_bytes());
            hasher.update(b"\n");
        }

        Self {
            algorithm: Algorithm::Sha256,
            value: hex::encode(hasher.finalize()),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.algorithm, FINGERPRINT_SEPARATOR, self.value)
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(FINGERPRINT_SEPARATOR).collect();

        match parts.as_slice() {
            [algorithm, value] => Fingerprint::new(algorithm.parse()?, *value),
            _ => Err(FingerprintError::SeparatorCount(parts.len() - 1)),
        }
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(fingerprint: Fingerprint) -> Self {
        fingerprint.to_string()
    }
}
