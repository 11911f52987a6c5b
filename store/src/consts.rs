/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use std::time::Duration;

/// How often the insert-then-lookup sequence for a single natural key is tried
/// before the save is aborted with a conflict recovery error.
pub const NATURAL_KEY_ATTEMPTS: usize = 5;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(8);
pub const DEFAULT_LIST_LIMIT: usize = 10;

pub const FINGERPRINT_SEPARATOR: char = ':';
