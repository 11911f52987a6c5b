/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub mod application;
pub mod build;
pub mod build_input;
pub mod build_output;
pub mod input;
pub mod output;
pub mod upload;
