/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

pub use sea_orm_migration::prelude::*;

mod m20260302_100000_create_table_application;
mod m20260302_100100_create_table_build;
mod m20260302_100200_create_table_output;
mod m20260302_100300_create_table_input;
mod m20260302_100400_create_table_build_output;
mod m20260302_100500_create_table_build_input;
mod m20260302_100600_create_table_upload;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260302_100000_create_table_application::Migration),
            Box::new(m20260302_100100_create_table_build::Migration),
            Box::new(m20260302_100200_create_table_output::Migration),
            Box::new(m20260302_100300_create_table_input::Migration),
            Box::new(m20260302_100400_create_table_build_output::Migration),
            Box::new(m20260302_100500_create_table_build_input::Migration),
            Box::new(m20260302_100600_create_table_upload::Migration),
        ]
    }
}
