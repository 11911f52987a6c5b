/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Build::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Build::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Build::ApplicationId).uuid().not_null())
                    .col(
                        ColumnDef::new(Build::StartTimestamp)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Build::StopTimestamp)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Build::TotalInputFingerprint)
                            .string()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-build-application_id")
                            .from(Build::Table, Build::ApplicationId)
                            .to(Application::Table, Application::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-build-application_id-start_timestamp")
                    .table(Build::Table)
                    .col(Build::ApplicationId)
                    .col(Build::StartTimestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-build-total_input_fingerprint")
                    .table(Build::Table)
                    .col(Build::TotalInputFingerprint)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Build::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Build {
    Table,
    Id,
    ApplicationId,
    StartTimestamp,
    StopTimestamp,
    TotalInputFingerprint,
}

#[derive(DeriveIden)]
enum Application {
    Table,
    Id,
}
