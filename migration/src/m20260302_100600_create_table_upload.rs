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
                    .table(Upload::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Upload::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Upload::OutputId).uuid().not_null())
                    .col(ColumnDef::new(Upload::DestinationUri).text().not_null())
                    .col(
                        ColumnDef::new(Upload::UploadDurationMs)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-upload-output_id")
                            .from(Upload::Table, Upload::OutputId)
                            .to(Output::Table, Output::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Upload::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Upload {
    Table,
    Id,
    OutputId,
    DestinationUri,
    UploadDurationMs,
}

#[derive(DeriveIden)]
enum Output {
    Table,
    Id,
}
