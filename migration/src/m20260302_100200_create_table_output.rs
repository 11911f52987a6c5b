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
                    .table(Output::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Output::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Output::Name).string().not_null())
                    .col(ColumnDef::new(Output::Kind).small_integer().not_null())
                    .col(ColumnDef::new(Output::Fingerprint).string().not_null())
                    .col(ColumnDef::new(Output::SizeBytes).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-output-name-fingerprint-size_bytes")
                    .table(Output::Table)
                    .col(Output::Name)
                    .col(Output::Fingerprint)
                    .col(Output::SizeBytes)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Output::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Output {
    Table,
    Id,
    Name,
    Kind,
    Fingerprint,
    SizeBytes,
}
