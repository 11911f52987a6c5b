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
                    .table(Input::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Input::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Input::Locator).text().not_null())
                    .col(ColumnDef::new(Input::Fingerprint).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-input-locator-fingerprint")
                    .table(Input::Table)
                    .col(Input::Locator)
                    .col(Input::Fingerprint)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Input::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Input {
    Table,
    Id,
    Locator,
    Fingerprint,
}
