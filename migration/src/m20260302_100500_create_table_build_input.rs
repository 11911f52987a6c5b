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
                    .table(BuildInput::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BuildInput::BuildId).uuid().not_null())
                    .col(ColumnDef::new(BuildInput::InputId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(BuildInput::BuildId)
                            .col(BuildInput::InputId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-build_input-build_id")
                            .from(BuildInput::Table, BuildInput::BuildId)
                            .to(Build::Table, Build::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-build_input-input_id")
                            .from(BuildInput::Table, BuildInput::InputId)
                            .to(Input::Table, Input::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BuildInput::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BuildInput {
    Table,
    BuildId,
    InputId,
}

#[derive(DeriveIden)]
enum Build {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Input {
    Table,
    Id,
}
