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
                    .table(BuildOutput::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BuildOutput::BuildId).uuid().not_null())
                    .col(ColumnDef::new(BuildOutput::OutputId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(BuildOutput::BuildId)
                            .col(BuildOutput::OutputId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-build_output-build_id")
                            .from(BuildOutput::Table, BuildOutput::BuildId)
                            .to(Build::Table, Build::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-build_output-output_id")
                            .from(BuildOutput::Table, BuildOutput::OutputId)
                            .to(Output::Table, Output::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BuildOutput::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum BuildOutput {
    Table,
    BuildId,
    OutputId,
}

#[derive(DeriveIden)]
enum Build {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Output {
    Table,
    Id,
}
