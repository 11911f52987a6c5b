/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeriveActiveEnum, EnumIter, Deserialize, Serialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[sea_orm(num_value = 0)]
    File,
    #[sea_orm(num_value = 1)]
    #[serde(rename = "docker")]
    DockerImage,
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::File => write!(f, "file"),
            OutputKind::DockerImage => write!(f, "docker"),
        }
    }
}

/// A build artifact, unique on `(name, fingerprint, size_bytes)`. The same
/// artifact produced by several builds is stored once.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "output")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: OutputKind,
    pub fingerprint: String,
    pub size_bytes: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::upload::Entity")]
    Upload,
    #[sea_orm(has_many = "super::build_output::Entity")]
    BuildOutput,
}

impl Related<super::upload::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upload.def()
    }
}

impl Related<super::build::Entity> for Entity {
    fn to() -> RelationDef {
        super::build_output::Relation::Build.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::build_output::Relation::Output.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
