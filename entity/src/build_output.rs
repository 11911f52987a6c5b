/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "build_output")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub build_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub output_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Build,
    Output,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Build => Entity::belongs_to(super::build::Entity)
                .from(Column::BuildId)
                .to(super::build::Column::Id)
                .into(),
            Self::Output => Entity::belongs_to(super::output::Entity)
                .from(Column::OutputId)
                .to(super::output::Column::Id)
                .into(),
        }
    }
}

impl Related<super::build::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Build.def()
    }
}

impl Related<super::output::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Output.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
