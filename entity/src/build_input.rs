/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "build_input")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub build_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub input_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Build,
    Input,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Build => Entity::belongs_to(super::build::Entity)
                .from(Column::BuildId)
                .to(super::build::Column::Id)
                .into(),
            Self::Input => Entity::belongs_to(super::input::Entity)
                .from(Column::InputId)
                .to(super::input::Column::Id)
                .into(),
        }
    }
}

impl Related<super::build::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Build.def()
    }
}

impl Related<super::input::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Input.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
