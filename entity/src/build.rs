/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "build")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub application_id: Uuid,
    pub start_timestamp: NaiveDateTime,
    pub stop_timestamp: NaiveDateTime,
    pub total_input_fingerprint: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::application::Entity",
        from = "Column::ApplicationId",
        to = "super::application::Column::Id"
    )]
    Application,
    #[sea_orm(has_many = "super::build_output::Entity")]
    BuildOutput,
    #[sea_orm(has_many = "super::build_input::Entity")]
    BuildInput,
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Application.def()
    }
}

impl Related<super::output::Entity> for Entity {
    fn to() -> RelationDef {
        super::build_output::Relation::Output.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::build_output::Relation::Build.def().rev())
    }
}

impl Related<super::input::Entity> for Entity {
    fn to() -> RelationDef {
        super::build_input::Relation::Input.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::build_input::Relation::Build.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
