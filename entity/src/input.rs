/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A build input, unique on `(locator, fingerprint)` and shared by every
/// build that consumed it unchanged.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "input")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub locator: String,
    pub fingerprint: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::build_input::Entity")]
    BuildInput,
}

impl Related<super::build::Entity> for Entity {
    fn to() -> RelationDef {
        super::build_input::Relation::Build.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::build_input::Relation::Input.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
