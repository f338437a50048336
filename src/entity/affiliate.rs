use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::store_affiliate;

/// Affiliates are never hard-deleted; `Disabled` is the soft removal.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum AffiliateStatus {
  #[sea_orm(string_value = "active")]
  #[default]
  Active,
  #[sea_orm(string_value = "disabled")]
  Disabled,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "affiliates")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
  pub email: String,
  pub pix_key: String,
  pub status: AffiliateStatus,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "store_affiliate::Entity")]
  StoreAffiliates,
}

impl Related<store_affiliate::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::StoreAffiliates.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
