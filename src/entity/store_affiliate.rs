use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{affiliate, commission_rule, earning, store};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
  #[sea_orm(string_value = "invited")]
  #[default]
  Invited,
  #[sea_orm(string_value = "active")]
  Active,
  #[sea_orm(string_value = "rejected")]
  Rejected,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CommissionType {
  /// Integer percent of the item's post-discount value, 1..=100.
  #[sea_orm(string_value = "percentage")]
  #[default]
  Percentage,
  /// Centavos per unit sold.
  #[sea_orm(string_value = "fixed")]
  Fixed,
}

/// The per-store contract of one affiliate. At most one row per
/// (store, affiliate) pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "store_affiliates")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub store_id: i32,
  pub affiliate_id: i32,
  pub status: LinkStatus,
  pub commission_type: CommissionType,
  pub commission_value: i64,
  pub commission_enabled: bool,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "store::Entity",
    from = "Column::StoreId",
    to = "store::Column::Id"
  )]
  Store,
  #[sea_orm(
    belongs_to = "affiliate::Entity",
    from = "Column::AffiliateId",
    to = "affiliate::Column::Id"
  )]
  Affiliate,
  #[sea_orm(has_many = "commission_rule::Entity")]
  CommissionRules,
  #[sea_orm(has_many = "earning::Entity")]
  Earnings,
}

impl Related<store::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Store.def()
  }
}

impl Related<affiliate::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Affiliate.def()
  }
}

impl Related<commission_rule::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::CommissionRules.def()
  }
}

impl Related<earning::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Earnings.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
