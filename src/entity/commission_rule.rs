use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{CommissionType, store_affiliate};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum RuleAppliesTo {
  #[sea_orm(string_value = "product")]
  #[default]
  Product,
  #[sea_orm(string_value = "category")]
  Category,
}

/// Per-affiliate override of the default commission for one product
/// or one category. At most one rule per (link, applies_to, target).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "commission_rules")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub store_affiliate_id: i32,
  pub applies_to: RuleAppliesTo,
  /// Product id or category name, depending on `applies_to`.
  pub target: String,
  pub target_name: String,
  pub commission_type: CommissionType,
  pub commission_value: i64,
  pub created_at: DateTime,
  pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "store_affiliate::Entity",
    from = "Column::StoreAffiliateId",
    to = "store_affiliate::Column::Id"
  )]
  StoreAffiliate,
}

impl Related<store_affiliate::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::StoreAffiliate.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
