use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{CommissionType, coupon_link, store, store_affiliate};

/// Which order items the coupon discounts. Items outside the scope
/// never generate commission through this coupon.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum CouponScope {
  #[sea_orm(string_value = "all")]
  #[default]
  All,
  #[sea_orm(string_value = "category")]
  Category,
  #[sea_orm(string_value = "product")]
  Product,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub store_id: i32,
  pub code: String,
  pub discount_type: CommissionType,
  pub discount_value: i64,
  pub scope: CouponScope,
  /// Category name or product id, depending on `scope`.
  pub scope_target: Option<String>,
  /// Legacy single-affiliate link; `coupon_links` is the current model.
  pub store_affiliate_id: Option<i32>,
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
    belongs_to = "store_affiliate::Entity",
    from = "Column::StoreAffiliateId",
    to = "store_affiliate::Column::Id"
  )]
  LegacyStoreAffiliate,
  #[sea_orm(has_many = "coupon_link::Entity")]
  CouponLinks,
}

impl Related<store::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Store.def()
  }
}

impl Related<coupon_link::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::CouponLinks.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
