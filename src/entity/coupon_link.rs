use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{coupon, store_affiliate};

/// Junction binding a coupon to the store-affiliate links it earns
/// for. Permanent once any earning is attributed through the coupon.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupon_links")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub coupon_id: i32,
  #[sea_orm(primary_key, auto_increment = false)]
  pub store_affiliate_id: i32,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "coupon::Entity",
    from = "Column::CouponId",
    to = "coupon::Column::Id"
  )]
  Coupon,
  #[sea_orm(
    belongs_to = "store_affiliate::Entity",
    from = "Column::StoreAffiliateId",
    to = "store_affiliate::Column::Id"
  )]
  StoreAffiliate,
}

impl Related<coupon::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Coupon.def()
  }
}

impl Related<store_affiliate::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::StoreAffiliate.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
