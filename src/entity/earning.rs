use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{coupon, store_affiliate};
use crate::order::OrderStatus;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum EarningStatus {
  #[sea_orm(string_value = "pending")]
  #[default]
  Pending,
  #[sea_orm(string_value = "approved")]
  Approved,
  /// Settled through a withdrawal; the only state excluded from the
  /// withdrawable balance.
  #[sea_orm(string_value = "paid")]
  Paid,
  #[sea_orm(string_value = "cancelled")]
  Cancelled,
}

/// One commission record per (order, store-affiliate link). Rows are
/// never deleted; cancelled orders keep their amount for audit.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "earnings")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  /// Order id as issued by the commerce subsystem.
  pub order_id: String,
  pub store_affiliate_id: i32,
  pub coupon_id: Option<i32>,
  pub order_total: i64,
  pub commission_amount: i64,
  pub status: EarningStatus,
  /// Last order status seen from the commerce subsystem.
  pub order_status: OrderStatus,
  pub delivered_at: Option<DateTime>,
  pub commission_available_at: Option<DateTime>,
  pub needs_reconciliation: bool,
  pub paid_at: Option<DateTime>,
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
  #[sea_orm(
    belongs_to = "coupon::Entity",
    from = "Column::CouponId",
    to = "coupon::Column::Id"
  )]
  Coupon,
}

impl Related<store_affiliate::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::StoreAffiliate.def()
  }
}

impl Related<coupon::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Coupon.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
