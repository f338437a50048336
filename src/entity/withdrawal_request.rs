use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{affiliate, store};

/// `pending -> {paid, rejected}`; both outcomes are terminal and a
/// request never re-enters `pending`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
  #[sea_orm(string_value = "pending")]
  #[default]
  Pending,
  #[sea_orm(string_value = "paid")]
  Paid,
  #[sea_orm(string_value = "rejected")]
  Rejected,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "withdrawal_requests")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub store_id: i32,
  pub affiliate_id: i32,
  pub amount: i64,
  pub pix_key: String,
  pub status: WithdrawalStatus,
  pub admin_notes: Option<String>,
  pub requested_at: DateTime,
  pub paid_at: Option<DateTime>,
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

impl ActiveModelBehavior for ActiveModel {}
