use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{coupon, store_affiliate};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
  #[sea_orm(primary_key)]
  pub id: i32,
  pub name: String,
  /// Grace period in days before delivered commission becomes
  /// withdrawable ("carência").
  pub maturity_days: i32,
  pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(has_many = "store_affiliate::Entity")]
  StoreAffiliates,
  #[sea_orm(has_many = "coupon::Entity")]
  Coupons,
}

impl Related<store_affiliate::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::StoreAffiliates.def()
  }
}

impl Related<coupon::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Coupons.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
