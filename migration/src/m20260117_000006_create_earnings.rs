use sea_orm_migration::prelude::*;

use super::{
  m20260115_000003_create_store_affiliates::StoreAffiliates,
  m20260116_000004_create_coupons::Coupons,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Earnings::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Earnings::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Earnings::OrderId).string().not_null())
          .col(
            ColumnDef::new(Earnings::StoreAffiliateId).integer().not_null(),
          )
          .col(ColumnDef::new(Earnings::CouponId).integer().null())
          .col(ColumnDef::new(Earnings::OrderTotal).big_integer().not_null())
          .col(
            ColumnDef::new(Earnings::CommissionAmount)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(Earnings::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(ColumnDef::new(Earnings::OrderStatus).string().not_null())
          .col(ColumnDef::new(Earnings::DeliveredAt).date_time().null())
          .col(
            ColumnDef::new(Earnings::CommissionAvailableAt).date_time().null(),
          )
          .col(ColumnDef::new(Earnings::PaidAt).date_time().null())
          .col(ColumnDef::new(Earnings::CreatedAt).date_time().not_null())
          .col(ColumnDef::new(Earnings::UpdatedAt).date_time().not_null())
          // no cascade: earnings are the audit trail and are never deleted
          .foreign_key(
            ForeignKey::create()
              .name("fk_earnings_store_affiliate")
              .from(Earnings::Table, Earnings::StoreAffiliateId)
              .to(StoreAffiliates::Table, StoreAffiliates::Id),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_earnings_coupon")
              .from(Earnings::Table, Earnings::CouponId)
              .to(Coupons::Table, Coupons::Id),
          )
          .to_owned(),
      )
      .await?;

    // one earning per (order, link); replayed events recompute in place
    manager
      .create_index(
        Index::create()
          .name("idx_earnings_order_link")
          .table(Earnings::Table)
          .col(Earnings::OrderId)
          .col(Earnings::StoreAffiliateId)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_earnings_link")
          .table(Earnings::Table)
          .col(Earnings::StoreAffiliateId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Earnings::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Earnings {
  Table,
  Id,
  OrderId,
  StoreAffiliateId,
  CouponId,
  OrderTotal,
  CommissionAmount,
  Status,
  OrderStatus,
  DeliveredAt,
  CommissionAvailableAt,
  PaidAt,
  CreatedAt,
  UpdatedAt,
}
