use sea_orm_migration::prelude::*;

use super::{
  m20260115_000001_create_stores::Stores,
  m20260115_000003_create_store_affiliates::StoreAffiliates,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Coupons::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Coupons::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Coupons::StoreId).integer().not_null())
          .col(ColumnDef::new(Coupons::Code).string().not_null())
          .col(ColumnDef::new(Coupons::DiscountType).string().not_null())
          .col(
            ColumnDef::new(Coupons::DiscountValue).big_integer().not_null(),
          )
          .col(
            ColumnDef::new(Coupons::Scope).string().not_null().default("all"),
          )
          .col(ColumnDef::new(Coupons::ScopeTarget).string().null())
          // legacy single-affiliate link, superseded by coupon_links
          .col(ColumnDef::new(Coupons::StoreAffiliateId).integer().null())
          .col(ColumnDef::new(Coupons::CreatedAt).date_time().not_null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_coupons_store")
              .from(Coupons::Table, Coupons::StoreId)
              .to(Stores::Table, Stores::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_coupons_store_code")
          .table(Coupons::Table)
          .col(Coupons::StoreId)
          .col(Coupons::Code)
          .unique()
          .to_owned(),
      )
      .await?;

    manager
      .create_table(
        Table::create()
          .table(CouponLinks::Table)
          .if_not_exists()
          .col(ColumnDef::new(CouponLinks::CouponId).integer().not_null())
          .col(
            ColumnDef::new(CouponLinks::StoreAffiliateId).integer().not_null(),
          )
          .col(ColumnDef::new(CouponLinks::CreatedAt).date_time().not_null())
          .primary_key(
            Index::create()
              .col(CouponLinks::CouponId)
              .col(CouponLinks::StoreAffiliateId),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_coupon_links_coupon")
              .from(CouponLinks::Table, CouponLinks::CouponId)
              .to(Coupons::Table, Coupons::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_coupon_links_store_affiliate")
              .from(CouponLinks::Table, CouponLinks::StoreAffiliateId)
              .to(StoreAffiliates::Table, StoreAffiliates::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(CouponLinks::Table).to_owned())
      .await?;

    manager.drop_table(Table::drop().table(Coupons::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Coupons {
  Table,
  Id,
  StoreId,
  Code,
  DiscountType,
  DiscountValue,
  Scope,
  ScopeTarget,
  StoreAffiliateId,
  CreatedAt,
}

#[derive(DeriveIden)]
pub enum CouponLinks {
  Table,
  CouponId,
  StoreAffiliateId,
  CreatedAt,
}
