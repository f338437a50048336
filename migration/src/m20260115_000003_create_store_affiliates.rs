use sea_orm_migration::prelude::*;

use super::{
  m20260115_000001_create_stores::Stores,
  m20260115_000002_create_affiliates::Affiliates,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(StoreAffiliates::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(StoreAffiliates::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(StoreAffiliates::StoreId).integer().not_null())
          .col(
            ColumnDef::new(StoreAffiliates::AffiliateId).integer().not_null(),
          )
          .col(
            ColumnDef::new(StoreAffiliates::Status)
              .string()
              .not_null()
              .default("invited"),
          )
          .col(
            ColumnDef::new(StoreAffiliates::CommissionType)
              .string()
              .not_null()
              .default("percentage"),
          )
          .col(
            ColumnDef::new(StoreAffiliates::CommissionValue)
              .big_integer()
              .not_null()
              .default(0),
          )
          .col(
            ColumnDef::new(StoreAffiliates::CommissionEnabled)
              .boolean()
              .not_null()
              .default(true),
          )
          .col(
            ColumnDef::new(StoreAffiliates::CreatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_store_affiliates_store")
              .from(StoreAffiliates::Table, StoreAffiliates::StoreId)
              .to(Stores::Table, Stores::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_store_affiliates_affiliate")
              .from(StoreAffiliates::Table, StoreAffiliates::AffiliateId)
              .to(Affiliates::Table, Affiliates::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    // one link per (store, affiliate) pair
    manager
      .create_index(
        Index::create()
          .name("idx_store_affiliates_pair")
          .table(StoreAffiliates::Table)
          .col(StoreAffiliates::StoreId)
          .col(StoreAffiliates::AffiliateId)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(StoreAffiliates::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum StoreAffiliates {
  Table,
  Id,
  StoreId,
  AffiliateId,
  Status,
  CommissionType,
  CommissionValue,
  CommissionEnabled,
  CreatedAt,
}
