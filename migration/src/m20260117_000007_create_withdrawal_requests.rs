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
          .table(WithdrawalRequests::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(WithdrawalRequests::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(WithdrawalRequests::StoreId).integer().not_null(),
          )
          .col(
            ColumnDef::new(WithdrawalRequests::AffiliateId)
              .integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(WithdrawalRequests::Amount)
              .big_integer()
              .not_null(),
          )
          .col(ColumnDef::new(WithdrawalRequests::PixKey).string().not_null())
          .col(
            ColumnDef::new(WithdrawalRequests::Status)
              .string()
              .not_null()
              .default("pending"),
          )
          .col(ColumnDef::new(WithdrawalRequests::AdminNotes).string().null())
          .col(
            ColumnDef::new(WithdrawalRequests::RequestedAt)
              .date_time()
              .not_null(),
          )
          .col(ColumnDef::new(WithdrawalRequests::PaidAt).date_time().null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_withdrawal_requests_store")
              .from(WithdrawalRequests::Table, WithdrawalRequests::StoreId)
              .to(Stores::Table, Stores::Id),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_withdrawal_requests_affiliate")
              .from(WithdrawalRequests::Table, WithdrawalRequests::AffiliateId)
              .to(Affiliates::Table, Affiliates::Id),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_withdrawal_requests_affiliate")
          .table(WithdrawalRequests::Table)
          .col(WithdrawalRequests::AffiliateId)
          .col(WithdrawalRequests::StoreId)
          .to_owned(),
      )
      .await?;

    // backs the check-then-insert transaction: two concurrent requests
    // can never both hold a pending row for the same (affiliate, store)
    manager
      .get_connection()
      .execute_unprepared(
        "CREATE UNIQUE INDEX idx_withdrawal_requests_one_pending \
         ON withdrawal_requests (affiliate_id, store_id) \
         WHERE status = 'pending'",
      )
      .await?;

    Ok(())
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(WithdrawalRequests::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum WithdrawalRequests {
  Table,
  Id,
  StoreId,
  AffiliateId,
  Amount,
  PixKey,
  Status,
  AdminNotes,
  RequestedAt,
  PaidAt,
}
