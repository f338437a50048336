use sea_orm_migration::prelude::*;

use super::m20260115_000003_create_store_affiliates::StoreAffiliates;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(CommissionRules::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(CommissionRules::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(
            ColumnDef::new(CommissionRules::StoreAffiliateId)
              .integer()
              .not_null(),
          )
          .col(ColumnDef::new(CommissionRules::AppliesTo).string().not_null())
          .col(ColumnDef::new(CommissionRules::Target).string().not_null())
          .col(
            ColumnDef::new(CommissionRules::TargetName).string().not_null(),
          )
          .col(
            ColumnDef::new(CommissionRules::CommissionType)
              .string()
              .not_null(),
          )
          .col(
            ColumnDef::new(CommissionRules::CommissionValue)
              .big_integer()
              .not_null(),
          )
          .col(
            ColumnDef::new(CommissionRules::CreatedAt).date_time().not_null(),
          )
          .col(
            ColumnDef::new(CommissionRules::UpdatedAt).date_time().not_null(),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_commission_rules_store_affiliate")
              .from(CommissionRules::Table, CommissionRules::StoreAffiliateId)
              .to(StoreAffiliates::Table, StoreAffiliates::Id)
              .on_delete(ForeignKeyAction::Cascade),
          )
          .to_owned(),
      )
      .await?;

    // one rule per (link, applies_to, target); duplicates replace in place
    manager
      .create_index(
        Index::create()
          .name("idx_commission_rules_target")
          .table(CommissionRules::Table)
          .col(CommissionRules::StoreAffiliateId)
          .col(CommissionRules::AppliesTo)
          .col(CommissionRules::Target)
          .unique()
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(CommissionRules::Table).to_owned())
      .await
  }
}

#[derive(DeriveIden)]
pub enum CommissionRules {
  Table,
  Id,
  StoreAffiliateId,
  AppliesTo,
  Target,
  TargetName,
  CommissionType,
  CommissionValue,
  CreatedAt,
  UpdatedAt,
}
