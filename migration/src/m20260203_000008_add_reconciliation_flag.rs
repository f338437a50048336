use sea_orm_migration::prelude::*;

use super::m20260117_000006_create_earnings::Earnings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    // earnings matured from order.created_at because the delivery
    // timestamp was unknown; they get recomputed when it arrives
    manager
      .alter_table(
        Table::alter()
          .table(Earnings::Table)
          .add_column(
            ColumnDef::new(EarningsExt::NeedsReconciliation)
              .boolean()
              .not_null()
              .default(false),
          )
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .alter_table(
        Table::alter()
          .table(Earnings::Table)
          .drop_column(EarningsExt::NeedsReconciliation)
          .to_owned(),
      )
      .await
  }
}

#[derive(DeriveIden)]
pub enum EarningsExt {
  NeedsReconciliation,
}
