use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Affiliates::Table)
          .if_not_exists()
          .col(
            ColumnDef::new(Affiliates::Id)
              .integer()
              .not_null()
              .auto_increment()
              .primary_key(),
          )
          .col(ColumnDef::new(Affiliates::Name).string().not_null())
          .col(ColumnDef::new(Affiliates::Email).string().not_null())
          .col(ColumnDef::new(Affiliates::PixKey).string().not_null())
          .col(
            ColumnDef::new(Affiliates::Status)
              .string()
              .not_null()
              .default("active"),
          )
          .col(ColumnDef::new(Affiliates::CreatedAt).date_time().not_null())
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_affiliates_email")
          .table(Affiliates::Table)
          .col(Affiliates::Email)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager.drop_table(Table::drop().table(Affiliates::Table).to_owned()).await
  }
}

#[derive(DeriveIden)]
pub enum Affiliates {
  Table,
  Id,
  Name,
  Email,
  PixKey,
  Status,
  CreatedAt,
}
