pub use sea_orm_migration::prelude::*;

mod m20260115_000001_create_stores;
mod m20260115_000002_create_affiliates;
mod m20260115_000003_create_store_affiliates;
mod m20260116_000004_create_coupons;
mod m20260116_000005_create_commission_rules;
mod m20260117_000006_create_earnings;
mod m20260117_000007_create_withdrawal_requests;
mod m20260203_000008_add_reconciliation_flag;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260115_000001_create_stores::Migration),
      Box::new(m20260115_000002_create_affiliates::Migration),
      Box::new(m20260115_000003_create_store_affiliates::Migration),
      Box::new(m20260116_000004_create_coupons::Migration),
      Box::new(m20260116_000005_create_commission_rules::Migration),
      Box::new(m20260117_000006_create_earnings::Migration),
      Box::new(m20260117_000007_create_withdrawal_requests::Migration),
      Box::new(m20260203_000008_add_reconciliation_flag::Migration),
    ]
  }
}
