//! Shared test utilities for database setup and seed data


#[cfg(test)]
pub mod fixtures {
  use uuid::Uuid;

  use crate::{
    entity::*,
    order::{OrderEvent, OrderItem},
    prelude::*,
  };

  pub async fn store(db: &DatabaseConnection, maturity_days: i32) -> store::Model {
    let now = Utc::now().naive_utc();
    store::ActiveModel {
      id: NotSet,
      name: Set("Loja Teste".into()),
      maturity_days: Set(maturity_days),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
  }

  pub async fn affiliate(db: &DatabaseConnection) -> affiliate::Model {
    let now = Utc::now().naive_utc();
    affiliate::ActiveModel {
      id: NotSet,
      name: Set("Maria Promotora".into()),
      email: Set("maria@example.com".into()),
      pix_key: Set("maria@pix.example.com".into()),
      status: Set(AffiliateStatus::Active),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
  }

  async fn link_with_status(
    db: &DatabaseConnection,
    store_id: i32,
    status: LinkStatus,
  ) -> store_affiliate::Model {
    let affiliate = affiliate(db).await;
    let now = Utc::now().naive_utc();
    store_affiliate::ActiveModel {
      id: NotSet,
      store_id: Set(store_id),
      affiliate_id: Set(affiliate.id),
      status: Set(status),
      commission_type: Set(CommissionType::Percentage),
      commission_value: Set(10),
      commission_enabled: Set(true),
      created_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
  }

  /// Fresh store plus an active link with a 10% default commission.
  pub async fn active_link(
    db: &DatabaseConnection,
    maturity_days: i32,
  ) -> store_affiliate::Model {
    let store = store(db, maturity_days).await;
    link_with_status(db, store.id, LinkStatus::Active).await
  }

  /// Second affiliate actively linked to an existing store.
  pub async fn second_active_link(
    db: &DatabaseConnection,
    store_id: i32,
  ) -> store_affiliate::Model {
    link_with_status(db, store_id, LinkStatus::Active).await
  }

  pub async fn invited_link(
    db: &DatabaseConnection,
  ) -> store_affiliate::Model {
    let store = store(db, 7).await;
    link_with_status(db, store.id, LinkStatus::Invited).await
  }

  /// Bare earning row in `pending`/`processing`, bypassing the ledger.
  pub async fn earning_for(
    db: &DatabaseConnection,
    link: &store_affiliate::Model,
    coupon_id: Option<i32>,
    order_total: i64,
    commission_amount: i64,
  ) -> earning::Model {
    let now = Utc::now().naive_utc();
    earning::ActiveModel {
      id: NotSet,
      order_id: Set(format!("order-{}", Uuid::new_v4())),
      store_affiliate_id: Set(link.id),
      coupon_id: Set(coupon_id),
      order_total: Set(order_total),
      commission_amount: Set(commission_amount),
      status: Set(EarningStatus::Pending),
      order_status: Set(crate::order::OrderStatus::Processing),
      delivered_at: Set(None),
      commission_available_at: Set(None),
      needs_reconciliation: Set(false),
      paid_at: Set(None),
      created_at: Set(now),
      updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
  }

  /// Delivered earning whose maturity window has already passed.
  pub async fn matured_earning(
    db: &DatabaseConnection,
    link: &store_affiliate::Model,
    commission_amount: i64,
  ) -> earning::Model {
    let now = Utc::now().naive_utc();
    let delivered = now - TimeDelta::days(10);
    earning::ActiveModel {
      id: NotSet,
      order_id: Set(format!("order-{}", Uuid::new_v4())),
      store_affiliate_id: Set(link.id),
      coupon_id: Set(None),
      order_total: Set(commission_amount * 10),
      commission_amount: Set(commission_amount),
      status: Set(EarningStatus::Pending),
      order_status: Set(crate::order::OrderStatus::Delivered),
      delivered_at: Set(Some(delivered)),
      commission_available_at: Set(Some(delivered + TimeDelta::days(7))),
      needs_reconciliation: Set(false),
      paid_at: Set(None),
      created_at: Set(delivered),
      updated_at: Set(delivered),
    }
    .insert(db)
    .await
    .unwrap()
  }

  pub fn item(
    product: &str,
    category: Option<&str>,
    quantity: i64,
    unit_price: i64,
    line_discount: i64,
  ) -> OrderItem {
    OrderItem {
      product_id: product.into(),
      category: category.map(Into::into),
      quantity,
      unit_price,
      line_discount,
    }
  }

  pub fn order_event(
    store_id: i32,
    order_id: &str,
    coupon_code: Option<&str>,
    status: &str,
    items: Vec<OrderItem>,
  ) -> OrderEvent {
    OrderEvent {
      event_id: Uuid::new_v4(),
      order_id: order_id.into(),
      store_id,
      status: status.into(),
      created_at: Utc::now().naive_utc(),
      delivered_at: None,
      coupon_code: coupon_code.map(Into::into),
      items,
    }
  }
}
