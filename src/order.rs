//! Canonical order state as seen from the commerce subsystem.
//!
//! The storefront emits status strings in English or Portuguese;
//! everything downstream of [`OrderStatus::parse`] works with this
//! enum and the two predicates below, never with raw strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::prelude::DateTime;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[derive(EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[sea_orm(string_value = "pending")]
  Pending,
  #[sea_orm(string_value = "processing")]
  #[default]
  Processing,
  #[sea_orm(string_value = "shipped")]
  Shipped,
  #[sea_orm(string_value = "delivered")]
  Delivered,
  #[sea_orm(string_value = "cancelled")]
  Cancelled,
}

impl OrderStatus {
  /// Unknown statuses map to `Processing`: a storefront adding a new
  /// state must never break earning ingestion, and "in processing" is
  /// the neutral bucket for commission accounting.
  pub fn parse(raw: &str) -> Self {
    match raw.trim().to_ascii_lowercase().as_str() {
      "pending" | "pendente" => Self::Pending,
      "shipped" | "enviado" => Self::Shipped,
      "delivered" | "entregue" => Self::Delivered,
      "cancelled" | "canceled" | "cancelado" => Self::Cancelled,
      _ => Self::Processing,
    }
  }

  pub fn is_delivered(&self) -> bool {
    *self == Self::Delivered
  }

  pub fn is_cancelled(&self) -> bool {
    *self == Self::Cancelled
  }
}

/// Order-created / order-status-changed event from the commerce
/// subsystem. Status events may omit `items`; amounts are then kept
/// from the original recording.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEvent {
  pub event_id: Uuid,
  pub order_id: String,
  pub store_id: i32,
  pub status: String,
  pub created_at: DateTime,
  pub delivered_at: Option<DateTime>,
  pub coupon_code: Option<String>,
  #[serde(default)]
  pub items: Vec<OrderItem>,
}

impl OrderEvent {
  pub fn status(&self) -> OrderStatus {
    OrderStatus::parse(&self.status)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
  pub product_id: String,
  pub category: Option<String>,
  pub quantity: i64,
  /// Centavos per unit.
  pub unit_price: i64,
  /// Total discount applied to the line, centavos.
  #[serde(default)]
  pub line_discount: i64,
}

impl OrderItem {
  /// The money the customer actually paid for the line. Commission is
  /// always computed against this, never the gross value.
  pub fn value_after_discount(&self) -> i64 {
    (self.unit_price * self.quantity - self.line_discount).max(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_accepts_portuguese_aliases() {
    assert_eq!(OrderStatus::parse("entregue"), OrderStatus::Delivered);
    assert_eq!(OrderStatus::parse("Cancelado"), OrderStatus::Cancelled);
    assert_eq!(OrderStatus::parse("pendente"), OrderStatus::Pending);
    assert_eq!(OrderStatus::parse("enviado"), OrderStatus::Shipped);
    assert_eq!(OrderStatus::parse(" DELIVERED "), OrderStatus::Delivered);
  }

  #[test]
  fn parse_never_fails_on_unknown_status() {
    assert_eq!(OrderStatus::parse("aguardando_pagamento"), OrderStatus::Processing);
    assert_eq!(OrderStatus::parse(""), OrderStatus::Processing);
  }

  #[test]
  fn predicates() {
    assert!(OrderStatus::Delivered.is_delivered());
    assert!(!OrderStatus::Delivered.is_cancelled());
    assert!(OrderStatus::Cancelled.is_cancelled());
    assert!(!OrderStatus::Shipped.is_delivered());
  }

  #[test]
  fn item_value_is_clamped_at_zero() {
    let item = OrderItem {
      product_id: "p1".into(),
      category: None,
      quantity: 1,
      unit_price: 500,
      line_discount: 900,
    };
    assert_eq!(item.value_after_discount(), 0);
  }

  #[test]
  fn item_value_subtracts_line_discount() {
    let item = OrderItem {
      product_id: "p1".into(),
      category: None,
      quantity: 3,
      unit_price: 1000,
      line_discount: 500,
    };
    assert_eq!(item.value_after_discount(), 2500);
  }
}
