//! Commission resolution: given one order item and an affiliate's rule
//! snapshot, pick the single applicable rule and compute the amount.
//!
//! Pure functions over explicitly passed models; all I/O lives in the
//! ledger. Resolution never fails — absence of a rule is zero.

use crate::{
  entity::{
    CommissionType, CouponScope, RuleAppliesTo, commission_rule, coupon,
    store_affiliate,
  },
  order::OrderItem,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissionKind {
  /// Integer percent of the post-discount item value.
  Percentage(i64),
  /// Centavos per unit, capped at the post-discount item value.
  Fixed(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSource {
  Product,
  Category,
  Default,
  None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
  pub source: RuleSource,
  pub amount: i64,
}

/// Whether the coupon's scope covers the item. Items the coupon did
/// not discount never generate commission, rules or not.
pub fn coupon_covers(coupon: &coupon::Model, item: &OrderItem) -> bool {
  match coupon.scope {
    CouponScope::All => true,
    CouponScope::Category => {
      coupon.scope_target.as_deref().is_some_and(|target| {
        item.category.as_deref() == Some(target)
      })
    }
    CouponScope::Product => {
      coupon.scope_target.as_deref() == Some(item.product_id.as_str())
    }
  }
}

fn kind(ty: &CommissionType, value: i64) -> CommissionKind {
  match ty {
    CommissionType::Percentage => CommissionKind::Percentage(value),
    CommissionType::Fixed => CommissionKind::Fixed(value),
  }
}

fn amount(kind: CommissionKind, item: &OrderItem) -> i64 {
  let item_value = item.value_after_discount();
  match kind {
    CommissionKind::Percentage(pct) => item_value * pct / 100,
    CommissionKind::Fixed(per_unit) => {
      (per_unit * item.quantity).min(item_value)
    }
  }
}

/// Precedence: product rule, then category rule, then the link's
/// default (only while enabled and positive), then nothing.
pub fn resolve(
  item: &OrderItem,
  rules: &[commission_rule::Model],
  link: &store_affiliate::Model,
) -> Resolution {
  if let Some(rule) = rules.iter().find(|rule| {
    rule.applies_to == RuleAppliesTo::Product && rule.target == item.product_id
  }) {
    return Resolution {
      source: RuleSource::Product,
      amount: amount(kind(&rule.commission_type, rule.commission_value), item),
    };
  }

  if let Some(rule) = rules.iter().find(|rule| {
    rule.applies_to == RuleAppliesTo::Category
      && item.category.as_deref() == Some(rule.target.as_str())
  }) {
    return Resolution {
      source: RuleSource::Category,
      amount: amount(kind(&rule.commission_type, rule.commission_value), item),
    };
  }

  if link.commission_enabled && link.commission_value > 0 {
    return Resolution {
      source: RuleSource::Default,
      amount: amount(
        kind(&link.commission_type, link.commission_value),
        item,
      ),
    };
  }

  Resolution { source: RuleSource::None, amount: 0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
  /// Post-discount sum over all items.
  pub order_total: i64,
  pub commission: i64,
}

/// Resolve a whole order. `coupon` is the attribution path; items
/// outside its scope count toward the total but earn nothing.
pub fn order_commission(
  items: &[OrderItem],
  coupon: Option<&coupon::Model>,
  rules: &[commission_rule::Model],
  link: &store_affiliate::Model,
) -> OrderTotals {
  let mut totals = OrderTotals { order_total: 0, commission: 0 };

  for item in items {
    totals.order_total += item.value_after_discount();

    if let Some(coupon) = coupon
      && !coupon_covers(coupon, item)
    {
      continue;
    }

    totals.commission += resolve(item, rules, link).amount;
  }

  totals
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::LinkStatus;

  fn item(
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

  fn link(
    ty: CommissionType,
    value: i64,
    enabled: bool,
  ) -> store_affiliate::Model {
    store_affiliate::Model {
      id: 1,
      store_id: 1,
      affiliate_id: 1,
      status: LinkStatus::Active,
      commission_type: ty,
      commission_value: value,
      commission_enabled: enabled,
      created_at: chrono::NaiveDateTime::default(),
    }
  }

  fn rule(
    applies_to: RuleAppliesTo,
    target: &str,
    ty: CommissionType,
    value: i64,
  ) -> commission_rule::Model {
    commission_rule::Model {
      id: 0,
      store_affiliate_id: 1,
      applies_to,
      target: target.into(),
      target_name: target.into(),
      commission_type: ty,
      commission_value: value,
      created_at: chrono::NaiveDateTime::default(),
      updated_at: chrono::NaiveDateTime::default(),
    }
  }

  #[test]
  fn product_rule_beats_category_and_default() {
    // default 10%, category 5% on Bebidas, fixed R$2 on product X;
    // item of X, qty 2 at R$10 => R$4 fixed, not 5% or 10%
    let link = link(CommissionType::Percentage, 10, true);
    let rules = vec![
      rule(RuleAppliesTo::Category, "Bebidas", CommissionType::Percentage, 5),
      rule(RuleAppliesTo::Product, "X", CommissionType::Fixed, 200),
    ];
    let item = item("X", Some("Bebidas"), 2, 1000, 0);

    let res = resolve(&item, &rules, &link);
    assert_eq!(res.source, RuleSource::Product);
    assert_eq!(res.amount, 400);
  }

  #[test]
  fn category_rule_beats_default() {
    let link = link(CommissionType::Percentage, 10, true);
    let rules = vec![rule(
      RuleAppliesTo::Category,
      "Bebidas",
      CommissionType::Percentage,
      5,
    )];
    let item = item("Y", Some("Bebidas"), 1, 2000, 0);

    let res = resolve(&item, &rules, &link);
    assert_eq!(res.source, RuleSource::Category);
    assert_eq!(res.amount, 100);
  }

  #[test]
  fn default_applies_when_no_rule_matches() {
    let link = link(CommissionType::Percentage, 10, true);
    let item = item("Z", Some("Doces"), 1, 1500, 0);

    let res = resolve(&item, &[], &link);
    assert_eq!(res.source, RuleSource::Default);
    assert_eq!(res.amount, 150);
  }

  #[test]
  fn disabled_default_resolves_to_none() {
    let link = link(CommissionType::Percentage, 15, false);
    let item = item("Z", None, 1, 1000, 0);

    let res = resolve(&item, &[], &link);
    assert_eq!(res.source, RuleSource::None);
    assert_eq!(res.amount, 0);
  }

  #[test]
  fn zero_valued_default_resolves_to_none() {
    let link = link(CommissionType::Percentage, 0, true);
    let res = resolve(&item("Z", None, 1, 1000, 0), &[], &link);
    assert_eq!(res.source, RuleSource::None);
    assert_eq!(res.amount, 0);
  }

  #[test]
  fn fixed_commission_is_capped_at_item_value() {
    // R$5 per unit on an item worth R$3 after discount
    let link = link(CommissionType::Fixed, 500, true);
    let item = item("Z", None, 1, 1000, 700);

    let res = resolve(&item, &[], &link);
    assert_eq!(res.amount, 300);
    assert!(res.amount <= item.value_after_discount());
  }

  #[test]
  fn percentage_is_computed_on_post_discount_value() {
    let link = link(CommissionType::Percentage, 10, true);
    let item = item("Z", None, 2, 1000, 500);

    // 10% of (2*1000 - 500)
    assert_eq!(resolve(&item, &[], &link).amount, 150);
  }

  #[test]
  fn coupon_scope_gates_commission() {
    let link = link(CommissionType::Percentage, 10, true);
    let coupon = coupon::Model {
      id: 1,
      store_id: 1,
      code: "PROMO".into(),
      discount_type: CommissionType::Percentage,
      discount_value: 10,
      scope: CouponScope::Category,
      scope_target: Some("Bebidas".into()),
      store_affiliate_id: None,
      created_at: chrono::NaiveDateTime::default(),
    };
    let items = vec![
      item("A", Some("Bebidas"), 1, 1000, 0),
      item("B", Some("Doces"), 1, 1000, 0),
    ];

    let totals = order_commission(&items, Some(&coupon), &[], &link);
    // both items count toward the total, only the covered one earns
    assert_eq!(totals.order_total, 2000);
    assert_eq!(totals.commission, 100);
  }

  #[test]
  fn product_scope_matches_by_product_id() {
    let coupon = coupon::Model {
      id: 1,
      store_id: 1,
      code: "SOLO".into(),
      discount_type: CommissionType::Fixed,
      discount_value: 100,
      scope: CouponScope::Product,
      scope_target: Some("A".into()),
      store_affiliate_id: None,
      created_at: chrono::NaiveDateTime::default(),
    };
    assert!(coupon_covers(&coupon, &item("A", None, 1, 100, 0)));
    assert!(!coupon_covers(&coupon, &item("B", None, 1, 100, 0)));
  }

  #[test]
  fn commission_never_exceeds_item_value() {
    let link = link(CommissionType::Fixed, 10_000, true);
    for (qty, price, discount) in
      [(1, 100, 0), (3, 250, 200), (10, 99, 0), (2, 50, 100)]
    {
      let item = item("P", None, qty, price, discount);
      let res = resolve(&item, &[], &link);
      assert!(res.amount <= item.value_after_discount());
    }
  }
}
