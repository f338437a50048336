//! When a delivered order's commission becomes withdrawable.

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Maturity {
  pub available_at: DateTime,
  /// Set when the delivery timestamp was unknown and the order's
  /// creation time was used as a conservative upper bound; the ledger
  /// recomputes once the true timestamp arrives.
  pub needs_reconciliation: bool,
}

/// `delivered_at + maturity_days`, falling back to
/// `order_created_at + maturity_days` when delivery time is unknown.
/// The result is stamped once; later `maturity_days` changes never
/// touch earnings that already started maturing.
pub fn available_at(
  delivered_at: Option<DateTime>,
  order_created_at: DateTime,
  maturity_days: i32,
) -> Maturity {
  let grace = TimeDelta::days(maturity_days.max(0) as i64);

  match delivered_at {
    Some(at) => {
      Maturity { available_at: at + grace, needs_reconciliation: false }
    }
    None => Maturity {
      available_at: order_created_at + grace,
      needs_reconciliation: true,
    },
  }
}
