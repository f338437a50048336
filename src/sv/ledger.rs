use serde::Serialize;

use crate::{
  entity::{
    EarningStatus, LinkStatus, affiliate, commission_rule, coupon, earning,
    store, store_affiliate,
  },
  order::OrderEvent,
  prelude::*,
  sv::{Coupons, maturity, resolver},
};

pub struct Ledger<'a> {
  db: &'a DatabaseConnection,
}

/// Commission aggregates for one affiliate, centavos. Cancelled
/// amounts are tracked but excluded from every money total.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceSummary {
  /// Commission on delivered, non-cancelled orders.
  pub earned: i64,
  /// Earned but still inside the maturity window.
  pub maturing: i64,
  /// Earned, matured and not yet settled.
  pub available_for_withdrawal: i64,
  /// Settled through a withdrawal.
  pub paid: i64,
  /// Orders neither delivered nor cancelled yet.
  pub pending_processing: i64,
  pub cancelled: i64,
}

/// One-pass fold over earning rows. `now` is explicit so callers (and
/// tests) control the maturity boundary.
pub fn summarize(rows: &[earning::Model], now: DateTime) -> BalanceSummary {
  let mut summary = BalanceSummary::default();

  for row in rows {
    let amount = row.commission_amount;

    // settled money stays settled, even if the order is cancelled
    // afterwards; clawbacks are an accounting action, not ours
    if row.status == EarningStatus::Paid {
      summary.earned += amount;
      summary.paid += amount;
      continue;
    }

    if row.status == EarningStatus::Cancelled
      || row.order_status.is_cancelled()
    {
      summary.cancelled += amount;
      continue;
    }

    if row.order_status.is_delivered() {
      summary.earned += amount;
      match row.commission_available_at {
        Some(at) if at <= now => summary.available_for_withdrawal += amount,
        // a delivered row without a stamp is still maturing
        _ => summary.maturing += amount,
      }
    } else {
      summary.pending_processing += amount;
    }
  }

  summary
}

impl<'a> Ledger<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Record (or re-record) an order against every active link of its
  /// coupon. Idempotent: a replayed event recomputes the existing row
  /// in place instead of duplicating it. Orders without a resolvable
  /// coupon attribution produce nothing.
  pub async fn record_order(
    &self,
    event: &OrderEvent,
  ) -> Result<Vec<earning::Model>> {
    let Some(code) = event.coupon_code.as_deref() else {
      return Ok(vec![]);
    };

    let coupons = Coupons::new(self.db);
    let Some(coupon) = coupons.by_code(event.store_id, code).await? else {
      warn!(order = %event.order_id, code, "order carries unknown coupon");
      return Ok(vec![]);
    };

    let store = store::Entity::find_by_id(event.store_id)
      .one(self.db)
      .await?
      .ok_or(Error::StoreNotFound)?;

    let mut recorded = Vec::new();
    for link in coupons.affiliates_for(&coupon).await? {
      if link.status != LinkStatus::Active {
        continue;
      }
      recorded.push(self.record_for_link(event, &coupon, &link, &store).await?);
    }

    Ok(recorded)
  }

  async fn record_for_link(
    &self,
    event: &OrderEvent,
    coupon: &coupon::Model,
    link: &store_affiliate::Model,
    store: &store::Model,
  ) -> Result<earning::Model> {
    let txn = self.db.begin().await?;

    let rules = commission_rule::Entity::find()
      .filter(commission_rule::Column::StoreAffiliateId.eq(link.id))
      .all(&txn)
      .await?;

    let totals =
      resolver::order_commission(&event.items, Some(coupon), &rules, link);

    let now = Utc::now().naive_utc();
    let existing = earning::Entity::find()
      .filter(earning::Column::OrderId.eq(&event.order_id))
      .filter(earning::Column::StoreAffiliateId.eq(link.id))
      .one(&txn)
      .await?;

    let row = match existing {
      Some(row) => {
        earning::ActiveModel {
          order_total: Set(totals.order_total),
          commission_amount: Set(totals.commission),
          updated_at: Set(now),
          ..row.into()
        }
        .update(&txn)
        .await?
      }
      None => {
        earning::ActiveModel {
          id: NotSet,
          order_id: Set(event.order_id.clone()),
          store_affiliate_id: Set(link.id),
          coupon_id: Set(Some(coupon.id)),
          order_total: Set(totals.order_total),
          commission_amount: Set(totals.commission),
          status: Set(EarningStatus::Pending),
          order_status: Set(event.status()),
          delivered_at: Set(None),
          commission_available_at: Set(None),
          needs_reconciliation: Set(false),
          paid_at: Set(None),
          created_at: Set(now),
          updated_at: Set(now),
        }
        .insert(&txn)
        .await?
      }
    };

    let row = apply_order_status(&txn, store, row, event).await?;
    txn.commit().await?;

    Ok(row)
  }

  /// Re-evaluate every earning of the order after a fulfillment
  /// change. Replayed webhooks are no-ops.
  pub async fn on_order_status_changed(
    &self,
    event: &OrderEvent,
  ) -> Result<Vec<earning::Model>> {
    let store = store::Entity::find_by_id(event.store_id)
      .one(self.db)
      .await?
      .ok_or(Error::StoreNotFound)?;

    let rows = earning::Entity::find()
      .filter(earning::Column::OrderId.eq(&event.order_id))
      .find_also_related(store_affiliate::Entity)
      .all(self.db)
      .await?;

    let txn = self.db.begin().await?;
    let mut updated = Vec::new();
    for (row, link) in rows {
      // order ids are only unique within one store
      if link.as_ref().is_none_or(|link| link.store_id != event.store_id) {
        continue;
      }
      updated.push(apply_order_status(&txn, &store, row, event).await?);
    }
    txn.commit().await?;

    Ok(updated)
  }

  /// Manual staff override. `paid` stamps `paid_at`; `paid` and
  /// `cancelled` are terminal.
  pub async fn update_status(
    &self,
    earning_id: i32,
    status: EarningStatus,
  ) -> Result<earning::Model> {
    let row = earning::Entity::find_by_id(earning_id)
      .one(self.db)
      .await?
      .ok_or(Error::EarningNotFound)?;

    if row.status == status {
      return Ok(row);
    }

    let allowed = matches!(
      (&row.status, &status),
      (EarningStatus::Pending, _)
        | (
          EarningStatus::Approved,
          EarningStatus::Paid | EarningStatus::Cancelled
        )
    );
    if !allowed {
      return Err(Error::InvalidTransition);
    }

    let now = Utc::now().naive_utc();
    let mut active: earning::ActiveModel = row.into();
    if status == EarningStatus::Paid {
      active.paid_at = Set(Some(now));
    }
    active.status = Set(status);
    active.updated_at = Set(now);

    Ok(active.update(self.db).await?)
  }

  /// The §4.2-style aggregates, optionally scoped to one store and a
  /// creation-time window.
  pub async fn summary(
    &self,
    affiliate_id: i32,
    store_id: Option<i32>,
    window: Option<(DateTime, DateTime)>,
    now: DateTime,
  ) -> Result<BalanceSummary> {
    affiliate::Entity::find_by_id(affiliate_id)
      .one(self.db)
      .await?
      .ok_or(Error::AffiliateNotFound)?;

    let mut links = store_affiliate::Entity::find()
      .filter(store_affiliate::Column::AffiliateId.eq(affiliate_id));
    if let Some(store_id) = store_id {
      store::Entity::find_by_id(store_id)
        .one(self.db)
        .await?
        .ok_or(Error::StoreNotFound)?;
      links = links.filter(store_affiliate::Column::StoreId.eq(store_id));
    }
    let link_ids: Vec<i32> =
      links.all(self.db).await?.into_iter().map(|link| link.id).collect();

    if link_ids.is_empty() {
      return Ok(BalanceSummary::default());
    }

    let mut query = earning::Entity::find()
      .filter(earning::Column::StoreAffiliateId.is_in(link_ids));
    if let Some((from, to)) = window {
      query = query.filter(earning::Column::CreatedAt.between(from, to));
    }
    let rows = query.all(self.db).await?;

    Ok(summarize(&rows, now))
  }
}

async fn apply_order_status<C: ConnectionTrait>(
  conn: &C,
  store: &store::Model,
  row: earning::Model,
  event: &OrderEvent,
) -> Result<earning::Model> {
  let status = event.status();
  let now = Utc::now().naive_utc();

  let mut active: earning::ActiveModel = row.clone().into();
  active.order_status = Set(status.clone());
  active.updated_at = Set(now);

  if status.is_cancelled() {
    // settled payouts are not clawed back; everything else is voided
    if row.status != EarningStatus::Paid
      && row.status != EarningStatus::Cancelled
    {
      active.status = Set(EarningStatus::Cancelled);
    }
  } else if status.is_delivered() {
    if row.commission_available_at.is_none() {
      let m = maturity::available_at(
        event.delivered_at,
        event.created_at,
        store.maturity_days,
      );
      active.delivered_at = Set(event.delivered_at);
      active.commission_available_at = Set(Some(m.available_at));
      active.needs_reconciliation = Set(m.needs_reconciliation);
    } else if row.needs_reconciliation && event.delivered_at.is_some() {
      // the true delivery timestamp arrived; recompute exactly once
      let m = maturity::available_at(
        event.delivered_at,
        event.created_at,
        store.maturity_days,
      );
      active.delivered_at = Set(event.delivered_at);
      active.commission_available_at = Set(Some(m.available_at));
      active.needs_reconciliation = Set(false);
    }
  }

  Ok(active.update(conn).await?)
}
