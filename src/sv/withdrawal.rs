use serde::Serialize;
use uuid::Uuid;

use crate::{
  entity::{
    EarningStatus, WithdrawalStatus, earning, store_affiliate,
    withdrawal_request,
  },
  order::OrderStatus,
  prelude::*,
  sv::ledger::summarize,
  utils::format_brl,
};

pub struct Withdrawals<'a> {
  db: &'a DatabaseConnection,
}

/// What the payout collaborator receives after a `paid` settlement.
/// The engine itself never moves money.
#[derive(Debug, Clone, Serialize)]
pub struct PayoutInstruction {
  pub affiliate_id: i32,
  pub store_id: i32,
  pub amount: i64,
  pub pix_key: String,
  pub reference: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
  Paid,
  Rejected,
}

impl<'a> Withdrawals<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Check balance, check no pending request, insert — one
  /// transaction, backed by the partial unique index on
  /// (affiliate, store, pending) against concurrent requests.
  pub async fn request(
    &self,
    affiliate_id: i32,
    store_id: i32,
    amount: i64,
    pix_key: &str,
  ) -> Result<withdrawal_request::Model> {
    if amount <= 0 {
      return Err(Error::InvalidArgs(
        "withdrawal amount must be positive".into(),
      ));
    }
    if pix_key.trim().is_empty() {
      return Err(Error::InvalidArgs("pix key is required".into()));
    }

    let txn = self.db.begin().await?;

    let link = store_affiliate::Entity::find()
      .filter(store_affiliate::Column::StoreId.eq(store_id))
      .filter(store_affiliate::Column::AffiliateId.eq(affiliate_id))
      .one(&txn)
      .await?
      .ok_or(Error::LinkNotFound)?;

    let pending = withdrawal_request::Entity::find()
      .filter(withdrawal_request::Column::AffiliateId.eq(affiliate_id))
      .filter(withdrawal_request::Column::StoreId.eq(store_id))
      .filter(
        withdrawal_request::Column::Status.eq(WithdrawalStatus::Pending),
      )
      .one(&txn)
      .await?;
    if pending.is_some() {
      return Err(Error::DuplicatePendingRequest);
    }

    let now = Utc::now().naive_utc();
    let rows = earning::Entity::find()
      .filter(earning::Column::StoreAffiliateId.eq(link.id))
      .all(&txn)
      .await?;
    let available = summarize(&rows, now).available_for_withdrawal;
    if amount > available {
      return Err(Error::InsufficientBalance);
    }

    let request = withdrawal_request::ActiveModel {
      id: NotSet,
      store_id: Set(store_id),
      affiliate_id: Set(affiliate_id),
      amount: Set(amount),
      pix_key: Set(pix_key.trim().to_string()),
      status: Set(WithdrawalStatus::Pending),
      admin_notes: Set(None),
      requested_at: Set(now),
      paid_at: Set(None),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
      affiliate = affiliate_id,
      store = store_id,
      amount = %format_brl(amount),
      "withdrawal requested"
    );
    Ok(request)
  }

  /// `pending -> paid` settles the backing earnings and returns the
  /// instruction for the payout collaborator; `pending -> rejected`
  /// releases nothing and the affiliate may request again. Both are
  /// terminal.
  pub async fn settle(
    &self,
    request_id: i32,
    outcome: SettleOutcome,
    admin_notes: Option<String>,
  ) -> Result<(withdrawal_request::Model, Option<PayoutInstruction>)> {
    let txn = self.db.begin().await?;

    let request = withdrawal_request::Entity::find_by_id(request_id)
      .one(&txn)
      .await?
      .ok_or(Error::RequestNotFound)?;

    if request.status != WithdrawalStatus::Pending {
      return Err(Error::AlreadySettled);
    }

    let now = Utc::now().naive_utc();

    if outcome == SettleOutcome::Rejected {
      let request = withdrawal_request::ActiveModel {
        status: Set(WithdrawalStatus::Rejected),
        admin_notes: Set(admin_notes),
        ..request.into()
      }
      .update(&txn)
      .await?;
      txn.commit().await?;
      return Ok((request, None));
    }

    let link = store_affiliate::Entity::find()
      .filter(store_affiliate::Column::StoreId.eq(request.store_id))
      .filter(
        store_affiliate::Column::AffiliateId.eq(request.affiliate_id),
      )
      .one(&txn)
      .await?
      .ok_or(Error::LinkNotFound)?;

    // settle the backing earnings oldest-first until the paid amount
    // is covered; the last one may overshoot, so a full-balance
    // request always aligns exactly
    let available = earning::Entity::find()
      .filter(earning::Column::StoreAffiliateId.eq(link.id))
      .filter(earning::Column::OrderStatus.eq(OrderStatus::Delivered))
      .filter(earning::Column::CommissionAvailableAt.lte(now))
      .filter(earning::Column::Status.is_in([
        EarningStatus::Pending,
        EarningStatus::Approved,
      ]))
      .order_by_asc(earning::Column::CommissionAvailableAt)
      .all(&txn)
      .await?;

    let mut covered = 0i64;
    for row in available {
      if covered >= request.amount {
        break;
      }
      covered += row.commission_amount;
      earning::ActiveModel {
        status: Set(EarningStatus::Paid),
        paid_at: Set(Some(now)),
        updated_at: Set(now),
        ..row.into()
      }
      .update(&txn)
      .await?;
    }
    if covered < request.amount {
      // earnings were settled by hand while the request sat pending
      warn!(
        request = request.id,
        covered = %format_brl(covered),
        amount = %format_brl(request.amount),
        "settled request not fully covered by available earnings"
      );
    }

    let request = withdrawal_request::ActiveModel {
      status: Set(WithdrawalStatus::Paid),
      admin_notes: Set(admin_notes),
      paid_at: Set(Some(now)),
      ..request.into()
    }
    .update(&txn)
    .await?;

    txn.commit().await?;

    let instruction = PayoutInstruction {
      affiliate_id: request.affiliate_id,
      store_id: request.store_id,
      amount: request.amount,
      pix_key: request.pix_key.clone(),
      reference: Uuid::new_v4(),
    };

    info!(
      request = request.id,
      amount = %format_brl(request.amount),
      reference = %instruction.reference,
      "withdrawal settled as paid"
    );
    Ok((request, Some(instruction)))
  }

  pub async fn history(
    &self,
    affiliate_id: i32,
    store_id: Option<i32>,
  ) -> Result<Vec<withdrawal_request::Model>> {
    let mut query = withdrawal_request::Entity::find()
      .filter(withdrawal_request::Column::AffiliateId.eq(affiliate_id));
    if let Some(store_id) = store_id {
      query =
        query.filter(withdrawal_request::Column::StoreId.eq(store_id));
    }

    Ok(
      query
        .order_by_desc(withdrawal_request::Column::RequestedAt)
        .all(self.db)
        .await?,
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::{
    Ledger,
    test_utils::{fixtures, test_db},
  };

  #[tokio::test]
  async fn request_against_matured_balance() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 500).await;

    let request = Withdrawals::new(&db)
      .request(link.affiliate_id, link.store_id, 500, "maria@pix")
      .await
      .unwrap();

    assert_eq!(request.status, WithdrawalStatus::Pending);
    assert_eq!(request.amount, 500);
  }

  #[tokio::test]
  async fn second_pending_request_is_rejected() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 500).await;
    let sv = Withdrawals::new(&db);

    sv.request(link.affiliate_id, link.store_id, 200, "maria@pix")
      .await
      .unwrap();

    assert!(matches!(
      sv.request(link.affiliate_id, link.store_id, 100, "maria@pix").await,
      Err(Error::DuplicatePendingRequest)
    ));
  }

  #[tokio::test]
  async fn amount_above_available_is_rejected() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 500).await;
    // a maturing earning does not count toward available
    fixtures::earning_for(&db, &link, None, 1000, 100).await;

    let result = Withdrawals::new(&db)
      .request(link.affiliate_id, link.store_id, 501, "maria@pix")
      .await;

    assert!(matches!(result, Err(Error::InsufficientBalance)));
  }

  #[tokio::test]
  async fn settle_paid_excludes_earnings_from_available() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 300).await;
    fixtures::matured_earning(&db, &link, 200).await;
    let sv = Withdrawals::new(&db);

    let request = sv
      .request(link.affiliate_id, link.store_id, 500, "maria@pix")
      .await
      .unwrap();

    let (request, instruction) = sv
      .settle(request.id, SettleOutcome::Paid, Some("transfer sent".into()))
      .await
      .unwrap();

    assert_eq!(request.status, WithdrawalStatus::Paid);
    assert!(request.paid_at.is_some());
    let instruction = instruction.unwrap();
    assert_eq!(instruction.amount, 500);
    assert_eq!(instruction.pix_key, "maria@pix");

    let now = Utc::now().naive_utc();
    let summary = Ledger::new(&db)
      .summary(link.affiliate_id, Some(link.store_id), None, now)
      .await
      .unwrap();
    assert_eq!(summary.available_for_withdrawal, 0);
    assert_eq!(summary.paid, 500);

    // no balance left for another request
    assert!(matches!(
      sv.request(link.affiliate_id, link.store_id, 1, "maria@pix").await,
      Err(Error::InsufficientBalance)
    ));
  }

  #[tokio::test]
  async fn partial_settlement_overshoots_to_whole_earnings() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 100).await;
    fixtures::matured_earning(&db, &link, 50).await;
    let sv = Withdrawals::new(&db);

    let request = sv
      .request(link.affiliate_id, link.store_id, 120, "maria@pix")
      .await
      .unwrap();
    sv.settle(request.id, SettleOutcome::Paid, None).await.unwrap();

    // both earnings settled; none of the balance can be drawn twice
    let now = Utc::now().naive_utc();
    let summary = Ledger::new(&db)
      .summary(link.affiliate_id, None, None, now)
      .await
      .unwrap();
    assert_eq!(summary.available_for_withdrawal, 0);
    assert_eq!(summary.paid, 150);
  }

  #[tokio::test]
  async fn rejection_keeps_balance_and_allows_retry() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 500).await;
    let sv = Withdrawals::new(&db);

    let request = sv
      .request(link.affiliate_id, link.store_id, 500, "maria@pix")
      .await
      .unwrap();
    let (request, instruction) = sv
      .settle(
        request.id,
        SettleOutcome::Rejected,
        Some("pix key mismatch".into()),
      )
      .await
      .unwrap();

    assert_eq!(request.status, WithdrawalStatus::Rejected);
    assert!(instruction.is_none());
    assert_eq!(request.admin_notes.as_deref(), Some("pix key mismatch"));

    // balance untouched, a new request goes through
    sv.request(link.affiliate_id, link.store_id, 500, "maria@pix")
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn settled_requests_are_terminal() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 500).await;
    let sv = Withdrawals::new(&db);

    let request = sv
      .request(link.affiliate_id, link.store_id, 500, "maria@pix")
      .await
      .unwrap();
    sv.settle(request.id, SettleOutcome::Paid, None).await.unwrap();

    assert!(matches!(
      sv.settle(request.id, SettleOutcome::Rejected, None).await,
      Err(Error::AlreadySettled)
    ));
  }

  #[tokio::test]
  async fn request_requires_store_link() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    let other_store = fixtures::store(&db, 7).await;

    let result = Withdrawals::new(&db)
      .request(link.affiliate_id, other_store.id, 100, "maria@pix")
      .await;

    assert!(matches!(result, Err(Error::LinkNotFound)));
  }

  #[tokio::test]
  async fn history_is_newest_first() {
    let db = test_db::setup().await;
    let link = fixtures::active_link(&db, 7).await;
    fixtures::matured_earning(&db, &link, 500).await;
    let sv = Withdrawals::new(&db);

    let first = sv
      .request(link.affiliate_id, link.store_id, 100, "maria@pix")
      .await
      .unwrap();
    sv.settle(first.id, SettleOutcome::Rejected, None).await.unwrap();
    sv.request(link.affiliate_id, link.store_id, 200, "maria@pix")
      .await
      .unwrap();

    let history =
      sv.history(link.affiliate_id, Some(link.store_id)).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].amount, 200);
    assert_eq!(history[1].amount, 100);
  }
}
