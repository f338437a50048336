use axum::{
  Json,
  body::Bytes,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
};
use serde::Deserialize;

use crate::{
  entity::{CommissionType, CouponScope, EarningStatus, RuleAppliesTo},
  order::OrderEvent,
  prelude::*,
  state::AppState,
  sv::{
    Affiliates, Coupons, Ledger, Payout, Rules, Withdrawals,
    withdrawal::SettleOutcome,
  },
};

type Reply = (StatusCode, Json<json::Value>);

fn ok(data: json::Value) -> Reply {
  (StatusCode::OK, Json(data))
}

fn error_reply(err: Error) -> Reply {
  let code = match &err {
    Error::InvalidArgs(_) | Error::InvalidCommission(_) => {
      StatusCode::BAD_REQUEST
    }
    Error::AffiliateNotFound
    | Error::StoreNotFound
    | Error::LinkNotFound
    | Error::CouponNotFound
    | Error::RuleNotFound
    | Error::EarningNotFound
    | Error::RequestNotFound => StatusCode::NOT_FOUND,
    Error::DuplicatePendingRequest
    | Error::CouponLinkLocked
    | Error::AlreadySettled
    | Error::InvalidTransition => StatusCode::CONFLICT,
    Error::InsufficientBalance => StatusCode::UNPROCESSABLE_ENTITY,
    Error::Db(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
  };

  if code == StatusCode::INTERNAL_SERVER_ERROR {
    error!("request failed: {err}");
  }

  (code, Json(json::json!({ "success": false, "msg": err.to_string() })))
}

pub async fn health() -> Reply {
  ok(json::json!({ "status": "ok" }))
}

/// Order-created / order-status-changed webhook from the commerce
/// subsystem. Signed, replay-safe.
pub async fn order_event(
  State(app): State<Arc<AppState>>,
  headers: HeaderMap,
  body: Bytes,
) -> Reply {
  let signature = headers
    .get("x-signature")
    .and_then(|value| value.to_str().ok())
    .unwrap_or_default();
  if !Payout::verify(&app.config.webhook_secret, &body, signature) {
    return (
      StatusCode::UNAUTHORIZED,
      Json(json::json!({ "success": false, "msg": "invalid signature" })),
    );
  }

  let event: OrderEvent = match json::from_slice(&body) {
    Ok(event) => event,
    Err(err) => {
      return error_reply(Error::InvalidArgs(format!("bad event: {err}")));
    }
  };

  if !app.mark_event(event.event_id) {
    debug!(event = %event.event_id, "duplicate delivery ignored");
    return ok(json::json!({ "success": true, "duplicate": true }));
  }

  let ledger = Ledger::new(&app.db);
  // events with items (re)record the order; bare ones only move status
  let result = if event.items.is_empty() {
    ledger.on_order_status_changed(&event).await
  } else {
    ledger.record_order(&event).await
  };

  match result {
    Ok(earnings) => {
      ok(json::json!({ "success": true, "earnings": earnings.len() }))
    }
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct WithdrawalReq {
  pub affiliate_id: i32,
  pub store_id: i32,
  pub amount: i64,
  pub pix_key: String,
}

pub async fn request_withdrawal(
  State(app): State<Arc<AppState>>,
  Json(req): Json<WithdrawalReq>,
) -> Reply {
  let result = Withdrawals::new(&app.db)
    .request(req.affiliate_id, req.store_id, req.amount, &req.pix_key)
    .await;

  match result {
    Ok(request) => (
      StatusCode::CREATED,
      Json(json::json!({ "success": true, "request": request })),
    ),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct SettleReq {
  pub outcome: String,
  pub admin_notes: Option<String>,
}

pub async fn settle_withdrawal(
  State(app): State<Arc<AppState>>,
  Path(request_id): Path<i32>,
  Json(req): Json<SettleReq>,
) -> Reply {
  let outcome = match req.outcome.as_str() {
    "paid" => SettleOutcome::Paid,
    "rejected" => SettleOutcome::Rejected,
    _ => {
      return error_reply(Error::InvalidArgs(
        "outcome must be \"paid\" or \"rejected\"".into(),
      ));
    }
  };

  let result = Withdrawals::new(&app.db)
    .settle(request_id, outcome, req.admin_notes)
    .await;

  match result {
    Ok((request, instruction)) => {
      if let Some(instruction) = &instruction {
        // the settlement is committed; a delivery hiccup is retried by
        // the payout side against the logged reference
        if let Err(err) = app.payout.send(instruction).await {
          warn!(
            reference = %instruction.reference,
            "payout instruction delivery failed: {err}"
          );
        }
      }
      ok(json::json!({ "success": true, "request": request }))
    }
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct SummaryParams {
  pub store_id: Option<i32>,
  pub from: Option<DateTime>,
  pub to: Option<DateTime>,
}

pub async fn affiliate_summary(
  State(app): State<Arc<AppState>>,
  Path(affiliate_id): Path<i32>,
  Query(params): Query<SummaryParams>,
) -> Reply {
  let window = params.from.zip(params.to);
  let now = Utc::now().naive_utc();

  let result = Ledger::new(&app.db)
    .summary(affiliate_id, params.store_id, window, now)
    .await;

  match result {
    Ok(summary) => ok(json::json!({ "success": true, "summary": summary })),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct HistoryParams {
  pub store_id: Option<i32>,
}

pub async fn withdrawal_history(
  State(app): State<Arc<AppState>>,
  Path(affiliate_id): Path<i32>,
  Query(params): Query<HistoryParams>,
) -> Reply {
  let result =
    Withdrawals::new(&app.db).history(affiliate_id, params.store_id).await;

  match result {
    Ok(requests) => {
      ok(json::json!({ "success": true, "requests": requests }))
    }
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct RuleReq {
  pub applies_to: RuleAppliesTo,
  pub target: String,
  pub target_name: Option<String>,
  pub commission_type: CommissionType,
  pub commission_value: i64,
}

pub async fn set_rule(
  State(app): State<Arc<AppState>>,
  Path(link_id): Path<i32>,
  Json(req): Json<RuleReq>,
) -> Reply {
  let target_name = req.target_name.as_deref().unwrap_or(&req.target);
  let result = Rules::new(&app.db)
    .set(
      link_id,
      req.applies_to,
      &req.target,
      target_name,
      req.commission_type,
      req.commission_value,
    )
    .await;

  match result {
    Ok(rule) => ok(json::json!({ "success": true, "rule": rule })),
    Err(err) => error_reply(err),
  }
}

pub async fn list_rules(
  State(app): State<Arc<AppState>>,
  Path(link_id): Path<i32>,
) -> Reply {
  match Rules::new(&app.db).for_link(link_id).await {
    Ok(rules) => ok(json::json!({ "success": true, "rules": rules })),
    Err(err) => error_reply(err),
  }
}

pub async fn remove_rule(
  State(app): State<Arc<AppState>>,
  Path(rule_id): Path<i32>,
) -> Reply {
  match Rules::new(&app.db).remove(rule_id).await {
    Ok(()) => ok(json::json!({ "success": true })),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct LinkCouponReq {
  pub store_affiliate_id: i32,
}

pub async fn link_coupon(
  State(app): State<Arc<AppState>>,
  Path(coupon_id): Path<i32>,
  Json(req): Json<LinkCouponReq>,
) -> Reply {
  let result = Coupons::new(&app.db)
    .link_affiliate(coupon_id, req.store_affiliate_id)
    .await;

  match result {
    Ok(()) => ok(json::json!({ "success": true })),
    Err(err) => error_reply(err),
  }
}

pub async fn unlink_coupon(
  State(app): State<Arc<AppState>>,
  Path(coupon_id): Path<i32>,
  Json(req): Json<LinkCouponReq>,
) -> Reply {
  let result = Coupons::new(&app.db)
    .unlink_affiliate(coupon_id, req.store_affiliate_id)
    .await;

  match result {
    Ok(()) => ok(json::json!({ "success": true })),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct CreateCouponReq {
  pub store_id: i32,
  pub code: String,
  pub discount_type: CommissionType,
  pub discount_value: i64,
  #[serde(default)]
  pub scope: CouponScope,
  pub scope_target: Option<String>,
}

pub async fn create_coupon(
  State(app): State<Arc<AppState>>,
  Json(req): Json<CreateCouponReq>,
) -> Reply {
  let result = Coupons::new(&app.db)
    .create(
      req.store_id,
      &req.code,
      req.discount_type,
      req.discount_value,
      req.scope,
      req.scope_target,
    )
    .await;

  match result {
    Ok(coupon) => (
      StatusCode::CREATED,
      Json(json::json!({ "success": true, "coupon": coupon })),
    ),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct RegisterAffiliateReq {
  pub name: String,
  pub email: String,
  #[serde(default)]
  pub pix_key: String,
}

pub async fn register_affiliate(
  State(app): State<Arc<AppState>>,
  Json(req): Json<RegisterAffiliateReq>,
) -> Reply {
  let result =
    Affiliates::new(&app.db).register(&req.name, &req.email, &req.pix_key).await;

  match result {
    Ok(affiliate) => (
      StatusCode::CREATED,
      Json(json::json!({ "success": true, "affiliate": affiliate })),
    ),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct InviteReq {
  pub affiliate_id: i32,
  pub commission_type: CommissionType,
  pub commission_value: i64,
}

pub async fn invite_affiliate(
  State(app): State<Arc<AppState>>,
  Path(store_id): Path<i32>,
  Json(req): Json<InviteReq>,
) -> Reply {
  let result = Affiliates::new(&app.db)
    .invite(
      store_id,
      req.affiliate_id,
      req.commission_type,
      req.commission_value,
    )
    .await;

  match result {
    Ok(link) => (
      StatusCode::CREATED,
      Json(json::json!({ "success": true, "link": link })),
    ),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct RespondReq {
  pub accept: bool,
}

pub async fn respond_invite(
  State(app): State<Arc<AppState>>,
  Path(link_id): Path<i32>,
  Json(req): Json<RespondReq>,
) -> Reply {
  match Affiliates::new(&app.db).respond(link_id, req.accept).await {
    Ok(link) => ok(json::json!({ "success": true, "link": link })),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct LinkCommissionReq {
  pub commission_type: Option<CommissionType>,
  pub commission_value: Option<i64>,
  pub commission_enabled: Option<bool>,
}

/// Default-commission update and/or enable toggle for one link.
pub async fn set_link_commission(
  State(app): State<Arc<AppState>>,
  Path(link_id): Path<i32>,
  Json(req): Json<LinkCommissionReq>,
) -> Reply {
  let sv = Affiliates::new(&app.db);
  let mut link = None;

  if let (Some(ty), Some(value)) =
    (req.commission_type.clone(), req.commission_value)
  {
    match sv.set_default_commission(link_id, ty, value).await {
      Ok(updated) => link = Some(updated),
      Err(err) => return error_reply(err),
    }
  }

  if let Some(enabled) = req.commission_enabled {
    match sv.set_commission_enabled(link_id, enabled).await {
      Ok(updated) => link = Some(updated),
      Err(err) => return error_reply(err),
    }
  }

  match link {
    Some(link) => ok(json::json!({ "success": true, "link": link })),
    None => error_reply(Error::InvalidArgs(
      "nothing to update: pass a commission or the enabled flag".into(),
    )),
  }
}

pub async fn affiliate_links(
  State(app): State<Arc<AppState>>,
  Path(affiliate_id): Path<i32>,
) -> Reply {
  match Affiliates::new(&app.db).links_for(affiliate_id).await {
    Ok(links) => ok(json::json!({ "success": true, "links": links })),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct PixKeyReq {
  pub pix_key: String,
}

pub async fn set_pix_key(
  State(app): State<Arc<AppState>>,
  Path(affiliate_id): Path<i32>,
  Json(req): Json<PixKeyReq>,
) -> Reply {
  match Affiliates::new(&app.db).set_pix_key(affiliate_id, &req.pix_key).await
  {
    Ok(()) => ok(json::json!({ "success": true })),
    Err(err) => error_reply(err),
  }
}

pub async fn disable_affiliate(
  State(app): State<Arc<AppState>>,
  Path(affiliate_id): Path<i32>,
) -> Reply {
  match Affiliates::new(&app.db).disable(affiliate_id).await {
    Ok(()) => ok(json::json!({ "success": true })),
    Err(err) => error_reply(err),
  }
}

#[derive(Deserialize)]
pub struct EarningStatusReq {
  pub status: EarningStatus,
}

/// Manual staff override of one earning's lifecycle state.
pub async fn update_earning_status(
  State(app): State<Arc<AppState>>,
  Path(earning_id): Path<i32>,
  Json(req): Json<EarningStatusReq>,
) -> Reply {
  match Ledger::new(&app.db).update_status(earning_id, req.status).await {
    Ok(earning) => ok(json::json!({ "success": true, "earning": earning })),
    Err(err) => error_reply(err),
  }
}
