use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid arguments: {0}")]
  InvalidArgs(String),

  #[error("invalid commission: {0}")]
  InvalidCommission(String),

  #[error("affiliate not found")]
  AffiliateNotFound,

  #[error("store not found")]
  StoreNotFound,

  #[error("affiliate is not linked to this store")]
  LinkNotFound,

  #[error("coupon not found")]
  CouponNotFound,

  #[error("commission rule not found")]
  RuleNotFound,

  #[error("earning not found")]
  EarningNotFound,

  #[error("withdrawal request not found")]
  RequestNotFound,

  #[error("a pending withdrawal request already exists for this store")]
  DuplicatePendingRequest,

  #[error("amount exceeds the available balance")]
  InsufficientBalance,

  #[error("coupon already has earnings attributed through this link")]
  CouponLinkLocked,

  #[error("withdrawal request is already settled")]
  AlreadySettled,

  #[error("invalid status transition")]
  InvalidTransition,

  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),

  #[error("internal error: {0}")]
  Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;
