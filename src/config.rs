use std::env;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
  pub database_url: String,
  pub port: u16,
  /// Shared secret for inbound order-event signatures and outbound
  /// payout-instruction signatures.
  pub webhook_secret: String,
  /// Where settled payout instructions are POSTed. Unset means log-only
  /// (dev mode); the engine never moves money itself.
  pub payout_webhook_url: Option<String>,
}

impl Config {
  pub fn from_env() -> anyhow::Result<Self> {
    let database_url = env::var("DATABASE_URL")
      .unwrap_or_else(|_| "sqlite:affiliate.db?mode=rwc".into());

    let port = env::var("PORT")
      .ok()
      .and_then(|p| p.parse().ok())
      .unwrap_or(3000);

    let webhook_secret =
      env::var("WEBHOOK_SECRET").context("WEBHOOK_SECRET not set")?;

    let payout_webhook_url =
      env::var("PAYOUT_WEBHOOK_URL").ok().filter(|url| !url.is_empty());

    Ok(Self { database_url, port, webhook_secret, payout_webhook_url })
  }
}
