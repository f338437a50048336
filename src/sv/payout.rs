//! Client for the payout/PIX collaborator. Settled withdrawals turn
//! into signed instructions POSTed to the configured webhook; actual
//! money movement happens on the other side of that boundary.

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::Sha256;

use crate::{prelude::*, sv::withdrawal::PayoutInstruction};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct Payout {
  client: Client,
  webhook_url: Option<String>,
  secret: String,
}

impl Payout {
  pub fn new(webhook_url: Option<String>, secret: String) -> Self {
    Self { client: Client::new(), webhook_url, secret }
  }

  /// Hex HMAC-SHA256 of the raw body; the same scheme authenticates
  /// inbound order events.
  pub fn sign(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
      .map_err(|err| Error::Internal(format!("hmac init: {err}")))?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
  }

  /// Constant-time comparison of a presented signature against the
  /// body's expected one.
  pub fn verify(secret: &str, body: &[u8], signature: &str) -> bool {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
      Ok(mac) => mac,
      Err(_) => return false,
    };
    mac.update(body);

    let Ok(presented) = hex::decode(signature.trim()) else {
      return false;
    };
    mac.verify_slice(&presented).is_ok()
  }

  pub async fn send(&self, instruction: &PayoutInstruction) -> Result<()> {
    let Some(url) = &self.webhook_url else {
      info!(
        reference = %instruction.reference,
        affiliate = instruction.affiliate_id,
        "payout webhook not configured, instruction logged only"
      );
      return Ok(());
    };

    let body = json::to_vec(instruction)
      .map_err(|err| Error::Internal(format!("encode instruction: {err}")))?;
    let signature = Self::sign(&self.secret, &body)?;

    let response = self
      .client
      .post(url)
      .header("content-type", "application/json")
      .header("x-signature", signature)
      .body(body)
      .send()
      .await
      .map_err(|err| Error::Internal(format!("payout webhook: {err}")))?;

    if !response.status().is_success() {
      return Err(Error::Internal(format!(
        "payout webhook returned {}",
        response.status()
      )));
    }

    debug!(reference = %instruction.reference, "payout instruction delivered");
    Ok(())
  }
}
