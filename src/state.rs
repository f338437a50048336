use uuid::Uuid;

use crate::{config::Config, prelude::*, sv::Payout};

pub struct AppState {
  pub db: DatabaseConnection,
  pub config: Config,
  pub payout: Payout,
  seen_events: DashMap<Uuid, DateTime>,
}

impl AppState {
  pub async fn new(config: Config) -> anyhow::Result<Self> {
    let db = Database::connect(&config.database_url).await?;
    migration::Migrator::up(&db, None).await?;

    let payout = Payout::new(
      config.payout_webhook_url.clone(),
      config.webhook_secret.clone(),
    );

    Ok(Self { db, config, payout, seen_events: DashMap::new() })
  }

  /// Returns true the first time an event id is seen. Replayed webhook
  /// deliveries short-circuit before touching the ledger; the ledger
  /// upsert stays idempotent on its own for replays across restarts.
  pub fn mark_event(&self, id: Uuid) -> bool {
    self.seen_events.insert(id, Utc::now().naive_utc()).is_none()
  }

  pub fn gc_events(&self) {
    let cutoff = Utc::now().naive_utc() - TimeDelta::hours(1);
    self.seen_events.retain(|_, seen| *seen > cutoff);
  }
}
