mod config;
mod entity;
mod error;
mod handlers;
mod order;
mod prelude;
mod state;
mod sv;
mod utils;

use std::net::SocketAddr;

use axum::{
  Router,
  routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};
use tracing_subscriber::{
  EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::{config::Config, prelude::*, state::AppState};

#[tokio::main]
async fn main() {
  dotenvy::dotenv().ok();

  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "affiliate=debug,tower_http=debug,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::from_env().expect("Invalid environment");
  let port = config.port;

  info!("Starting Affiliate Engine v{}", env!("CARGO_PKG_VERSION"));

  let app_state =
    Arc::new(AppState::new(config).await.expect("Failed to initialize"));

  // Garbage-collect processed webhook event ids
  let gc_app = app_state.clone();
  tokio::spawn(async move {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
      interval.tick().await;
      gc_app.gc_events();
    }
  });

  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(2)
      .burst_size(100)
      .finish()
      .expect("Failed to build rate limiter config"),
  );

  let governor_limiter = governor_conf.limiter().clone();

  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(60)).await;
      governor_limiter.retain_recent();
    }
  });

  let app = Router::new()
    .route("/api/orders/events", post(handlers::order_event))
    .route("/api/withdrawals", post(handlers::request_withdrawal))
    .route(
      "/api/withdrawals/{id}/settle",
      post(handlers::settle_withdrawal),
    )
    .route("/api/affiliates", post(handlers::register_affiliate))
    .route("/api/affiliates/{id}/summary", get(handlers::affiliate_summary))
    .route(
      "/api/affiliates/{id}/withdrawals",
      get(handlers::withdrawal_history),
    )
    .route("/api/affiliates/{id}/links", get(handlers::affiliate_links))
    .route("/api/affiliates/{id}/pix", post(handlers::set_pix_key))
    .route("/api/affiliates/{id}/disable", post(handlers::disable_affiliate))
    .route(
      "/api/stores/{id}/affiliates",
      post(handlers::invite_affiliate),
    )
    .route("/api/links/{id}/respond", post(handlers::respond_invite))
    .route("/api/links/{id}/commission", post(handlers::set_link_commission))
    .route(
      "/api/links/{id}/rules",
      post(handlers::set_rule).get(handlers::list_rules),
    )
    .route("/api/rules/{id}", delete(handlers::remove_rule))
    .route("/api/coupons", post(handlers::create_coupon))
    .route(
      "/api/coupons/{id}/link",
      post(handlers::link_coupon).delete(handlers::unlink_coupon),
    )
    .route(
      "/api/earnings/{id}/status",
      post(handlers::update_earning_status),
    )
    .route("/health", get(handlers::health))
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .with_state(app_state);

  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  info!("HTTP server listening on {}", addr);

  let listener =
    tokio::net::TcpListener::bind(addr).await.expect("Failed to bind");
  axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .await
  .expect("Server error");
}
