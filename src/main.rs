use axum::routing::{get, post};
use axum::Router;
use donation_gateway::config::AppConfig;
use donation_gateway::gateways::bkash::BkashGateway;
use donation_gateway::gateways::shurjopay::ShurjopayGateway;
use donation_gateway::gateways::sslcommerz::SslCommerzGateway;
use donation_gateway::gateways::token_cache::TokenCache;
use donation_gateway::repo::campaigns_repo::CampaignsRepo;
use donation_gateway::repo::donations_repo::DonationsRepo;
use donation_gateway::repo::donors_repo::DonorsRepo;
use donation_gateway::repo::outbox_repo::OutboxRepo;
use donation_gateway::service::checkout::CheckoutService;
use donation_gateway::service::outbox_relay::OutboxRelay;
use donation_gateway::service::settlement::SettlementService;
use donation_gateway::AppState;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let redis_client = redis::Client::open(cfg.redis_url.clone())?;

    let donations_repo = DonationsRepo { pool: pool.clone() };
    let campaigns_repo = CampaignsRepo { pool: pool.clone() };
    let donors_repo = DonorsRepo { pool: pool.clone() };
    let outbox_repo = OutboxRepo { pool: pool.clone() };

    let gateway_timeout_ms = std::env::var("GATEWAY_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(5000);
    let token_safety_margin = Duration::from_secs(60);

    let bkash = Arc::new(BkashGateway {
        base_url: std::env::var("BKASH_BASE_URL")
            .unwrap_or_else(|_| "https://tokenized.sandbox.bka.sh/v1.2.0-beta".to_string()),
        app_key: std::env::var("BKASH_APP_KEY").unwrap_or_default(),
        app_secret: std::env::var("BKASH_APP_SECRET").unwrap_or_default(),
        username: std::env::var("BKASH_USERNAME").unwrap_or_default(),
        password: std::env::var("BKASH_PASSWORD").unwrap_or_default(),
        callback_url: format!("{}/callbacks/bkash", cfg.public_base_url),
        timeout_ms: gateway_timeout_ms,
        client: reqwest::Client::new(),
        token_cache: TokenCache::new(token_safety_margin),
    });

    let sslcommerz = Arc::new(SslCommerzGateway {
        base_url: std::env::var("SSLCOMMERZ_BASE_URL")
            .unwrap_or_else(|_| "https://sandbox.sslcommerz.com".to_string()),
        store_id: std::env::var("SSLCOMMERZ_STORE_ID").unwrap_or_default(),
        store_passwd: std::env::var("SSLCOMMERZ_STORE_PASSWD").unwrap_or_default(),
        success_url: format!("{}/callbacks/sslcommerz/success", cfg.public_base_url),
        fail_url: format!("{}/callbacks/sslcommerz/fail", cfg.public_base_url),
        cancel_url: format!("{}/callbacks/sslcommerz/cancel", cfg.public_base_url),
        ipn_url: format!("{}/callbacks/sslcommerz/ipn", cfg.public_base_url),
        timeout_ms: gateway_timeout_ms,
        client: reqwest::Client::new(),
    });

    let shurjopay = Arc::new(ShurjopayGateway {
        base_url: std::env::var("SHURJOPAY_BASE_URL")
            .unwrap_or_else(|_| "https://sandbox.shurjopayment.com".to_string()),
        username: std::env::var("SHURJOPAY_USERNAME").unwrap_or_default(),
        password: std::env::var("SHURJOPAY_PASSWORD").unwrap_or_default(),
        prefix: std::env::var("SHURJOPAY_PREFIX").unwrap_or_else(|_| "sp".to_string()),
        return_url: format!("{}/callbacks/shurjopay", cfg.public_base_url),
        cancel_url: format!("{}/callbacks/shurjopay", cfg.public_base_url),
        timeout_ms: gateway_timeout_ms,
        client: reqwest::Client::new(),
        token_cache: TokenCache::new(token_safety_margin),
    });

    let checkout_service = CheckoutService {
        donations_repo: donations_repo.clone(),
        campaigns_repo: campaigns_repo.clone(),
        bkash: bkash.clone(),
        sslcommerz: sslcommerz.clone(),
        shurjopay: shurjopay.clone(),
    };

    let settlement_service = SettlementService {
        pool: pool.clone(),
        point_divisor: cfg.point_divisor,
    };

    let relay = OutboxRelay {
        outbox_repo,
        redis_client: redis::Client::open(cfg.redis_url.clone())?,
        stream_key: cfg.stream_key.clone(),
    };
    tokio::spawn(relay.run());

    let state = AppState {
        checkout_service,
        settlement_service,
        donations_repo,
        campaigns_repo,
        donors_repo,
        bkash,
        sslcommerz,
        shurjopay,
        redis_client,
        frontend_base_url: cfg.frontend_base_url.clone(),
    };

    let app = Router::new()
        .route("/health", get(donation_gateway::http::handlers::ops::health))
        .route(
            "/donations",
            post(donation_gateway::http::handlers::checkout::create_donation),
        )
        .route(
            "/donations/:donation_id",
            get(donation_gateway::http::handlers::donations::get_donation),
        )
        .route(
            "/campaigns/:campaign_id",
            get(donation_gateway::http::handlers::campaigns::get_campaign),
        )
        .route(
            "/donors/:donor_id/loyalty",
            get(donation_gateway::http::handlers::loyalty::get_loyalty),
        )
        .route(
            "/callbacks/bkash",
            get(donation_gateway::http::handlers::callbacks::bkash_callback),
        )
        .route(
            "/callbacks/sslcommerz/success",
            post(donation_gateway::http::handlers::callbacks::sslcommerz_success),
        )
        .route(
            "/callbacks/sslcommerz/fail",
            post(donation_gateway::http::handlers::callbacks::sslcommerz_fail),
        )
        .route(
            "/callbacks/sslcommerz/cancel",
            post(donation_gateway::http::handlers::callbacks::sslcommerz_cancel),
        )
        .route(
            "/callbacks/sslcommerz/ipn",
            post(donation_gateway::http::handlers::callbacks::sslcommerz_ipn),
        )
        .route(
            "/callbacks/shurjopay",
            get(donation_gateway::http::handlers::callbacks::shurjopay_return),
        )
        .route("/ops/readiness", get(donation_gateway::http::handlers::ops::readiness))
        .route("/ops/liveness", get(donation_gateway::http::handlers::ops::liveness))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
