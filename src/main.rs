//! Edge gateway entry point.
//!
//! Loads configuration, wires adapters into the router and serves it.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use edge_gateway::adapters::http::{gateway_router, GatewayAppState};
use edge_gateway::adapters::{
    CacheRateLimiter, InMemoryCache, MollieConfig, MolliePaymentAdapter, RedisCache,
    ReqwestBackendClient, TurnstileVerifier,
};
use edge_gateway::config::AppConfig;
use edge_gateway::ports::{CaptchaVerifier, PaymentProvider, SharedCache};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let cache: Arc<dyn SharedCache> = match config.redis.url() {
        Some(url) => {
            let cache = RedisCache::connect(url).await?;
            tracing::info!("Connected to Redis shared cache");
            Arc::new(cache)
        }
        None => {
            tracing::warn!("No Redis URL configured, using in-process cache");
            Arc::new(InMemoryCache::new())
        }
    };

    let payment_provider: Option<Arc<dyn PaymentProvider>> =
        match MollieConfig::from_payment_config(&config.payment) {
            Some(mollie) => Some(Arc::new(MolliePaymentAdapter::new(mollie))),
            None => {
                tracing::warn!("No payment API key configured, checkout runs in placeholder mode");
                None
            }
        };

    let captcha_verifier: Option<Arc<dyn CaptchaVerifier>> =
        match TurnstileVerifier::from_config(&config.captcha) {
            Some(verifier) => Some(Arc::new(verifier)),
            None if config.captcha.require => {
                tracing::warn!("Captcha required but no secret configured; protected endpoints will fail");
                None
            }
            None => {
                tracing::info!("No captcha secret configured, captcha checks are skipped");
                None
            }
        };

    let state = GatewayAppState {
        backend: Arc::new(ReqwestBackendClient::new(config.backend.origin())?),
        payment_provider,
        rate_limiter: Arc::new(CacheRateLimiter::new(cache.clone(), &config.rate_limit)),
        cache,
        captcha_verifier,
        config: Arc::new(config.clone()),
    };

    let app = gateway_router(state);

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, backend = config.backend.origin(), "Edge gateway listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("edge_gateway={0},tower_http={0}", config.server.log_level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
