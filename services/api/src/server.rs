use crate::cli::ServeArgs;
use crate::demo::seed_demo;
use crate::infra::AppState;
use crate::routes::with_platform_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bazaar::config::AppConfig;
use bazaar::error::AppError;
use bazaar::{telemetry, Marketplace};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let market = Marketplace::in_memory(&config.market);
    if let Some(admin) = &config.admin {
        market.bootstrap_admin(admin)?;
    }
    if args.seed {
        let seeded = seed_demo(&market)?;
        info!(listings = seeded.listings, conversations = seeded.conversations, "demo data loaded");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let app_state = AppState::new(prometheus_handle);

    let app = with_platform_routes(&market)
        .layer(Extension(app_state.clone()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    app_state.mark_ready();

    info!(?config.environment, %addr, "marketplace ready");

    axum::serve(listener, app).await?;
    Ok(())
}
