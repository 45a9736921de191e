use std::net::SocketAddr;

use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use upsolve_api::{config::ApiConfig, state::ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    upsolve_api::tracing::init_tracing(&config.environment);

    // Lazy pool: the database may not exist yet, ensure_db_and_migrate
    // creates it before the first real connection
    let pool = upsolve_db::create_lazy_pool(&config.database_url)?;
    upsolve_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let port = config.port;
    let environment = config.environment.clone();
    let frontend_url = config.frontend_url.clone();

    // Initialize the application state
    let state = ApiState::new(config, pool).await?;

    // CORS is scoped to the frontend origin
    let cors = upsolve_api::middleware::cors::create_cors_layer(vec![frontend_url]);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let app = upsolve_api::router::router()
        .with_state(state)
        .layer(cors)
        .layer(trace_layer);

    // Apply security headers (X-Content-Type-Options, X-Frame-Options, HSTS)
    let app =
        upsolve_api::middleware::security_headers::apply_security_headers(app, environment.clone());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, ?environment, "Server running");

    // ConnectInfo gives the rate limiter a peer address to key on
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
