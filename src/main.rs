use std::net::SocketAddr;

use anyhow::Context;

use ppwrify::{
    auth::jwt::JwtKeys,
    config::AppConfig,
    db::connection,
    logging::init_tracing,
    routes::app,
    services::ServiceContext,
    state::AppState,
};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // Config errors happen before any subscriber exists.
        eprintln!("{}", failure_report(&err));
        std::process::exit(1);
    }
}

fn failure_report(err: &anyhow::Error) -> String {
    format!("ppwrify failed to start: {err:#}")
}

async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&cfg.logging.rust_log);

    let db_cfg = cfg
        .database
        .clone()
        .context("database configuration (APP_DATABASE__URL) is required")?;
    let auth_cfg = cfg
        .auth
        .clone()
        .context("auth configuration (APP_AUTH__JWT_SECRET) is required")?;

    let db = connection::connect(&db_cfg).await?;
    let jwt = JwtKeys::from_config(&auth_cfg);

    let state = AppState::new(cfg, db, jwt);
    ServiceContext::from_state(state.as_ref())
        .auth(&state.jwt)
        .seed_admin(&auth_cfg)
        .await?;

    let server = &state.config.server;
    let addr: SocketAddr = format!("{}:{}", server.host, server.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!(%addr, "ppwrify listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}
