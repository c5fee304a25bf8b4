use tracing::info;

use trickle_server::{router, startup};

fn load_config() -> trickle_core::Config {
    trickle_core::config::load_dotenv();
    trickle_core::Config::from_env()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = load_config();
    config.log_summary();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let port = config.server.port;

    let state = startup::build_app_state(config);
    // Keep the handle alive for the life of the process; the dispatcher
    // stops when the server does.
    let _dispatcher = startup::spawn_background_tasks(state.clone());

    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://localhost:{}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
