use tracing::info;
use tracing_subscriber::EnvFilter;

use pinbroker::routes;
use pinbroker::state::AppState;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    // Create and run the tokio runtime
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run_application())
}

async fn run_application() -> color_eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app_state = AppState::from_env()?;
    if app_state.pinterest.client_credentials().is_err() {
        // Not fatal: the broker still serves preflights and reports the
        // configuration error per request, matching the hosted behavior.
        tracing::warn!("Pinterest credentials incomplete; API requests will fail until set");
    }

    let addr = listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("pinbroker listening on {addr}");

    axum::serve(listener, routes::routes(app_state)).await?;

    Ok(())
}

fn listen_addr() -> String {
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    format!("{host}:{port}")
}
