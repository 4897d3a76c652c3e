use janken::prelude::*;
use tracing_subscriber::EnvFilter;

/// Listen address when `JANKEN_BIND` is unset.
const DEFAULT_BIND: &str = "0.0.0.0:3000";

fn bind_addr(from_env: Option<String>) -> String {
    from_env
        .filter(|addr| !addr.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = bind_addr(std::env::var("JANKEN_BIND").ok());
    tracing::info!(%addr, "starting janken server");

    let server = JankenServer::builder()
        .bind(&addr)
        .lobby_config(LobbyConfig::default())
        .build()
        .await?;

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    tracing::info!("janken server stopped");
    Ok(())
}
