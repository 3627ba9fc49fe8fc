use edux_portal::config::PortalConfig;
use edux_portal::stub;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    edux_portal::init_tracing("edux_portal=debug,portal_stub=debug");

    let config = PortalConfig::new_from_env()?;
    let (_addr, server) = stub::spawn(config.stub_addr, &config.database_url).await?;

    tokio::select! {
        _ = server => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
