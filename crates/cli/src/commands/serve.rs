//! `connectsense serve` — Start the chat gateway.

use connectsense_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🔗 ConnectSense Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Index:     {}", config.index.path.display());

    connectsense_gateway::start(config).await?;

    Ok(())
}
