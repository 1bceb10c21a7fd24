//! `connectsense status` — Show configuration and readiness.

use connectsense_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🔗 ConnectSense Status");
    println!("=====================");
    println!("  Primary model:    {} (Groq)", config.groq_model);
    println!("  Fallback model:   {} (Gemini)", config.gemini_model);
    println!("  Embedding model:  {}", config.embedding_model);
    println!("  Temperature:      {}", config.temperature);
    println!("  Retrieval top-k:  {}", config.similarity_top_k);
    println!("  Index artifact:   {}", config.index.path.display());
    println!("  Gateway:          {}:{}", config.gateway.host, config.gateway.port);

    println!();
    println!(
        "  Groq key:    {}",
        if config.groq_api_key.is_some() { "✅ set" } else { "⚠️  missing (GROQ_API_KEY)" }
    );
    println!(
        "  Google key:  {}",
        if config.google_api_key.is_some() { "✅ set" } else { "⚠️  missing (GOOGLE_API_KEY)" }
    );

    if config.index.path.exists() {
        println!("  Index file:  ✅ found");
    } else {
        println!("  Index file:  ❌ missing — the gateway will run degraded");
    }

    Ok(())
}
