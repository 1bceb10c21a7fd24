//! `connectsense doctor` — Diagnose system health.

use connectsense_config::AppConfig;
use connectsense_providers::select_chat_provider;
use connectsense_retrieval::VectorIndex;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 ConnectSense Doctor — System Diagnostics");
    println!("==========================================\n");

    let mut issues = 0;

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue found. See above for details.");
            return Ok(());
        }
    };

    // Chat provider selection (construction only, no network calls)
    let report = select_chat_provider(&config);
    match report.active {
        connectsense_core::session::ActiveProvider::Primary => {
            println!("  ✅ Chat provider: Groq (primary)");
        }
        connectsense_core::session::ActiveProvider::Secondary => {
            println!("  ⚠️  Chat provider: Gemini (primary unavailable)");
            issues += 1;
        }
        connectsense_core::session::ActiveProvider::None => {
            println!("  ❌ No chat provider — set GROQ_API_KEY or GOOGLE_API_KEY");
            issues += 1;
        }
    }
    for failure in &report.failures {
        println!(
            "     {} failed ({:?}): {}",
            failure.provider, failure.class, failure.error
        );
    }

    // Embedder key (Gemini is the only embedding backend)
    if config.google_api_key.is_some() {
        println!("  ✅ Embedding key configured");
    } else {
        println!("  ❌ GOOGLE_API_KEY missing — embeddings unavailable, system will degrade");
        issues += 1;
    }

    // Index artifact
    match VectorIndex::load(&config.index.path) {
        Ok(index) => {
            println!(
                "  ✅ Index artifact valid ({} chunks, {} dimensions)",
                index.len(),
                index.dimensions
            );
        }
        Err(e) => {
            println!("  ❌ Index artifact: {e}");
            issues += 1;
        }
    }

    // Decorative logo — degradation only, never an issue
    if config.gateway.logo_path.exists() {
        println!("  ✅ Logo asset present");
    } else {
        println!("  ⚠️  Logo asset missing — chat works, page renders without it");
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
