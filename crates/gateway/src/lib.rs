//! HTTP gateway for ConnectSense.
//!
//! Serves the embedded chat frontend and a JSON API over per-session chat
//! state. Initialization (index load, embedder construction, chat-provider
//! selection, engine assembly) runs exactly once before the listener binds;
//! total failure degrades the runtime instead of aborting the process.
//!
//! Built on Axum.

pub mod api;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::get};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use connectsense_chat::{ChatRuntime, ContextAssembler};
use connectsense_config::{AppConfig, prompts};
use connectsense_core::error::Error;
use connectsense_core::session::{ActiveProvider, SessionState};
use connectsense_providers::{GeminiProvider, select_chat_provider};
use connectsense_retrieval::engine::EngineSettings;
use connectsense_retrieval::{QueryEngine, VectorIndex};

/// Shared application state for the gateway.
pub struct GatewayState {
    /// Turn dispatcher (degraded when initialization failed).
    pub runtime: ChatRuntime,
    /// Per-session chat state, keyed by session id.
    pub sessions: RwLock<HashMap<String, SessionState>>,
    /// Decorative logo bytes, absent when the asset is missing.
    pub logo: Option<Vec<u8>>,
    /// The embedded README markdown.
    pub readme: &'static str,
    /// Server start time (status reporting).
    pub start_time: DateTime<Utc>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the query engine from configuration.
///
/// Mirrors the startup order of the interactive app: index artifact first,
/// then the embedder, then the chat-provider selection. The first failure
/// wins — everything downstream is skipped.
fn try_build_engine(config: &AppConfig) -> Result<(Arc<QueryEngine>, ActiveProvider), Error> {
    let index = VectorIndex::load(&config.index.path)?;

    let embedder = Arc::new(GeminiProvider::new(config.google_api_key.as_deref())?);

    let report = select_chat_provider(config);
    let Some(chat) = report.provider else {
        return Err(Error::Config {
            message: "No chat provider available — both Groq and Gemini failed to initialize"
                .into(),
        });
    };

    let engine = Arc::new(QueryEngine::new(
        index,
        chat,
        embedder,
        EngineSettings {
            chat_model: match report.active {
                ActiveProvider::Secondary => config.gemini_model.clone(),
                _ => config.groq_model.clone(),
            },
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
            top_k: config.similarity_top_k,
        },
    ));

    Ok((engine, report.active))
}

/// Build the chat runtime, degrading on any initialization failure.
pub fn build_runtime(config: &AppConfig) -> ChatRuntime {
    let assembler = ContextAssembler::new(prompts::SYSTEM_PROMPT);

    match try_build_engine(config) {
        Ok((engine, active)) => {
            info!(provider = active.label(), chunks = engine.chunk_count(), "System ready");
            ChatRuntime::new(Some(engine), assembler, active)
        }
        Err(e) => {
            warn!(error = %e, "Initialization failed — entering degraded mode");
            ChatRuntime::new(None, assembler, ActiveProvider::None)
        }
    }
}

/// Build the full Axum router: health, JSON API, embedded frontend.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(api::health_handler))
        .nest("/api/v1", api::v1_router(state.clone()))
        .merge(frontend::frontend_router(state))
        .layer(DefaultBodyLimit::max(64 * 1024)) // one question per request
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Assemble the shared state for a runtime.
pub fn build_state(runtime: ChatRuntime, logo: Option<Vec<u8>>) -> SharedState {
    Arc::new(GatewayState {
        runtime,
        sessions: RwLock::new(HashMap::new()),
        logo,
        readme: prompts::README_CONTENT,
        start_time: Utc::now(),
    })
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let runtime = build_runtime(&config);
    if runtime.is_degraded() {
        warn!("Serving in degraded mode — every turn will return the fixed failure reply");
    }

    // The logo is decorative: missing file is a warning, never an error.
    let logo = match std::fs::read(&config.gateway.logo_path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(
                path = %config.gateway.logo_path.display(),
                error = %e,
                "Decorative logo not found — serving without it"
            );
            None
        }
    };

    let state = build_state(runtime, logo);
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
