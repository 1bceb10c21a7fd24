//! Provider selection — one-shot primary→secondary fallback at startup.
//!
//! Construction of the primary (Groq) client is attempted first; on failure
//! the secondary (Gemini) client is attempted. The outcome is an explicit
//! [`SelectionReport`] value inspected by the caller — there is no retry
//! loop, no backoff, and no later re-attempt of the primary. Failures are
//! classified (configuration vs. service) for the logs and the report, but
//! both classes fall back identically.

use std::sync::Arc;

use connectsense_config::AppConfig;
use connectsense_core::error::ProviderError;
use connectsense_core::provider::Provider;
use connectsense_core::session::ActiveProvider;
use tracing::{error, info, warn};

use crate::gemini::GeminiProvider;
use crate::groq::GroqProvider;

/// Why a provider could not be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Local misconfiguration (missing key, bad credentials).
    Configuration,
    /// The remote service is the problem (network, API error).
    Service,
}

impl FailureClass {
    fn of(error: &ProviderError) -> Self {
        if error.is_configuration() {
            FailureClass::Configuration
        } else {
            FailureClass::Service
        }
    }
}

/// One classified construction failure.
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: &'static str,
    pub class: FailureClass,
    pub error: ProviderError,
}

/// The outcome of the one-shot selection.
pub struct SelectionReport {
    /// Which slot won (or `None` for the degraded state).
    pub active: ActiveProvider,
    /// The constructed client, absent in the degraded state.
    pub provider: Option<Arc<dyn Provider>>,
    /// Classified failures encountered along the way (0, 1, or 2 entries).
    pub failures: Vec<ProviderFailure>,
}

impl SelectionReport {
    /// Whether no provider is available.
    pub fn is_degraded(&self) -> bool {
        self.provider.is_none()
    }
}

/// Attempt the primary chat provider, then the secondary.
///
/// This runs exactly once per process lifetime; callers guard re-entry with
/// an "already initialized" check.
pub fn select_chat_provider(config: &AppConfig) -> SelectionReport {
    let mut failures = Vec::new();

    match GroqProvider::new(config.groq_api_key.as_deref()) {
        Ok(provider) => {
            info!(provider = "groq", "Chat provider selected");
            return SelectionReport {
                active: ActiveProvider::Primary,
                provider: Some(Arc::new(provider)),
                failures,
            };
        }
        Err(e) => {
            let class = FailureClass::of(&e);
            warn!(
                provider = "groq",
                class = ?class,
                error = %e,
                "Primary provider initialization failed. Falling back to Gemini."
            );
            failures.push(ProviderFailure {
                provider: "groq",
                class,
                error: e,
            });
        }
    }

    match GeminiProvider::new(config.google_api_key.as_deref()) {
        Ok(provider) => {
            info!(provider = "gemini", "Chat provider selected (fallback)");
            SelectionReport {
                active: ActiveProvider::Secondary,
                provider: Some(Arc::new(provider)),
                failures,
            }
        }
        Err(e) => {
            let class = FailureClass::of(&e);
            error!(
                provider = "gemini",
                class = ?class,
                error = %e,
                "Secondary provider initialization failed — no chat provider available"
            );
            failures.push(ProviderFailure {
                provider: "gemini",
                class,
                error: e,
            });
            SelectionReport {
                active: ActiveProvider::None,
                provider: None,
                failures,
            }
        }
    }
}
