//! Provider implementations for ConnectSense.
//!
//! Two backends, one trait:
//! - [`GroqProvider`] — Groq's OpenAI-compatible chat completions endpoint
//!   (the primary chat backend).
//! - [`GeminiProvider`] — Google's native Gemini API (the chat fallback and
//!   the only embedding backend).
//!
//! [`selector`] makes the one-shot primary→secondary decision at startup.

pub mod gemini;
pub mod groq;
pub mod selector;

pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use selector::{FailureClass, ProviderFailure, SelectionReport, select_chat_provider};
