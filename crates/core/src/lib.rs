//! # ConnectSense Core
//!
//! Domain types, traits, and error definitions for the ConnectSense
//! connectivity-planning assistant. This crate has **zero framework
//! dependencies** — it defines the domain model that all other crates
//! implement against.
//!
//! ## Design Philosophy
//!
//! The provider boundary is a trait here; implementations live in
//! `connectsense-providers`. This enables:
//! - Swapping inference backends without touching the chat loop
//! - Easy testing with mock/stub providers
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod message;
pub mod provider;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use error::{EngineError, Error, IndexError, ProviderError, Result};
pub use message::{Message, Role, SessionId};
pub use provider::{
    CompletionRequest, CompletionResponse, EmbeddingRequest, EmbeddingResponse, Provider, Usage,
};
pub use session::{ActiveProvider, SessionState, View};
