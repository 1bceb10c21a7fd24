//! The retrieval-augmented query engine.
//!
//! One `query()` call = one embedding request, one index search, one
//! generation request. The engine is handed the assembled prompt (system
//! instruction + context window + new question) and is oblivious to chat
//! history — windowing happens upstream in the chat runtime.
//!
//! The embedder is always Gemini, regardless of which chat provider won
//! the startup selection.

use std::sync::Arc;

use connectsense_core::error::EngineError;
use connectsense_core::provider::{CompletionRequest, EmbeddingRequest, Provider};
use tracing::{debug, info};

use crate::index::{RetrievedChunk, VectorIndex};

/// Settings the engine needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Chat model id passed to the selected provider.
    pub chat_model: String,
    /// Embedding model id passed to the embedder.
    pub embedding_model: String,
    /// Sampling temperature for generation.
    pub temperature: f32,
    /// How many chunks to retrieve per query.
    pub top_k: usize,
}

/// The query engine: index + embedder + chat provider.
pub struct QueryEngine {
    index: VectorIndex,
    chat: Arc<dyn Provider>,
    embedder: Arc<dyn Provider>,
    settings: EngineSettings,
}

impl QueryEngine {
    /// Assemble an engine from its parts.
    pub fn new(
        index: VectorIndex,
        chat: Arc<dyn Provider>,
        embedder: Arc<dyn Provider>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            index,
            chat,
            embedder,
            settings,
        }
    }

    /// Execute one retrieval-augmented query.
    ///
    /// Any provider failure propagates as an `EngineError` to the turn
    /// boundary; the caller converts it into a visible reply.
    pub async fn query(&self, prompt: &str) -> Result<String, EngineError> {
        let embedding = self
            .embedder
            .embed(EmbeddingRequest {
                model: self.settings.embedding_model.clone(),
                input: prompt.to_string(),
            })
            .await
            .map_err(EngineError::Embedding)?;

        let chunks = self.index.search(&embedding.embedding, self.settings.top_k);
        debug!(retrieved = chunks.len(), "Retrieval complete");

        let grounded = render_grounded_prompt(prompt, &chunks);

        let response = self
            .chat
            .complete(CompletionRequest {
                model: self.settings.chat_model.clone(),
                prompt: grounded,
                temperature: self.settings.temperature,
                max_tokens: None,
            })
            .await
            .map_err(EngineError::Generation)?;

        info!(
            provider = self.chat.name(),
            chunks = chunks.len(),
            answer_len = response.text.len(),
            "Query answered"
        );

        Ok(response.text)
    }

    /// Number of chunks available for retrieval.
    pub fn chunk_count(&self) -> usize {
        self.index.len()
    }
}

/// Stuff retrieved chunks above the query, instructing the model to answer
/// from them.
fn render_grounded_prompt(prompt: &str, chunks: &[RetrievedChunk]) -> String {
    if chunks.is_empty() {
        return prompt.to_string();
    }

    let mut out = String::from("Context information from the knowledge base is below.\n");
    out.push_str("---------------------\n");
    for chunk in chunks {
        out.push_str(&format!("[{}] {}\n", chunk.source, chunk.content));
    }
    out.push_str("---------------------\n");
    out.push_str(
        "Given the context information above, answer the query that follows. \
         Prefer the context over prior knowledge where they conflict.\n\n",
    );
    out.push_str(prompt);
    out
}
