//! Retrieval for ConnectSense.
//!
//! [`VectorIndex`] deserializes the prebuilt index artifact and answers
//! cosine top-k searches over it; [`QueryEngine`] wires the index to the
//! embedding and chat providers: embed the query, retrieve grounding
//! chunks, generate an answer. Index construction (chunking, corpus
//! embedding) happens elsewhere — this crate only consumes the artifact.

pub mod engine;
pub mod index;

pub use engine::QueryEngine;
pub use index::{IndexChunk, RetrievedChunk, VectorIndex, cosine_similarity};
