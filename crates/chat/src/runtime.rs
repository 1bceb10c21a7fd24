//! The per-turn chat runtime (query dispatch).
//!
//! One user message triggers exactly one blocking dispatch to the query
//! engine before the next input is accepted. In the degraded state (no
//! engine), every turn short-circuits to a fixed reply with zero engine
//! calls — enforced by construction, the engine simply isn't there.
//!
//! Session state is passed in by mutable reference; the runtime owns no
//! per-session data and can serve many sessions.

use std::sync::Arc;

use connectsense_core::message::Message;
use connectsense_core::session::{ActiveProvider, SessionState};
use connectsense_retrieval::QueryEngine;
use tracing::{info, warn};

use crate::context::ContextAssembler;

/// The fixed reply for every turn taken in the degraded state.
pub const DEGRADED_REPLY: &str =
    "System initialization failed. Please check the application logs for more information.";

/// What one turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// The assistant reply appended to history (answer, error string, or
    /// the degraded-state message).
    pub reply: String,
    /// Whether this turn was served without an engine.
    pub degraded: bool,
}

/// Dispatches turns against the query engine.
pub struct ChatRuntime {
    engine: Option<Arc<QueryEngine>>,
    assembler: ContextAssembler,
    active: ActiveProvider,
}

impl ChatRuntime {
    /// Create a runtime. `engine` is `None` when initialization failed —
    /// the runtime then serves every turn in degraded mode.
    pub fn new(
        engine: Option<Arc<QueryEngine>>,
        assembler: ContextAssembler,
        active: ActiveProvider,
    ) -> Self {
        Self {
            engine,
            assembler,
            active,
        }
    }

    /// Whether the runtime has no engine.
    pub fn is_degraded(&self) -> bool {
        self.engine.is_none()
    }

    /// Which provider turns are served by.
    pub fn active_provider(&self) -> ActiveProvider {
        self.active
    }

    /// Run one turn: append the user message and exactly one assistant
    /// reply. Every failure becomes a reply; nothing propagates.
    pub async fn run_turn(&self, session: &mut SessionState, input: &str) -> TurnOutcome {
        let Some(engine) = &self.engine else {
            warn!("Turn taken in degraded state — no engine call made");
            session.append(Message::user(input));
            session.append(Message::assistant(DEGRADED_REPLY));
            return TurnOutcome {
                reply: DEGRADED_REPLY.to_string(),
                degraded: true,
            };
        };

        // The window is built from pre-turn history; the new question rides
        // under its own header, not as a stored message.
        let prompt = self.assembler.assemble(&session.messages, input);
        session.append(Message::user(input));

        let reply = match engine.query(&prompt).await {
            Ok(answer) => {
                info!(history_len = session.len() + 1, "Turn completed");
                answer
            }
            Err(e) => {
                warn!(error = %e, "Query failed — surfacing inline");
                format!("Error: {e}")
            }
        };

        session.append(Message::assistant(reply.clone()));
        TurnOutcome {
            reply,
            degraded: false,
        }
    }
}
