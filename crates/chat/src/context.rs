//! Context-window assembly.
//!
//! Each turn sends one prompt string built from three parts: the fixed
//! system instruction, a bounded window of recent history, and the new
//! question. The window covers at most the last 10 stored messages,
//! iterated in strides of 2; a stride whose second element is absent (a
//! trailing unanswered user message) is dropped, so only complete
//! user/assistant pairs are formatted.
//!
//! Error replies are ordinary assistant messages here — they are not
//! filtered out of the window.

use connectsense_core::message::Message;

/// Most recent messages eligible for the context window (5 pairs).
const DEFAULT_WINDOW: usize = 10;

/// Builds the per-turn prompt from history and the new question.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    instruction: String,
    window: usize,
}

impl ContextAssembler {
    /// Create an assembler with the given system instruction.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            window: DEFAULT_WINDOW,
        }
    }

    /// Override the window size (tests).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Format the bounded history window as "Previous Interaction" blocks.
    ///
    /// Empty when history has fewer than two messages in the window.
    pub fn context_block(&self, messages: &[Message]) -> String {
        let start = messages.len().saturating_sub(self.window);
        let recent = &messages[start..];

        let mut block = String::new();
        let mut i = 0;
        while i + 1 < recent.len() {
            block.push_str(&format!(
                "### Previous Interaction:\n**User**: {}\n**Assistant**: {}\n\n",
                recent[i].content,
                recent[i + 1].content
            ));
            i += 2;
        }
        block
    }

    /// Combine instruction, context window, and the new question into the
    /// single prompt string handed to the query engine.
    pub fn assemble(&self, messages: &[Message], question: &str) -> String {
        format!(
            "{}\n\n{}\n### New Question:\n{}",
            self.instruction,
            self.context_block(messages),
            question
        )
    }
}
