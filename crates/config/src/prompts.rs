//! Embedded prompt and documentation texts.
//!
//! The system instruction and the project README are compiled into the
//! binary with `include_str!`, enabling single-binary deployment. Neither
//! is logic — they are externally supplied configuration the chat loop
//! treats as opaque text.

/// The fixed system instruction prepended to every assembled query.
pub const SYSTEM_PROMPT: &str = include_str!("../assets/system_prompt.md");

/// The README shown by the gateway's readme view.
pub const README_CONTENT: &str = include_str!("../assets/readme.md");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_is_embedded() {
        assert!(SYSTEM_PROMPT.contains("ConnectSense"));
        assert!(SYSTEM_PROMPT.contains("South Asia"));
    }

    #[test]
    fn readme_is_embedded() {
        assert!(README_CONTENT.contains("Digital Divide"));
    }
}
