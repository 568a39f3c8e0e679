//! Prompt templates sent to the generative models.
//!
//! The illustration and narration requests send the story text verbatim, so
//! the only template is the story request itself.

/// Build the text-model prompt for a new story.
///
/// ```rust
/// use story_gateway::prompts::story_prompt;
///
/// assert_eq!(
///     story_prompt("a lost robot", 100),
///     "Write a story about a lost robot in about 100 words"
/// );
/// ```
pub fn story_prompt(subject: &str, words: u32) -> String {
    format!("Write a story about {} in about {} words", subject.trim(), words)
}
