//! Agent glue for the external question-answering engine
//!
//! The core hands a resolved clone path and a prompt to a provider CLI and
//! reads the answer back; everything about the session protocol lives on
//! the other side of that subprocess boundary.

mod backend;

pub use backend::{backend_for, Backend, ClaudeBackend, OpencodeBackend};

/// Assemble the prompt handed to the agent
///
/// A repo's `specialNotes` are prepended verbatim as context when present.
pub fn build_prompt(question: &str, special_notes: Option<&str>) -> String {
    match special_notes {
        Some(notes) if !notes.trim().is_empty() => {
            format!(
                "Context about this repository: {}\n\n{}",
                notes.trim(),
                question
            )
        }
        _ => question.to_string(),
    }
}
