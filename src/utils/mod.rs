//! Utilities module for logging and error handling

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{DermaError, Result};
pub use logging::init_logging;

/// Truncate `text` to at most `max_chars` characters, appending `...` when
/// anything was cut.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
