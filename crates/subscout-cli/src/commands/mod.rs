//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `pipeline` - Shared utility that loads a CSV and runs detection
//! - `detect` - Subscription listing (table or JSON)
//! - `savings` - What-if cancellation calculator
//! - `export` - Subscription report export

pub mod detect;
pub mod export;
pub mod pipeline;
pub mod savings;

// Re-export command functions for main.rs
pub use detect::*;
pub use export::*;
pub use pipeline::*;
pub use savings::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
