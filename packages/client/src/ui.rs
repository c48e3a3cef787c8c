//! UI utilities for the client.

use std::io::Write;

pub const PROMPT: &str = "reports> ";

/// Redisplay the prompt after printing a push
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}
