//! Canonical token stream for scoring.
//!
//! [`normalize`] lowercases, replaces every character outside
//! `[a-z0-9]` and whitespace with a space, collapses whitespace and trims.
//! The order matters: `"C++"` becomes `"c"` and `"Node.js"` becomes
//! `"node js"`.

/// Normalize `text` into lowercase ASCII alphanumerics separated by single spaces.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            // Uppercase ASCII cannot survive to_lowercase, so everything else
            // (punctuation, whitespace, non-ASCII letters) is a separator.
            pending_space = true;
        }
    }

    out
}

/// Whitespace-delimited tokens of a normalized text.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split_whitespace()
}
