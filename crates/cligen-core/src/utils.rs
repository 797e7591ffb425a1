//! String transformation utilities for command and flag names

/// Split a string into lowercase alphanumeric words.
///
/// Any non-alphanumeric character is a separator, and an uppercase letter
/// that follows a lowercase one starts a new word.
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_is_lowercase = false;
            continue;
        }

        if ch.is_uppercase() && prev_is_lowercase && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(ch.to_lowercase());
        prev_is_lowercase = ch.is_lowercase();
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    words(s).join("-")
}

/// Collapse every whitespace run (including newlines) into a single space
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
