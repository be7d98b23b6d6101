use crate::pipeline::split_extension;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a proposed base name cannot be used on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidName {
    #[error("empty name")]
    Empty,
    #[error("invalid characters")]
    InvalidCharacters,
    #[error("reserved filename")]
    Reserved,
}

/// Characters that are rejected in a base name on every supported platform.
const ILLEGAL_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names that Windows reserves regardless of extension.
const RESERVED_STEMS: [&str; 22] = [
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Classify a candidate base name. Returns `None` when the name is usable.
///
/// Pure function of the string; the checks run against the
/// whitespace-trimmed name, and the reserved-name check compares the
/// extension-stripped stem case-insensitively.
pub fn invalid_name_reason(name: &str) -> Option<InvalidName> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Some(InvalidName::Empty);
    }
    if trimmed.chars().any(|c| ILLEGAL_CHARS.contains(&c)) {
        return Some(InvalidName::InvalidCharacters);
    }
    let (stem, _) = split_extension(trimmed);
    if RESERVED_STEMS.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        return Some(InvalidName::Reserved);
    }
    None
}
