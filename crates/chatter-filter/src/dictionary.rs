use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Ru,
    En,
    /// Words loaded from a deployment-specific file.
    Custom,
}

/// Order dictionaries are applied in by `ProfanityFilter::clean`.
pub const CLEAN_ORDER: [Language; 3] = [Language::Ru, Language::En, Language::Custom];

const EN_WORDS: &[&str] = &[
    "arse", "asshole", "bastard", "bitch", "boobs", "cunt", "dick", "fuck", "fucking", "shit",
    "slut", "whore",
];

const RU_WORDS: &[&str] = &[
    "блядь", "блять", "говно", "жопа", "мудак", "пизда", "сука", "хуй", "хуйня",
];

pub fn builtin_words(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => EN_WORDS,
        Language::Ru => RU_WORDS,
        Language::Custom => &[],
    }
}

/// Read a newline-separated word list. Blank lines and `#` comments are
/// skipped; words are lowercased.
pub fn load_words_file(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read word list {}", path.display()))?;

    let words: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect();

    tracing::debug!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}
