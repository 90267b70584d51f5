use std::collections::{BTreeMap, HashSet};

use crate::dictionary::{CLEAN_ORDER, Language, builtin_words};

const MASK: char = '*';

#[derive(Debug, Clone)]
pub struct ProfanityFilter {
    dictionaries: BTreeMap<Language, HashSet<String>>,
}

impl Default for ProfanityFilter {
    fn default() -> Self {
        let mut filter = Self::empty();
        for language in [Language::Ru, Language::En] {
            filter.add_words(language, builtin_words(language).iter().copied());
        }
        filter
    }
}

impl ProfanityFilter {
    /// Filter with no words at all; `clean` returns its input unchanged.
    pub fn empty() -> Self {
        Self {
            dictionaries: BTreeMap::new(),
        }
    }

    pub fn add_words<I, S>(&mut self, language: Language, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dictionary = self.dictionaries.entry(language).or_default();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if !word.is_empty() {
                dictionary.insert(word);
            }
        }
    }

    pub fn word_count(&self) -> usize {
        self.dictionaries.values().map(HashSet::len).sum()
    }

    pub fn is_profane(&self, word: &str) -> bool {
        let lowered = word.to_lowercase();
        self.dictionaries.values().any(|d| d.contains(&lowered))
    }

    /// Run every dictionary over `text`, Russian first, then English, then
    /// custom words.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = text.to_string();
        for language in CLEAN_ORDER {
            if let Some(dictionary) = self.dictionaries.get(&language) {
                cleaned = mask_words(&cleaned, dictionary);
            }
        }
        cleaned
    }
}

fn mask_words(text: &str, dictionary: &HashSet<String>) -> String {
    if dictionary.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush_word(&mut out, &mut word, dictionary);
            out.push(c);
        }
    }
    flush_word(&mut out, &mut word, dictionary);

    out
}

fn flush_word(out: &mut String, word: &mut String, dictionary: &HashSet<String>) {
    if word.is_empty() {
        return;
    }
    if dictionary.contains(&word.to_lowercase()) {
        out.extend(std::iter::repeat_n(MASK, word.chars().count()));
    } else {
        out.push_str(word);
    }
    word.clear();
}
