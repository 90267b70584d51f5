/// Chatter text filter
///
/// Masks profanity in outgoing message bodies and channel names before they
/// leave the client. Matching is whole-word and case-insensitive; each letter
/// of a matched word becomes `*`.
///
/// The built-in dictionaries are tiny. Deployments that need more load
/// a real word list with `dictionary::load_words_file`.

pub mod clean;
pub mod dictionary;

pub use clean::ProfanityFilter;
pub use dictionary::Language;
