mod client;
mod detect;
mod language;

pub use client::{Response, TranslatedText, TranslationRequest, translate};
pub use detect::detect_language;
pub use language::{Language, TranslationLanguages};
