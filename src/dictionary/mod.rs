mod client;
mod language;

pub use client::{Article, Example, Response, Translation, Word, lookup};
pub use language::DictionaryLanguages;
