//! Resolves the source and target languages of a request.
//!
//! A direction is either the `auto` sentinel (ask the remote detector),
//! an explicit `"from-to"` string, or absent (guess `en`/`ru` from the
//! characters of the text). Pairs made only of well-known languages are
//! accepted as is; anything else is checked against the language registry
//! of the service that will handle the request.

use thiserror::Error;
use tokio::time::Instant;
use tracing::debug;

use crate::context::ApiContext;
use crate::error::Error;
use crate::registry::{self, RegistryKind};
use crate::translation;

pub const EN: &str = "en";
pub const RU: &str = "ru";
pub const UK: &str = "uk";

/// Direction value that requests remote source language detection.
pub const AUTO_DETECT: &str = "auto";

/// Target language of auto-detected requests.
pub const DEFAULT_TARGET: &str = RU;

// "en-ru" is the common case; a little slack allows 3-letter codes.
const MIN_DIRECTION_LENGTH: usize = 5;
const MAX_DIRECTION_LENGTH: usize = 7;

/// Languages that never need a registry check.
const KNOWN_LANGUAGES: [&str; 3] = [EN, RU, UK];

#[derive(Debug, Error)]
pub enum DirectionError {
    #[error("too short direction format='{0}'")]
    TooShort(String),

    #[error("too long direction format='{0}'")]
    TooLong(String),

    #[error("invalid direction format: '{0}', expected \"from-to\", for example \"en-ru\"")]
    Malformed(String),

    #[error("auto detect language error: the service returned no language")]
    Undetected,

    #[error("unknown language direction: {from} -> {to}\n\nAvailable: {available}")]
    Unsupported {
        from: String,
        to: String,
        available: String,
    },
}

/// Resolved source and target languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub from: String,
    pub to: String,
}

impl LanguagePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Whether both languages belong to the fixed well-known set.
    pub fn is_known(&self) -> bool {
        known_languages(&[&self.from, &self.to])
    }
}

/// `true` when every language is well-known; `false` for an empty slice.
pub fn known_languages(languages: &[&str]) -> bool {
    !languages.is_empty() && languages.iter().all(|l| KNOWN_LANGUAGES.contains(l))
}

/// Guesses the direction by comparing ASCII letters with non-ASCII
/// characters. Ties, including empty text, go to `ru -> en`.
pub fn ascii_detection(text: &str) -> LanguagePair {
    let (ascii, non_ascii) = text.chars().fold((0usize, 0usize), |(a, n), c| {
        if c.is_ascii_alphabetic() {
            (a + 1, n)
        } else if !c.is_ascii() {
            (a, n + 1)
        } else {
            (a, n)
        }
    });

    if ascii > non_ascii {
        LanguagePair::new(EN, RU)
    } else {
        LanguagePair::new(RU, EN)
    }
}

/// Parses an explicit `"from-to"` direction.
pub fn parse_direction(direction: &str) -> Result<LanguagePair, DirectionError> {
    let length = direction.chars().count();
    if length > MAX_DIRECTION_LENGTH {
        return Err(DirectionError::TooLong(direction.to_string()));
    }
    if length < MIN_DIRECTION_LENGTH {
        return Err(DirectionError::TooShort(direction.to_string()));
    }

    let parts: Vec<&str> = direction.split('-').collect();
    let valid = |code: &&str| !code.is_empty() && code.chars().all(|c| c.is_ascii_alphabetic());

    match parts.as_slice() {
        [from, to] if valid(from) && valid(to) => Ok(LanguagePair::new(
            from.to_ascii_lowercase(),
            to.to_ascii_lowercase(),
        )),
        _ => Err(DirectionError::Malformed(direction.to_string())),
    }
}

/// Produces a candidate pair without touching the registries.
async fn candidate(
    ctx: &ApiContext,
    direction: Option<&str>,
    text: &str,
    deadline: Instant,
) -> Result<LanguagePair, Error> {
    match direction {
        Some(AUTO_DETECT) => {
            let detected = translation::detect_language(ctx, text, deadline).await?;
            if detected.is_empty() {
                return Err(DirectionError::Undetected.into());
            }
            Ok(LanguagePair::new(detected, DEFAULT_TARGET))
        }
        Some(direction) => Ok(parse_direction(direction)?),
        None => Ok(ascii_detection(text)),
    }
}

/// Resolves and validates the language pair of a request.
///
/// Dictionary lookups are validated against the dictionary directions,
/// everything else against the translation languages.
pub async fn resolve(
    ctx: &ApiContext,
    direction: Option<&str>,
    text: &str,
    is_dictionary: bool,
    deadline: Instant,
) -> Result<LanguagePair, Error> {
    let pair = candidate(ctx, direction, text, deadline).await?;

    if pair.is_known() {
        debug!(from = %pair.from, to = %pair.to, "well-known direction");
        return Ok(pair);
    }

    let kind = if is_dictionary {
        RegistryKind::Dictionary
    } else {
        RegistryKind::Translation
    };
    let languages = registry::load(kind, ctx, deadline).await?;

    if !languages.supports(&pair.from, &pair.to) {
        return Err(DirectionError::Unsupported {
            from: pair.from,
            to: pair.to,
            available: languages.list(),
        }
        .into());
    }

    debug!(from = %pair.from, to = %pair.to, registry = %kind, "direction checked");
    Ok(pair)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_direction() {
        assert_eq!(parse_direction("ru-en").unwrap(), LanguagePair::new(RU, EN));
        assert_eq!(parse_direction("EN-De").unwrap(), LanguagePair::new("en", "de"));
        assert_eq!(
            parse_direction("kk-ru").unwrap(),
            LanguagePair::new("kk", "ru")
        );
    }

    #[test]
    fn test_parse_direction_length() {
        assert!(matches!(
            parse_direction("ru"),
            Err(DirectionError::TooShort(d)) if d == "ru"
        ));
        assert!(matches!(
            parse_direction("toolongdir"),
            Err(DirectionError::TooLong(_))
        ));
        assert!(matches!(
            parse_direction(""),
            Err(DirectionError::TooShort(_))
        ));
    }

    #[test]
    fn test_parse_direction_malformed() {
        for direction in ["ru-e-k", "ruen-", "-ruen", "ru_en", "12-34", "ru--en"] {
            assert!(
                matches!(
                    parse_direction(direction),
                    Err(DirectionError::Malformed(_))
                ),
                "{direction} should be rejected"
            );
        }
        // Three codes do not fit in the length bound at all.
        assert!(matches!(
            parse_direction("ru-en-kz"),
            Err(DirectionError::TooLong(_))
        ));
    }

    #[test]
    fn test_ascii_detection() {
        assert_eq!(ascii_detection("hello"), LanguagePair::new(EN, RU));
        assert_eq!(ascii_detection("привет"), LanguagePair::new(RU, EN));
        assert_eq!(ascii_detection("hello мир"), LanguagePair::new(EN, RU));
        assert_eq!(ascii_detection("hi мир"), LanguagePair::new(RU, EN));
    }

    #[test]
    fn test_ascii_detection_ties_and_symbols() {
        // Two letters on each side.
        assert_eq!(ascii_detection("ab вг"), LanguagePair::new(RU, EN));
        assert_eq!(ascii_detection(""), LanguagePair::new(RU, EN));
        // Digits and punctuation count for neither side.
        assert_eq!(ascii_detection("a, 123!"), LanguagePair::new(EN, RU));
        assert_eq!(ascii_detection("123 ,.!"), LanguagePair::new(RU, EN));
    }

    #[test]
    fn test_known_languages() {
        assert!(known_languages(&["en", "ru"]));
        assert!(known_languages(&["uk", "uk"]));
        assert!(!known_languages(&["en", "de"]));
        assert!(!known_languages(&[]));
        assert!(LanguagePair::new(UK, EN).is_known());
        assert!(!LanguagePair::new("EN", RU).is_known());
    }

    #[test]
    fn test_unsupported_message_names_languages() {
        let err = DirectionError::Unsupported {
            from: "xx".to_string(),
            to: "yy".to_string(),
            available: "en-ru, ru-en".to_string(),
        };
        let message = err.to_string();

        assert!(message.contains("xx -> yy"));
        assert!(message.contains("en-ru, ru-en"));
    }
}
