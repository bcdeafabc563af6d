//! # ytapi - Console Translator
//!
//! `yt` translates words and sentences with the Yandex Cloud translation
//! service, looks single words up in the Yandex dictionary and checks
//! spelling, all within one request deadline.
//!
//! ## Features
//!
//! - **Concurrent requests**: Spelling check and translation run side by side
//! - **Direction guessing**: en/ru from the text, or remote detection with `-g auto`
//! - **Token caching**: IAM tokens are issued once and cached on disk
//!
//! ## Quick Start
//!
//! ```bash
//! # Dictionary lookup of one word
//! yt time
//!
//! # Translation with an explicit direction
//! yt -g en-de "time to start"
//!
//! # Translate stdin, detecting the source language
//! cat notes.txt | yt -g auto
//!
//! # List supported languages
//! yt languages
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/ytapi/config.toml`:
//!
//! ```toml
//! dictionary = "dict.1.1.xxx"
//! auth_cache = "token.json"
//!
//! [translation]
//! folder_id = "b1g..."
//! key_id = "aje..."
//! service_account_id = "aje..."
//! key_file = "key.pem"
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Service account credentials, IAM tokens and the HTTP gateway.
pub mod cloud;

/// Configuration file management.
pub mod config;

/// Service endpoints and the shared API context.
pub mod context;

/// Dictionary lookup and dictionary directions.
pub mod dictionary;

/// Source and target language resolution.
pub mod direction;

/// Error type of a translation run.
pub mod error;

/// File system utilities.
pub mod fs;

/// Input reading from arguments and stdin.
pub mod input;

/// Concurrent spelling check and translation.
pub mod orchestrator;

/// Printable results and their ordered merge.
pub mod outcome;

/// XDG-style path utilities for configuration and cache.
pub mod paths;

/// Language lists of the remote services.
pub mod registry;

/// Spelling check.
pub mod spelling;

/// Machine translation and language detection.
pub mod translation;

/// Terminal UI components (spinner, colors).
pub mod ui;
