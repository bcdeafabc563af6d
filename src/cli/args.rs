use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "yt")]
#[command(about = "Console translator using Yandex translation, dictionary and spelling services")]
#[command(version)]
pub struct Args {
    /// Words to translate (reads stdin if none are given); a single word is looked up in the dictionary
    pub words: Vec<String>,

    /// Translation direction, e.g. "en-ru"; "auto" detects the source language and translates to Russian.
    /// Guessed as en-ru or ru-en from the text when omitted
    #[arg(short = 'g', long)]
    pub direction: Option<String>,

    /// Configuration file [default: ~/.config/ytapi/config.toml]
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Timeout for all requests, in seconds
    #[arg(
        short = 't',
        long,
        global = true,
        value_name = "SECONDS",
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Ignore the cached IAM token (a new one is still cached)
    #[arg(short = 'r', long, global = true)]
    pub reset_cache: bool,

    /// Print debug logs to stderr
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List languages supported by the translation and dictionary services
    Languages,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_words_and_options() {
        let args = Args::try_parse_from(["yt", "-g", "en-ru", "-t", "10", "time", "to", "go"]).unwrap();

        assert_eq!(args.words, ["time", "to", "go"]);
        assert_eq!(args.direction.as_deref(), Some("en-ru"));
        assert_eq!(args.timeout, 10);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["yt"]).unwrap();

        assert!(args.words.is_empty());
        assert_eq!(args.timeout, 5);
        assert!(!args.reset_cache);
        assert!(!args.debug);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_languages_subcommand_with_global_options() {
        let args = Args::try_parse_from(["yt", "languages", "-c", "/tmp/ytapi.toml", "-d"]).unwrap();

        assert!(matches!(args.command, Some(Command::Languages)));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/ytapi.toml")));
        assert!(args.debug);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(Args::try_parse_from(["yt", "-t", "0", "word"]).is_err());
    }
}
