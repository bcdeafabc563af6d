use anyhow::{Context, Result, bail};
use std::io::{self, Read};

use super::text::{RequestText, build_text, join_lines};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

pub struct InputReader;

impl InputReader {
    /// Builds the request text from command line words, or from stdin when
    /// no words were given.
    pub fn read(words: &[String]) -> Result<RequestText> {
        let text = if words.is_empty() {
            let input = Self::read_stdin()?;
            build_text(&[join_lines(&input)])
        } else {
            build_text(words)
        };

        text.context(
            "Nothing to translate: empty text\n\n\
             Pass words as arguments or pipe text to stdin.",
        )
    }

    fn read_stdin() -> Result<String> {
        Self::read_limited(io::stdin().lock())
    }

    /// Reads all of `reader` as UTF-8, refusing more than 1 MB.
    pub fn read_limited<R: Read>(mut reader: R) -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(
                    "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                     Consider splitting the input into smaller parts.",
                    buffer.len() as f64 / 1024.0 / 1024.0
                );
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}
