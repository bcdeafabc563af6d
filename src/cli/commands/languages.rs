use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::time::Instant;

use crate::context::ApiContext;
use crate::error::Error;
use crate::registry::{self, LanguageSet, RegistryKind};
use crate::ui::{Spinner, Style};

/// Prints the languages of both services.
///
/// A service that fails to answer is reported as a warning as long as the
/// other one succeeds.
pub async fn run_languages(
    ctx: Arc<ApiContext>,
    deadline: Instant,
    show_spinner: bool,
) -> Result<()> {
    let spinner = show_spinner.then(|| Spinner::new("Loading languages..."));

    let (translation, dictionary) = tokio::join!(
        registry::load(RegistryKind::Translation, &ctx, deadline),
        registry::load(RegistryKind::Dictionary, &ctx, deadline),
    );

    drop(spinner);

    let mut stdout = io::stdout().lock();

    match (translation, dictionary) {
        (Err(translation), Err(dictionary)) => {
            return Err(Error::Joined(vec![translation.into(), dictionary.into()]).into());
        }
        (translation, dictionary) => {
            for (kind, loaded) in [
                (RegistryKind::Translation, translation),
                (RegistryKind::Dictionary, dictionary),
            ] {
                match loaded {
                    Ok(set) => write_section(&mut stdout, kind, set.as_ref())?,
                    Err(e) => eprintln!("{} {e}", Style::warning("Warning:")),
                }
            }
        }
    }

    stdout.flush()?;
    Ok(())
}

fn title(kind: RegistryKind) -> &'static str {
    match kind {
        RegistryKind::Translation => "Translation languages",
        RegistryKind::Dictionary => "Dictionary directions",
    }
}

fn write_section<W: Write>(
    out: &mut W,
    kind: RegistryKind,
    set: &dyn LanguageSet,
) -> io::Result<()> {
    writeln!(out, "{}", Style::header(title(kind)))?;
    writeln!(out, "{}", set.describe())?;
    writeln!(out)
}
