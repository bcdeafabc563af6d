use anyhow::Result;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

use crate::context::ApiContext;
use crate::input::InputReader;
use crate::translation::TranslationRequest;
use crate::ui::Spinner;
use crate::{direction, orchestrator, outcome};

pub struct TranslateOptions {
    pub words: Vec<String>,
    pub direction: Option<String>,
    pub show_spinner: bool,
}

pub async fn run_translate(
    options: TranslateOptions,
    ctx: Arc<ApiContext>,
    deadline: Instant,
) -> Result<()> {
    let input = InputReader::read(&options.words)?;

    let spinner = options
        .show_spinner
        .then(|| Spinner::new("Checking direction..."));

    let pair = direction::resolve(
        &ctx,
        options.direction.as_deref(),
        &input.text,
        input.is_dictionary,
        deadline,
    )
    .await?;
    debug!(
        from = %pair.from,
        to = %pair.to,
        dictionary = input.is_dictionary,
        "resolved direction"
    );

    if let Some(spinner) = &spinner {
        spinner.set_message(if input.is_dictionary {
            "Looking up..."
        } else {
            "Translating..."
        });
    }

    let request = TranslationRequest {
        text: input.text,
        source_language: pair.from,
        target_language: pair.to,
    };
    let outcomes = orchestrator::run(ctx, request, input.is_dictionary, deadline).await?;

    drop(spinner);

    let mut stdout = io::stdout().lock();
    outcome::write_present(&mut stdout, &outcomes)?;
    stdout.flush()?;

    Ok(())
}
