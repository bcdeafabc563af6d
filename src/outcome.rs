//! Printable API results and their priority-ordered merge.

use std::io::{self, Write};

use crate::error::Error;

/// A checkable, printable response of a remote operation.
///
/// The orchestrator only ever works through this trait; it never inspects
/// which concrete response it holds.
pub trait Outcome: Send {
    /// Display text of the response.
    fn render(&self) -> String;

    /// `false` when the response carries nothing worth printing.
    fn is_present(&self) -> bool;
}

/// Result of one concurrent task, tagged with its output position.
pub struct Item {
    pub outcome: Result<Box<dyn Outcome>, Error>,
    pub priority: u8,
}

impl Item {
    pub fn new<T: Outcome + 'static>(result: Result<T, Error>, priority: u8) -> Self {
        Self {
            outcome: result.map(|o| Box::new(o) as Box<dyn Outcome>),
            priority,
        }
    }
}

/// Orders items by priority and splits successes from failures.
///
/// Returns every payload in ascending priority order, or, when any item
/// failed, one error built from all failures (also in priority order).
pub fn merge(mut items: Vec<Item>) -> Result<Vec<Box<dyn Outcome>>, Error> {
    items.sort_by_key(|item| item.priority);

    let mut outcomes = Vec::with_capacity(items.len());
    let mut errors = Vec::new();

    for item in items {
        match item.outcome {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => errors.push(e),
        }
    }

    match Error::join(errors) {
        Some(err) => Err(err),
        None => Ok(outcomes),
    }
}

/// Writes every present outcome, one block per outcome.
pub fn write_present<W: Write>(out: &mut W, outcomes: &[Box<dyn Outcome>]) -> io::Result<()> {
    for outcome in outcomes.iter().filter(|o| o.is_present()) {
        writeln!(out, "{}", outcome.render())?;
    }
    Ok(())
}
