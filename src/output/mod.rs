//! Rendering of evaluation results, as colored text or as JSON

mod json;
mod text;

pub use json::JsonFormatter;
pub use text::TextFormatter;

use crate::orchestrator::OrchestratorResult;
use std::io::Write;

/// How much of the result is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Summary line only
    Quiet,
    #[default]
    Normal,
    /// Adds identity, skipped repositories and full decision records
    Verbose,
}

impl Verbosity {
    /// `--quiet` wins over `--verbose`
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (_, true) => Verbosity::Quiet,
            (true, false) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}

/// Writes an orchestrator result
pub trait OutputFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Pick the formatter for the command-line flags
pub fn create_formatter(json: bool, verbosity: Verbosity, color: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter::new(verbosity))
    } else {
        Box::new(TextFormatter::new(verbosity, color))
    }
}
