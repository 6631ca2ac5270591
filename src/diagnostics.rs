//! Error reporting state for one driver session.
//!
//! The original design kept `had_error`/`had_runtime_error` as process-wide
//! flags; here they live on a value the driver owns and threads through the
//! front-end passes.  Reporting prints to stderr immediately and records the
//! flag -- it never unwinds past its call site.

use log::debug;

use crate::error::RillError;
use crate::interpreter::RuntimeError;

/// Accumulated error state for one run of the pipeline.
///
/// `had_error` covers static (lex/parse/resolve) errors; `had_runtime_error`
/// covers evaluation failures.  The driver consults both to pick an exit
/// code, and resets them between REPL lines.
#[derive(Debug, Default)]
pub struct Diagnostics {
    had_error: bool,
    had_runtime_error: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a static error and latch the error flag.
    pub fn report(&mut self, err: &RillError) {
        debug!("Reporting static error: {}", err);

        eprintln!("{}", err);
        self.had_error = true;
    }

    /// Report a runtime error and latch the runtime-error flag.
    pub fn report_runtime(&mut self, err: &RuntimeError) {
        debug!("Reporting runtime error: {}", err);

        eprintln!("{}", err);
        self.had_runtime_error = true;
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clear both flags.  Used between REPL lines so one bad line does not
    /// poison the next.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }
}
