//! Console reporting.
//!
//! Writes one coloured line per case to stdout; failures are followed by the
//! captured output of the test script.

use crate::runner::{CaseResult, Outcome};
use crate::script::ExecutionResult;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

/// Report a finished case on stdout.
pub fn case(result: &CaseResult) {
    emit(|out| write_case(out, result));
}

/// Report a script left on disk for inspection.
pub fn kept(path: &Path) {
    emit(|out| write_kept(out, path));
}

/// Report a lifecycle step that is recognised but not executed.
pub fn placeholder(step: &str) {
    emit(|out| write_placeholder(out, step));
}

fn emit<F>(write: F)
where
    F: FnOnce(&mut io::StdoutLock<'static>) -> io::Result<()>,
{
    let mut out = io::stdout().lock();
    if let Err(e) = write(&mut out).and_then(|()| out.flush()) {
        tracing::warn!("failed to write report: {e}");
    }
}

/// A case without an execution never ran its test and is reported as skipped.
pub fn write_case<W: Write>(out: &mut W, result: &CaseResult) -> io::Result<()> {
    match &result.execution {
        None => writeln!(out, "{}", format!("{} (no test)", result.name).yellow()),
        Some(execution) if result.outcome == Outcome::Failed => {
            write_bad(out, &result.name, execution)
        }
        Some(_) => write_good(out, &result.name),
    }
}

pub fn write_good<W: Write>(out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "{}", name.green())
}

/// Failure line followed by stdout and stderr, each printed even when empty.
pub fn write_bad<W: Write>(out: &mut W, name: &str, execution: &ExecutionResult) -> io::Result<()> {
    writeln!(out, "{}", format!("Failed: {name}").red())?;
    writeln!(out, "\tStdOut {}", execution.stdout)?;
    writeln!(out, "\tStdErr {}", execution.stderr)
}

pub fn write_kept<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    writeln!(out, "{}", format!("\tkept {}", path.display()).dimmed())
}

pub fn write_placeholder<W: Write>(out: &mut W, step: &str) -> io::Result<()> {
    writeln!(out, "{}", format!("handle {step}").dimmed())
}
