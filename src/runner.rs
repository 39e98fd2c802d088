//! Case execution engine.
//!
//! Walks each case through its lifecycle and decides pass/fail from the
//! script's exit status.

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::report;
use crate::schema::Case;
use crate::script::{ExecutionResult, Script};
use crate::tokens::{self, TokenTable};
use std::path::{Path, PathBuf};

/// Shared state for running cases. Built once per harness run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub tokens: TokenTable,
    /// Where scripts are materialized.
    pub script_dir: PathBuf,
    /// Leave scripts on disk after each case.
    pub keep_scripts: bool,
}

impl RunContext {
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            tokens: TokenTable::new(config.binary_path()),
            script_dir: config.tmp_dir.clone(),
            keep_scripts: config.no_cleanup,
        }
    }
}

/// Lifecycle stages of a case, visited strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    Pending,
    /// Acknowledged but not executed yet.
    Setup,
    TestRun,
    /// Acknowledged but not executed yet.
    Cleanup,
    ScriptCleanup,
    Done,
}

impl CaseState {
    pub fn next(self) -> Self {
        match self {
            CaseState::Pending => CaseState::Setup,
            CaseState::Setup => CaseState::TestRun,
            CaseState::TestRun => CaseState::Cleanup,
            CaseState::Cleanup => CaseState::ScriptCleanup,
            CaseState::ScriptCleanup | CaseState::Done => CaseState::Done,
        }
    }
}

/// Reported outcome of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// The case has no `test` command.
    Skipped,
}

/// Decide the outcome from the exit status and the should-fail marker.
///
/// A non-zero exit is only a failure when the command carries the
/// should-fail token; every other combination passes.
pub fn evaluate(exit_code: i32, expects_failure: bool) -> Outcome {
    if exit_code != 0 && expects_failure {
        Outcome::Failed
    } else {
        Outcome::Passed
    }
}

/// Result of running a single case.
#[derive(Debug, Clone)]
pub struct CaseResult {
    pub name: String,
    pub outcome: Outcome,
    /// Present when the test command ran.
    pub execution: Option<ExecutionResult>,
    /// Script left on disk because cleanup was disabled.
    pub kept_script: Option<PathBuf>,
}

/// Run one case through every lifecycle stage, reporting as it goes.
pub fn run_case(case: &Case, ctx: &RunContext) -> Result<CaseResult> {
    let mut result = CaseResult {
        name: case.name.clone(),
        outcome: Outcome::Skipped,
        execution: None,
        kept_script: None,
    };
    let mut script: Option<Script> = None;
    let mut state = CaseState::Pending;

    loop {
        state = state.next();
        match state {
            CaseState::Pending => {}
            CaseState::Setup => {
                if case.setup.is_some() {
                    report::placeholder("setup");
                }
            }
            CaseState::TestRun => {
                if let Some(test) = &case.test {
                    let (outcome, execution, materialized) = run_test(test, ctx)?;
                    result.outcome = outcome;
                    result.execution = Some(execution);
                    script = Some(materialized);
                }
                report::case(&result);
            }
            CaseState::Cleanup => {
                if case.cleanup.is_some() {
                    report::placeholder("cleanup");
                }
            }
            CaseState::ScriptCleanup => {
                if let Some(script) = script.take() {
                    result.kept_script = script.finish(ctx.keep_scripts)?;
                }
                if let Some(path) = &result.kept_script {
                    report::kept(path);
                }
            }
            CaseState::Done => break,
        }
    }

    Ok(result)
}

fn run_test(test: &str, ctx: &RunContext) -> Result<(Outcome, ExecutionResult, Script)> {
    let expects_failure = tokens::expects_failure(test);
    let command = ctx.tokens.substitute(test);
    let script = Script::materialize(&ctx.script_dir, &command)?;
    let execution = script.execute()?;
    let outcome = evaluate(execution.exit_code, expects_failure);
    Ok((outcome, execution, script))
}

/// Aggregate counts for a harness run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Passed => self.passed += 1,
            Outcome::Failed => self.failed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

/// Load each spec file in order and run all of its cases sequentially.
///
/// A spec that fails to load aborts the run; cases already reported stay
/// reported.
pub fn run_files(files: &[PathBuf], ctx: &RunContext) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    for file in files {
        for result in run_file(file, ctx)? {
            summary.record(result.outcome);
        }
    }
    Ok(summary)
}

fn run_file(path: &Path, ctx: &RunContext) -> Result<Vec<CaseResult>> {
    let suite = crate::loader::load_suite(path)?;
    tracing::info!(path = %path.display(), cases = suite.cases.len(), "running suite");
    suite.cases.iter().map(|case| run_case(case, ctx)).collect()
}
