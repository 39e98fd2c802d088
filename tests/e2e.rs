//! CLI tests for the harness binary.
//!
//! Each test lays out a fake source tree whose `e2e.yaml` "builds" the subject
//! by copying a small shell script into place.

use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const FAKE_SUBJECT: &str = r#"#!/bin/sh
case "$1" in
  bad) echo "cannot parse $1" >&2; exit 1 ;;
  *) echo "human: $*" ;;
esac
"#;

/// A source tree at `<root>` with the harness temp dir at `<root>/.e2e/tmp`.
struct Workspace {
    root: TempDir,
    tmp_dir: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        let tmp_dir = root.path().join(".e2e").join("tmp");
        fs::create_dir_all(&tmp_dir).unwrap();

        let fixture = root.path().join("subject.sh");
        fs::write(&fixture, FAKE_SUBJECT).unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&fixture, fs::Permissions::from_mode(0o755)).unwrap();
        }
        let ws = Self { root, tmp_dir };
        ws.set_build(&format!("[cp, {:?}]", fixture.display().to_string()));
        ws
    }

    fn set_build(&self, build: &str) {
        fs::write(self.root.path().join("e2e.yaml"), format!("build: {build}\n")).unwrap();
    }

    fn spec(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn harness(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_e2e-harness"));
        cmd.env("E2E_TMP_DIR", &self.tmp_dir)
            .env_remove("E2E_NO_CLEANUP")
            .env("NO_COLOR", "1")
            .env("E2E_LOG", "off");
        cmd
    }

    fn run<P: AsRef<OsStr>>(&self, specs: &[P]) -> Output {
        self.harness().args(specs).output().unwrap()
    }

    fn scripts(&self) -> Vec<PathBuf> {
        fs::read_dir(&self.tmp_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == "sh"))
            .collect()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn passing_case_prints_only_its_name() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "basic.yaml",
        "suite:\n  cases:\n    - name: basic\n      test: \"echo hello; exit 0\"\n",
    );

    let output = ws.run(&[&spec]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim_end(), "basic");
}

#[test]
fn default_logging_keeps_stderr_quiet() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "basic.yaml",
        "suite:\n  cases:\n    - name: basic\n      test: 'true'\n",
    );

    let output = ws.harness().env_remove("E2E_LOG").arg(&spec).output().unwrap();

    assert!(output.status.success());
    assert_eq!(stderr(&output), "");
    assert_eq!(stdout(&output).trim_end(), "basic");
}

#[test]
fn non_zero_exit_without_marker_is_reported_as_passed() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "boom.yaml",
        "suite:\n  cases:\n    - name: boom\n      test: \"exit 2\"\n",
    );

    let output = ws.run(&[&spec]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("boom"));
    assert!(!out.contains("Failed"));
}

#[test]
fn should_fail_case_that_succeeds_is_reported_as_failed() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "number.yaml",
        r#"
suite:
  cases:
    - name: plain number is rejected
      test: "%%human%% 1000; %%should-fail%%"
"#,
    );

    let output = ws.run(&[&spec]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Failed: plain number is rejected"), "{out}");
    assert!(out.contains("\tStdOut human: 1000"), "{out}");
    assert!(out.contains("\tStdErr "), "{out}");
}

#[test]
fn should_fail_case_with_exit_one_passes() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "number.yaml",
        r#"
suite:
  cases:
    - name: garbage is rejected
      test: "%%human%% bad; %%should-fail%%"
"#,
    );

    let output = ws.run(&[&spec]);

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert_eq!(stdout(&output).trim_end(), "garbage is rejected");
}

#[test]
fn files_and_cases_run_in_argument_order() {
    let ws = Workspace::new();
    let second = ws.spec(
        "b.yaml",
        "suite:\n  cases:\n    - name: b1\n      test: 'true'\n",
    );
    let first = ws.spec(
        "a.yaml",
        "suite:\n  cases:\n    - name: a1\n      test: 'true'\n    - name: a2\n      test: 'true'\n",
    );

    let output = ws.run(&[&second, &first]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let names: Vec<_> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(names, ["b1", "a1", "a2"]);
}

#[test]
fn setup_and_cleanup_are_acknowledged() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "lifecycle.yaml",
        r#"
suite:
  cases:
    - name: lifecycle
      setup: "touch setup-ran"
      test: "true"
      cleanup: "touch cleanup-ran"
"#,
    );

    let output = ws.run(&[&spec]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let lines: Vec<_> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(lines, ["handle setup", "lifecycle", "handle cleanup"]);
}

#[test]
fn scripts_are_removed_after_each_case() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "cleanup.yaml",
        "suite:\n  cases:\n    - name: one\n      test: 'true'\n    - name: two\n      test: 'exit 1'\n",
    );

    let output = ws.run(&[&spec]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(ws.scripts().is_empty());
    assert!(ws.tmp_dir.join("human").exists());
}

#[test]
fn no_cleanup_keeps_scripts() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "keep.yaml",
        "suite:\n  cases:\n    - name: one\n      test: '%%human%% 1'\n    - name: two\n      test: 'true'\n",
    );

    let output = ws
        .harness()
        .env("E2E_NO_CLEANUP", "1")
        .arg(&spec)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let scripts = ws.scripts();
    assert_eq!(scripts.len(), 2);
    let bodies: Vec<_> = scripts
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    let expected = format!(
        "#!/usr/bin/env bash\n\n{} 1",
        ws.tmp_dir.join("human").display()
    );
    assert!(bodies.contains(&expected), "{bodies:?}");
}

#[test]
fn build_failure_aborts_before_any_case() {
    let ws = Workspace::new();
    ws.set_build("[sh, -c, 'echo compile error >&2; exit 1']");
    let spec = ws.spec(
        "basic.yaml",
        "suite:\n  cases:\n    - name: basic\n      test: 'true'\n",
    );

    let output = ws.run(&[&spec]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("Build failed"), "{err}");
    assert!(err.contains("compile error"), "{err}");
}

#[test]
fn malformed_spec_aborts_the_run() {
    let ws = Workspace::new();
    let good = ws.spec(
        "good.yaml",
        "suite:\n  cases:\n    - name: ran first\n      test: 'true'\n",
    );
    let bad = ws.spec("bad.yaml", "suite: [unclosed\n");
    let never = ws.spec(
        "never.yaml",
        "suite:\n  cases:\n    - name: never runs\n      test: 'true'\n",
    );

    let output = ws.run(&[&good, &bad, &never]);

    assert_eq!(output.status.code(), Some(2));
    let out = stdout(&output);
    assert!(out.contains("ran first"));
    assert!(!out.contains("never runs"));
    assert!(stderr(&output).contains("bad.yaml"));
}

#[test]
fn missing_suite_key_aborts_the_run() {
    let ws = Workspace::new();
    let spec = ws.spec("nosuite.yaml", "cases:\n  - name: orphan\n");

    let output = ws.run(&[&spec]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("suite"));
}

#[test]
fn missing_tmp_dir_variable_is_fatal() {
    let ws = Workspace::new();
    let spec = ws.spec(
        "basic.yaml",
        "suite:\n  cases:\n    - name: basic\n      test: 'true'\n",
    );

    let output = ws
        .harness()
        .env_remove("E2E_TMP_DIR")
        .arg(&spec)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("E2E_TMP_DIR"));
}

#[test]
fn directory_argument_runs_contained_specs() {
    let ws = Workspace::new();
    let dir = ws.root.path().join("specs");
    fs::create_dir(&dir).unwrap();
    fs::write(
        dir.join("2-second.yaml"),
        "suite:\n  cases:\n    - name: second\n      test: 'true'\n",
    )
    .unwrap();
    fs::write(
        dir.join("1-first.yml"),
        "suite:\n  cases:\n    - name: first\n      test: 'true'\n",
    )
    .unwrap();

    let output = ws.run(&[&dir]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let names: Vec<_> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(names, ["first", "second"]);
}

#[test]
fn no_arguments_is_a_usage_error() {
    let ws = Workspace::new();
    let output = ws.harness().output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Usage"));
}
