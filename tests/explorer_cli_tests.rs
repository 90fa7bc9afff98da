//! Behavioural tests for the `explorer` binary.

use std::io::Write;
use std::process::{Command, Output};

use camino::Utf8PathBuf;
use cap_std::{ambient_authority, fs_utf8::Dir};
use eyre::{Result, ensure, eyre};

struct Workspace {
    root: Utf8PathBuf,
    config: Utf8PathBuf,
}

impl Workspace {
    fn new() -> Result<Self> {
        let temp = Utf8PathBuf::from_path_buf(std::env::temp_dir())
            .map_err(|path| eyre!("temp dir is not UTF-8: {}", path.display()))?;
        let root = temp.join(format!("explorer_cli_{}", uuid::Uuid::new_v4()));
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        let photos = root.join("photos");
        let mut file = dir.create("config.json")?;
        write!(
            file,
            r#"{{"photograph": {{"output_dir": "{photos}"}}, "registry": {{"broadcast_period_ms": 50}}}}"#
        )?;
        Ok(Self {
            config: root.join("config.json"),
            root,
        })
    }

    fn remove(self) -> Result<()> {
        Dir::open_ambient_dir(&self.root, ambient_authority())?.remove_open_dir_all()?;
        Ok(())
    }
}

fn run_explorer(args: &[&str]) -> Result<Output> {
    let path = std::env::var_os("CARGO_BIN_EXE_explorer").ok_or_else(|| {
        eyre!("CARGO_BIN_EXE_explorer is not set; ensure the explorer binary is built")
    })?;
    Command::new(path)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .map_err(|err| eyre!(err))
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn rejects_unknown_flags() -> Result<()> {
    let output = run_explorer(&["--bogus", "value"])?;

    ensure!(!output.status.success(), "expected failure status");
    ensure!(
        stderr_of(&output).contains("unexpected argument: --bogus"),
        "expected unexpected argument error"
    );
    Ok(())
}

#[test]
fn rejects_a_flag_without_value() -> Result<()> {
    let output = run_explorer(&["--plan"])?;

    ensure!(!output.status.success(), "expected failure status");
    ensure!(
        stderr_of(&output).contains("missing value for --plan"),
        "expected missing value error"
    );
    Ok(())
}

#[test]
fn rejects_a_missing_config_file() -> Result<()> {
    let output = run_explorer(&["--config", "/nonexistent/explorer.json"])?;

    ensure!(!output.status.success(), "expected failure status");
    ensure!(
        stderr_of(&output).contains("/nonexistent/explorer.json"),
        "expected the config path in the error"
    );
    Ok(())
}

#[test]
fn runs_a_custom_plan_to_completion() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = run_explorer(&[
        "--config",
        workspace.config.as_str(),
        "--plan",
        "(finishdetection); (finishdetection)",
    ])?;
    let photos_created = workspace.root.join("photos").is_dir();
    workspace.remove()?;

    ensure!(
        output.status.success(),
        "expected success, stderr: {}",
        stderr_of(&output)
    );
    ensure!(photos_created, "expected the photo directory to be created");
    Ok(())
}

#[test]
fn failed_step_fails_the_process() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = run_explorer(&[
        "--config",
        workspace.config.as_str(),
        "--plan",
        "(finishdetection);(align robot m1)",
    ])?;
    workspace.remove()?;

    ensure!(!output.status.success(), "expected failure status");
    ensure!(
        stderr_of(&output).contains("Insufficient arguments"),
        "expected the failed step message"
    );
    Ok(())
}
