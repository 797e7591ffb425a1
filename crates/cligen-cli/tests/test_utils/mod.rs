//! Test utilities for cligen integration tests

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// External imports (alphabetized)
use anyhow::Context;
use tempfile::TempDir;

/// Creates a temporary directory for test outputs
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

/// Path of a spec under the workspace's `tests/fixtures/openapi`
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures/openapi")
        .join(name)
}

/// Writes a spec file with the given content into `dir`
pub fn write_spec(dir: &Path, name: &str, content: &str) -> anyhow::Result<PathBuf> {
    let spec_path = dir.join(name);
    fs::write(&spec_path, content)
        .with_context(|| format!("Failed to write spec {}", spec_path.display()))?;
    Ok(spec_path)
}

/// Runs the cligen binary with the given arguments
pub fn cligen<I, S>(args: I) -> anyhow::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    cligen_with_env(args, &[])
}

/// Runs the cligen binary with extra environment variables
pub fn cligen_with_env<I, S>(args: I, envs: &[(&str, &Path)]) -> anyhow::Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut command = Command::new(env!("CARGO_BIN_EXE_cligen"));
    command.args(args).env_remove("CLIGEN_TEMPLATE_PATH");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().context("Failed to run cligen")
}

/// Whether an interpreter is available to check generated scripts with
pub fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Runs a generated script with `interpreter`, bypassing any configured proxy
pub fn run_script(interpreter: &str, script: &Path, args: &[&str]) -> anyhow::Result<Output> {
    Command::new(interpreter)
        .arg(script)
        .args(args)
        .env("no_proxy", "*")
        .env("NO_PROXY", "*")
        .output()
        .with_context(|| format!("Failed to run {} with {}", script.display(), interpreter))
}
