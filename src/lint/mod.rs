//! Host-side static checkers

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::config::ContentLayout;
use crate::devenv::COMMON_SERVER_FILE;
use crate::error::{PkgDevError, Result};
use crate::exec::{ToolCommand, ToolRunner};
use crate::version::PythonVersion;

fn ignored_code_file() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(CommonServerPython\.py|CommonServerUserPython\.py|demistomock\.py|conftest\.py|test_.*\.py|.*_test\.py)$",
        )
        .expect("static regex is valid")
    })
}

/// Base name of the package's code file: what pylint and mypy are pointed at.
pub fn lint_target(package_dir: &Path) -> Result<String> {
    if package_dir.file_name().is_some_and(|n| n == "CommonServerPython") {
        return Ok(COMMON_SERVER_FILE.to_string());
    }

    let mut candidates = Vec::new();
    for entry in fs::read_dir(package_dir)? {
        let path = entry?.path();
        if !path.is_file() || !path.extension().is_some_and(|ext| ext == "py") {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !ignored_code_file().is_match(name) {
                candidates.push(name.to_string());
            }
        }
    }
    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        PkgDevError::DescriptorError(format!(
            "No python code file found in {}",
            package_dir.display()
        ))
    })
}

/// flake8 over the package, run from the repository root so its config applies.
pub fn run_flake8(
    runner: &dyn ToolRunner,
    layout: &ContentLayout,
    package_dir: &Path,
    version: PythonVersion,
) -> Result<()> {
    info!("========= Running flake8 ===============");
    let python = version.host_python();
    debug!("Using: {} to run flake8", python);

    let command = ToolCommand::new(python)
        .args(["-m", "flake8"])
        .arg(package_dir.to_string_lossy())
        .current_dir(&layout.content_dir);
    runner.run(&command)?;

    info!("flake8 completed");
    Ok(())
}

/// mypy through the shared wrapper script, from inside the package directory.
pub fn run_mypy(
    runner: &dyn ToolRunner,
    layout: &ContentLayout,
    package_dir: &Path,
    version: PythonVersion,
    target: &str,
) -> Result<()> {
    info!("========= Running mypy ===============");

    let command = ToolCommand::new("bash")
        .arg(layout.run_mypy_script().to_string_lossy())
        .arg(version.to_string())
        .arg(target)
        .current_dir(package_dir);
    runner.run(&command)?;

    info!("mypy completed");
    Ok(())
}
