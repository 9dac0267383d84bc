//! Dev file setup inside the package directory
//!
//! Static analysis and the in-container tests import `demistomock`, `CommonServerPython` and
//! `CommonServerUserPython` as siblings of the package code, so they are materialized here.
//! The package directory is modified in place.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::config::ContentLayout;
use crate::error::Result;
use crate::exec::{ToolCommand, ToolRunner};

pub const DEMISTOMOCK_FILE: &str = "demistomock.py";
pub const COMMON_SERVER_FILE: &str = "CommonServerPython.py";
pub const COMMON_SERVER_USER_FILE: &str = "CommonServerUserPython.py";

/// Descriptor the shared helper is extracted from, relative to the content directory.
pub const COMMON_SERVER_DESCRIPTOR: &str = "Scripts/script-CommonServerPython.yml";

/// Copy the mock module, create the user helper stub, drop stale bytecode and regenerate the
/// shared helper module.
pub fn setup_dev_files(
    runner: &dyn ToolRunner,
    layout: &ContentLayout,
    package_dir: &Path,
) -> Result<()> {
    fs::copy(layout.demistomock(), package_dir.join(DEMISTOMOCK_FILE))?;
    touch(&package_dir.join(COMMON_SERVER_USER_FILE))?;
    remove_pycache(package_dir)?;

    let output = package_dir.join(COMMON_SERVER_FILE);
    let command = ToolCommand::new("python2")
        .arg(layout.package_extractor().to_string_lossy())
        .args(["-i", COMMON_SERVER_DESCRIPTOR, "-o"])
        .arg(output.to_string_lossy())
        .current_dir(&layout.content_dir);
    runner.run(&command)?;

    debug!("Dev files ready in {}", package_dir.display());
    Ok(())
}

/// Create `path` if missing; existing content is left alone.
fn touch(path: &Path) -> Result<()> {
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

fn remove_pycache(package_dir: &Path) -> Result<()> {
    match fs::remove_dir_all(package_dir.join("__pycache__")) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
