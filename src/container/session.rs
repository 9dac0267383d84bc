//! The ephemeral container that runs pylint and pytest

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ContentLayout;
use crate::container::docker::{CreateOptions, Docker};
use crate::error::Result;

/// Working directory (and anonymous volume) inside the test container.
pub const WORKDIR: &str = "/devwork";

/// Everything needed to run the in-container dev tasks once.
#[derive(Debug, Clone)]
pub struct TestRun {
    pub image: String,
    pub package_dir: PathBuf,
    pub run_script: PathBuf,
    pub lint_target: String,
    pub skip_test: bool,
    pub skip_lint: bool,
    pub keep_container: bool,
}

impl TestRun {
    fn create_options(&self) -> CreateOptions {
        let mut options = CreateOptions::new(self.image.clone())
            .workdir_volume(WORKDIR)
            .env("PYLINT_FILES", self.lint_target.clone());
        if self.skip_test {
            options = options.env("PYTEST_SKIP", "1");
        }
        if self.skip_lint {
            options = options.env("PYLINT_SKIP", "1");
        }
        options.command(["sh".to_string(), format!("./{}", ContentLayout::RUN_DEV_TASKS)])
    }
}

/// Create the test container, copy the package and driver script in, and run it.
///
/// The container is removed afterwards whatever happened, unless `keep_container` is set.
/// A failure of the run itself is reported in preference to a failure to remove.
pub fn run_test_container(docker: &Docker<'_>, run: &TestRun) -> Result<()> {
    let id = docker.create(&run.create_options())?;

    let outcome = populate_and_start(docker, run, &id);

    if run.keep_container {
        info!("Test container [{}] was left available", id);
        return outcome;
    }

    let removed = docker.remove(&id);
    match (outcome, removed) {
        (Err(e), Err(cleanup)) => {
            warn!("Failed to remove test container {}: {}", id, cleanup);
            Err(e)
        }
        (Err(e), Ok(_)) => Err(e),
        (Ok(()), removed) => removed.map(|_| ()),
    }
}

fn populate_and_start(docker: &Docker<'_>, run: &TestRun, id: &str) -> Result<()> {
    let destination = format!("{}:{}", id, WORKDIR);
    docker.copy(&package_contents(&run.package_dir), &destination)?;
    docker.copy(&run.run_script.to_string_lossy(), &destination)?;
    docker.start_attached(id)
}

/// `docker cp` source that copies the directory's contents rather than the directory itself.
fn package_contents(package_dir: &Path) -> String {
    format!("{}/.", package_dir.display())
}
