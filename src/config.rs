//! Run configuration resolved from the command line

use std::path::{Path, PathBuf};

use crate::cli::Args;
use crate::error::Result;

/// Which checks are enabled for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phases {
    pub flake8: bool,
    pub mypy: bool,
    pub pylint: bool,
    pub test: bool,
}

impl Default for Phases {
    fn default() -> Self {
        Self {
            flake8: true,
            mypy: true,
            pylint: true,
            test: true,
        }
    }
}

impl Phases {
    /// pylint and pytest both run inside the dev container.
    pub fn needs_container(&self) -> bool {
        self.pylint || self.test
    }
}

/// Locations of the shared files the run copies from or executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLayout {
    /// Repository root: holds `Tests/demistomock` and `package_extractor.py`.
    pub content_dir: PathBuf,
    /// Holds the dev task shell scripts and the `dev_envs` directories.
    pub scripts_dir: PathBuf,
}

impl ContentLayout {
    pub const RUN_DEV_TASKS: &'static str = "run_dev_tasks.sh";
    pub const CONTAINER_SETUP: &'static str = "pkg_dev_container_setup.sh";
    pub const RUN_MYPY: &'static str = "run_mypy.sh";

    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        let content_dir = content_dir.into();
        let scripts_dir = content_dir.join("Tests").join("scripts");
        Self {
            content_dir,
            scripts_dir,
        }
    }

    pub fn with_scripts_dir(mut self, scripts_dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = scripts_dir.into();
        self
    }

    pub fn demistomock(&self) -> PathBuf {
        self.content_dir
            .join("Tests")
            .join("demistomock")
            .join("demistomock.py")
    }

    pub fn package_extractor(&self) -> PathBuf {
        self.content_dir.join("package_extractor.py")
    }

    pub fn run_dev_tasks_script(&self) -> PathBuf {
        self.scripts_dir.join(Self::RUN_DEV_TASKS)
    }

    pub fn container_setup_script(&self) -> PathBuf {
        self.scripts_dir.join(Self::CONTAINER_SETUP)
    }

    pub fn run_mypy_script(&self) -> PathBuf {
        self.scripts_dir.join(Self::RUN_MYPY)
    }

    /// Pipenv project holding the dev dependencies for a python major version.
    pub fn dev_env_dir(&self, major: u32) -> PathBuf {
        self.scripts_dir
            .join("dev_envs")
            .join(format!("default_python{}", major))
    }
}

/// Immutable configuration for a single package run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub package_dir: PathBuf,
    pub phases: Phases,
    pub keep_container: bool,
    /// Show the stderr of captured tool invocations as it happens.
    pub verbose: bool,
    pub layout: ContentLayout,
}

impl RunConfig {
    pub fn new(package_dir: impl Into<PathBuf>, layout: ContentLayout) -> Self {
        Self {
            package_dir: package_dir.into(),
            phases: Phases::default(),
            keep_container: false,
            verbose: false,
            layout,
        }
    }

    /// Resolve paths from parsed arguments. Relative paths are made absolute against the
    /// current directory.
    pub fn from_args(args: &Args) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let content_dir = args
            .content_dir
            .as_deref()
            .map(|p| absolutize(&cwd, p))
            .unwrap_or_else(|| cwd.clone());

        let mut layout = ContentLayout::new(content_dir);
        if let Some(ref scripts_dir) = args.scripts_dir {
            layout = layout.with_scripts_dir(absolutize(&cwd, scripts_dir));
        }

        Ok(Self {
            package_dir: absolutize(&cwd, &args.dir),
            phases: Phases {
                flake8: !args.no_flake8,
                mypy: !args.no_mypy,
                pylint: !args.no_pylint,
                test: !args.no_test,
            },
            keep_container: args.keep_container,
            verbose: args.verbose,
            layout,
        })
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
