//! CLI argument parsing

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "pkgdev")]
#[command(
    author,
    version,
    about = "Run lintings (flake8, mypy, pylint) and pytest for an integration/script package",
    long_about = "Run lintings (flake8, mypy, pylint) and pytest. pylint and pytest run within the \
                  docker image of the integration/script.\n\n\
                  Meant for integrations/scripts that use the folder (package) structure. Looks up \
                  the docker image to use and sets up the dev dependencies and files in the target \
                  folder."
)]
pub struct Args {
    /// Directory of the integration/script
    #[arg(short, long, value_name = "DIR")]
    pub dir: PathBuf,

    /// Do NOT run pylint linter
    #[arg(long)]
    pub no_pylint: bool,

    /// Do NOT run mypy static type checking
    #[arg(long)]
    pub no_mypy: bool,

    /// Do NOT run flake8 linter
    #[arg(long)]
    pub no_flake8: bool,

    /// Do NOT test (skip pytest)
    #[arg(long)]
    pub no_test: bool,

    /// Keep the test container
    #[arg(short, long)]
    pub keep_container: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Repository root holding Tests/demistomock and package_extractor.py
    #[arg(long, env = "PKGDEV_CONTENT_DIR", value_name = "PATH")]
    pub content_dir: Option<PathBuf>,

    /// Directory with the dev task scripts and dev_envs (default: <content-dir>/Tests/scripts)
    #[arg(long, env = "PKGDEV_SCRIPTS_DIR", value_name = "PATH")]
    pub scripts_dir: Option<PathBuf>,

    /// Set logging level (overrides --verbose)
    #[arg(long, env = "PKGDEV_LOG_LEVEL", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Parse process arguments, exiting with a usage error on invalid combinations.
    pub fn parse_validated() -> Self {
        let args = Self::parse();
        if let Err(e) = args.validate() {
            e.exit();
        }
        args
    }

    /// Parse from an explicit argument list, including the combination checks.
    pub fn try_parse_validated<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let args = Self::try_parse_from(itr)?;
        args.validate()?;
        Ok(args)
    }

    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.no_test && self.no_pylint && self.no_flake8 && self.no_mypy {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "Nothing to run as all --no-* options specified.",
            ));
        }
        Ok(())
    }
}
