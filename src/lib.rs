//! pkgdev - lint and test a script/integration package inside its docker image
//!
//! Reads the package descriptor, probes the python version of the declared image, sets up the
//! dev files next to the code, runs flake8 and mypy on the host and finally pylint and pytest
//! in a container built from the image plus the dev dependencies.
//!
//! # Example
//!
//! ```no_run
//! use pkgdev::{ContentLayout, Outcome, PackageRunner, RunConfig, SystemRunner};
//!
//! let config = RunConfig::new("/content/Scripts/Foo", ContentLayout::new("/content"));
//! let runner = SystemRunner::new();
//! match PackageRunner::new(config, &runner).run() {
//!     Ok(Outcome::Completed(report)) => println!("ran {} phases", report.phases_run.len()),
//!     Ok(Outcome::NotApplicable { script_type }) => println!("skipped {}", script_type),
//!     Err(e) => eprintln!("failed: {}", e),
//! }
//! ```

pub mod cli;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod devenv;
pub mod error;
pub mod exec;
pub mod lint;
pub mod logging;
pub mod pipeline;
pub mod version;

pub use config::{ContentLayout, Phases, RunConfig};
pub use descriptor::{load_descriptor, Descriptor};
pub use error::{PkgDevError, Result};
pub use exec::{SystemRunner, ToolCommand, ToolOutput, ToolRunner};
pub use pipeline::{Outcome, PackageRunner, Phase, RunReport};
pub use version::PythonVersion;
