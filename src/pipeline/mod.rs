//! Package run pipeline
//!
//! Steps run strictly in order and the first failure ends the run:
//! descriptor, version probe, dev files, flake8, mypy, container (pylint + pytest).

use std::fmt;

use tracing::debug;

use crate::config::RunConfig;
use crate::container::{self, DevImage, Docker, TestRun};
use crate::descriptor::load_descriptor;
use crate::devenv::setup_dev_files;
use crate::error::{Result, EXIT_NOT_APPLICABLE};
use crate::exec::ToolRunner;
use crate::lint::{lint_target, run_flake8, run_mypy};
use crate::version::{probe_python_version, PythonVersion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Flake8,
    Mypy,
    Container,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Flake8 => write!(f, "flake8"),
            Phase::Mypy => write!(f, "mypy"),
            Phase::Container => write!(f, "pylint/pytest container"),
        }
    }
}

/// What a completed run did.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub docker_image: String,
    pub version: PythonVersion,
    pub phases_run: Vec<Phase>,
    pub dev_image: Option<DevImage>,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(RunReport),
    /// The descriptor is not a python script; nothing was touched.
    NotApplicable { script_type: String },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed(_) => 0,
            Outcome::NotApplicable { .. } => EXIT_NOT_APPLICABLE,
        }
    }
}

/// Runs the checks for one package directory.
pub struct PackageRunner<'a> {
    config: RunConfig,
    runner: &'a dyn ToolRunner,
}

impl<'a> PackageRunner<'a> {
    pub fn new(config: RunConfig, runner: &'a dyn ToolRunner) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run(&self) -> Result<Outcome> {
        let package_dir = &self.config.package_dir;
        let layout = &self.config.layout;
        let phases = self.config.phases;

        let descriptor = load_descriptor(package_dir)?;
        if !descriptor.is_python() {
            println!(
                "Script is not of type \"python\". Found type: {}. Nothing to do.",
                descriptor.type_label()
            );
            return Ok(Outcome::NotApplicable {
                script_type: descriptor.type_label().to_string(),
            });
        }
        debug!("Using docker image: {}", descriptor.docker_image);

        let version = probe_python_version(self.runner, &descriptor.docker_image)?;
        setup_dev_files(self.runner, layout, package_dir)?;

        let mut report = RunReport {
            docker_image: descriptor.docker_image.clone(),
            version,
            phases_run: Vec::new(),
            dev_image: None,
        };

        if phases.flake8 {
            run_flake8(self.runner, layout, package_dir, version)?;
            report.phases_run.push(Phase::Flake8);
        }

        if !phases.mypy && !phases.needs_container() {
            return Ok(Outcome::Completed(report));
        }
        let target = lint_target(package_dir)?;

        if phases.mypy {
            run_mypy(self.runner, layout, package_dir, version, &target)?;
            report.phases_run.push(Phase::Mypy);
        }

        if phases.needs_container() {
            let manifest = container::resolve_dev_requirements(self.runner, layout, version)?;
            let docker = Docker::new(self.runner);
            let dev_image =
                container::ensure_dev_image(&docker, layout, &descriptor.docker_image, &manifest)?;

            let run = TestRun {
                image: dev_image.tag.clone(),
                package_dir: package_dir.clone(),
                run_script: layout.run_dev_tasks_script(),
                lint_target: target,
                skip_test: !phases.test,
                skip_lint: !phases.pylint,
                keep_container: self.config.keep_container,
            };
            container::run_test_container(&docker, &run)?;

            report.dev_image = Some(dev_image);
            report.phases_run.push(Phase::Container);
        }

        Ok(Outcome::Completed(report))
    }
}
