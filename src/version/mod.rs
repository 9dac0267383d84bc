//! Python version probing
//!
//! The declared image is run once to report its interpreter version. pylint and mypy need
//! python 3.4 or newer, while legacy packages still target 2.7, so versions below 2.7 and the
//! gap above 3.0 and below 3.4 are rejected before anything touches the package directory.
//! 3.0 itself sits on the gap's open lower bound and is accepted.
//!
//! The minor number is compared as an integer, so 3.10 and later count as newer than 3.9.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::error::{PkgDevError, Result};
use crate::exec::{ToolCommand, ToolRunner};

/// Prints `{major}.{minor}` of the interpreter it runs under.
pub const VERSION_PROBE: &str =
    "import sys;print('{}.{}'.format(sys.version_info[0], sys.version_info[1]))";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    pub const MINIMUM: PythonVersion = PythonVersion::new(2, 7);
    pub const MINIMUM_PY3: PythonVersion = PythonVersion::new(3, 4);

    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    pub fn is_supported(&self) -> bool {
        if *self < Self::MINIMUM {
            return false;
        }
        let in_py3_gap = *self > PythonVersion::new(3, 0) && *self < Self::MINIMUM_PY3;
        !in_py3_gap
    }

    /// Interpreter name used to run host-side tools for this version.
    pub fn host_python(&self) -> &'static str {
        if self.major < 3 {
            "python2"
        } else {
            "python3"
        }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = PkgDevError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let parse_err = || PkgDevError::VersionParseError(trimmed.to_string());

        let (major, minor) = trimmed.split_once('.').ok_or_else(parse_err)?;
        let major = major.parse::<u32>().map_err(|_| parse_err())?;
        let minor = minor.parse::<u32>().map_err(|_| parse_err())?;
        Ok(Self::new(major, minor))
    }
}

/// Parse probe output and reject unsupported versions.
pub fn validate_version(docker_image: &str, reported: &str) -> Result<PythonVersion> {
    let version: PythonVersion = reported.parse()?;
    if !version.is_supported() {
        return Err(PkgDevError::UnsupportedVersion {
            image: docker_image.to_string(),
            version: version.to_string(),
        });
    }
    Ok(version)
}

/// Ask `docker_image` for its python version.
pub fn probe_python_version(runner: &dyn ToolRunner, docker_image: &str) -> Result<PythonVersion> {
    let command = ToolCommand::new("docker")
        .args(["run", "--rm", docker_image, "python", "-c", VERSION_PROBE])
        .capture();
    let output = runner.run(&command)?;
    if !output.stderr.trim().is_empty() {
        debug!("{}", output.stderr.trim_end());
    }

    let reported = output.stdout.trim();
    info!(
        "Detected python version: [{}] for docker image: {}",
        reported, docker_image
    );
    validate_version(docker_image, reported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ToolOutput;
    use std::cell::RefCell;

    struct ProbeRunner {
        stdout: &'static str,
        seen: RefCell<Vec<ToolCommand>>,
    }

    impl ToolRunner for ProbeRunner {
        fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
            self.seen.borrow_mut().push(command.clone());
            Ok(ToolOutput::from_stdout(self.stdout))
        }
    }

    #[test]
    fn test_rejected_versions() {
        for v in ["2.6", "3.1", "3.3", "1.5"] {
            let err = validate_version("img", v).unwrap_err();
            assert!(
                matches!(err, PkgDevError::UnsupportedVersion { .. }),
                "{} should be rejected",
                v
            );
        }
    }

    #[test]
    fn test_accepted_versions() {
        for v in ["2.7", "3.0", "3.4", "3.9", "3.10", "3.12"] {
            let version = validate_version("img", v).unwrap();
            assert_eq!(version.to_string(), v);
        }
    }

    #[test]
    fn test_three_zero_is_outside_the_py3_gap() {
        let version = validate_version("demisto/python3:3.0", "3.0").unwrap();
        assert_eq!(version, PythonVersion::new(3, 0));
        assert!(version.is_supported());
        assert!(!PythonVersion::new(3, 1).is_supported());
    }

    #[test]
    fn test_parse_errors() {
        for v in ["", "3", "three.seven", "3.x", "Python 3.7"] {
            let err = validate_version("img", v).unwrap_err();
            assert!(matches!(err, PkgDevError::VersionParseError(_)), "{:?}", v);
        }
    }

    #[test]
    fn test_minor_is_not_a_decimal_fraction() {
        let version: PythonVersion = "3.10".parse().unwrap();
        assert_eq!(version, PythonVersion::new(3, 10));
        assert!(version > PythonVersion::new(3, 9));
    }

    #[test]
    fn test_host_python() {
        assert_eq!(PythonVersion::new(2, 7).host_python(), "python2");
        assert_eq!(PythonVersion::new(3, 7).host_python(), "python3");
    }

    #[test]
    fn test_probe_runs_image() {
        let runner = ProbeRunner {
            stdout: "3.7\n",
            seen: RefCell::new(Vec::new()),
        };
        let version = probe_python_version(&runner, "demisto/python3:3.7.3").unwrap();
        assert_eq!(version, PythonVersion::new(3, 7));

        let seen = runner.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].args[..5],
            ["run", "--rm", "demisto/python3:3.7.3", "python", "-c"]
        );
    }

    #[test]
    fn test_probe_rejects_old_image() {
        let runner = ProbeRunner {
            stdout: "2.6\n",
            seen: RefCell::new(Vec::new()),
        };
        let err = probe_python_version(&runner, "old:1").unwrap_err();
        assert!(err.to_string().contains("old:1"));
    }
}
