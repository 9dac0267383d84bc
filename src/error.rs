//! Error types for pkgdev

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for a descriptor that is not a python script, and for fatal configuration errors.
pub const EXIT_NOT_APPLICABLE: i32 = 1;

/// Exit code for any failed external tool invocation.
pub const EXIT_TOOL_FAILED: i32 = 2;

#[derive(Error, Debug)]
pub enum PkgDevError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Descriptor error: {0}")]
    DescriptorError(String),

    #[error("Failed to parse {path}: {source}")]
    YamlError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Could not parse python version from output: {0:?}")]
    VersionParseError(String),

    #[error(
        "Python version for docker image: {image} is not supported: {version}. \
         We only support python 2.7.* and python3 >= 3.4."
    )]
    UnsupportedVersion { image: String, version: String },

    #[error("Failed to execute {program}: {source}")]
    SpawnError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' returned non-zero exit status {}", exit_status(.code))]
    ToolFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

fn exit_status(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "(terminated by signal)".to_string())
}

impl PkgDevError {
    /// Whether this error came from an external process rather than from the run's own setup.
    pub fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            PkgDevError::ToolFailed { .. } | PkgDevError::SpawnError { .. }
        )
    }

    /// Process exit code to report for this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_tool_failure() {
            EXIT_TOOL_FAILED
        } else {
            EXIT_NOT_APPLICABLE
        }
    }
}

pub type Result<T> = std::result::Result<T, PkgDevError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_failures_exit_with_two() {
        let err = PkgDevError::ToolFailed {
            command: "python3 -m flake8 /pkg".to_string(),
            code: Some(1),
            output: String::new(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Command 'python3 -m flake8 /pkg' returned non-zero exit status 1"
        );

        let err = PkgDevError::SpawnError {
            program: "docker".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_configuration_errors_exit_with_one() {
        let err = PkgDevError::UnsupportedVersion {
            image: "demisto/python:2.6".to_string(),
            version: "2.6".to_string(),
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("python3 >= 3.4"));
        assert_eq!(PkgDevError::ConfigError("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_signal_termination_message() {
        let err = PkgDevError::ToolFailed {
            command: "docker start -a abc".to_string(),
            code: None,
            output: String::new(),
        };
        assert!(err.to_string().ends_with("(terminated by signal)"));
    }
}
