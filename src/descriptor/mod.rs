//! Package descriptor loading
//!
//! A package directory carries one `*.yml` descriptor. Script descriptors declare `type` and
//! `dockerimage` at the top level; integration descriptors nest them under a `script` mapping.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::error::{PkgDevError, Result};

/// Image used when the descriptor does not declare one.
pub const DEFAULT_DOCKER_IMAGE: &str = "demisto/python:1.3-alpine";

/// The only script type this tool knows how to lint and test.
pub const PYTHON_TYPE: &str = "python";

#[derive(Debug, Default, Deserialize)]
struct ScriptSection {
    #[serde(rename = "type")]
    script_type: Option<String>,
    dockerimage: Option<String>,
}

/// Runtime information extracted from a package descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub path: PathBuf,
    pub script_type: Option<String>,
    pub docker_image: String,
}

impl Descriptor {
    pub fn is_python(&self) -> bool {
        self.script_type.as_deref() == Some(PYTHON_TYPE)
    }

    /// Declared type for messages; `None` renders as such.
    pub fn type_label(&self) -> &str {
        self.script_type.as_deref().unwrap_or("None")
    }

    /// Parse descriptor text. `path` is only recorded for diagnostics.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let document: Value =
            serde_yaml::from_str(content).map_err(|source| PkgDevError::YamlError {
                path: path.clone(),
                source,
            })?;

        if !document.is_mapping() {
            return Err(PkgDevError::DescriptorError(format!(
                "{} is not a YAML mapping",
                path.display()
            )));
        }

        let nested = document
            .get("script")
            .filter(|value| value.is_mapping())
            .cloned();
        let section_value = nested.unwrap_or(document);
        let section: ScriptSection =
            serde_yaml::from_value(section_value).map_err(|source| PkgDevError::YamlError {
                path: path.clone(),
                source,
            })?;

        let docker_image = section
            .dockerimage
            .filter(|image| !image.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOCKER_IMAGE.to_string());

        Ok(Self {
            path,
            script_type: section.script_type,
            docker_image,
        })
    }
}

/// Find the descriptor file of a package: the first `*.yml` entry by name.
pub fn find_descriptor(package_dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(package_dir).map_err(|e| {
        PkgDevError::DescriptorError(format!(
            "Cannot read package directory {}: {}",
            package_dir.display(),
            e
        ))
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "yml") {
            candidates.push(path);
        }
    }
    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        PkgDevError::DescriptorError(format!(
            "No .yml descriptor found in {}",
            package_dir.display()
        ))
    })
}

/// Locate and parse the descriptor of `package_dir`.
pub fn load_descriptor(package_dir: &Path) -> Result<Descriptor> {
    let path = find_descriptor(package_dir)?;
    debug!("Using yaml file: {}", path.display());
    let content = fs::read_to_string(&path)?;
    Descriptor::parse(path, &content)
}
