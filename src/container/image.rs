//! Dev images: the base image with the dev dependencies installed
//!
//! Images are tagged by the MD5 of the dependency manifest, so an unchanged manifest reuses
//! the image built by an earlier run and any change produces a new tag.

use tracing::{debug, error, info};

use crate::config::ContentLayout;
use crate::container::docker::{CreateOptions, Docker};
use crate::error::Result;

/// Base image reference with an explicit tag, defaulting to `latest`.
pub fn normalize_image(image: &str) -> String {
    let name = image.rsplit('/').next().unwrap_or(image);
    if name.contains(':') || name.contains('@') {
        image.to_string()
    } else {
        format!("{}:latest", image)
    }
}

/// Tag of the dev image for `base_image` with `manifest` installed.
pub fn dev_image_tag(base_image: &str, manifest: &str) -> String {
    format!(
        "devtest{}-{:x}",
        normalize_image(base_image),
        md5::compute(manifest.as_bytes())
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevImage {
    pub tag: String,
    /// True when an existing image was found and nothing was built.
    pub reused: bool,
}

/// Return the dev image for `base_image`, building it if no image carries its tag yet.
pub fn ensure_dev_image(
    docker: &Docker<'_>,
    layout: &ContentLayout,
    base_image: &str,
    manifest: &str,
) -> Result<DevImage> {
    let base_image = normalize_image(base_image);
    let tag = dev_image_tag(&base_image, manifest);

    if docker.image_exists(&tag)? {
        info!("Using already existing docker image: {}", tag);
        return Ok(DevImage { tag, reused: true });
    }

    info!(
        "Creating docker image: {} (this may take a minute or two...)",
        tag
    );
    // The captured tool output travels with the error and is reported once by the caller.
    if let Err(e) = build_dev_image(docker, layout, &base_image, &tag, manifest) {
        error!("Failed creating docker image {}: {}", tag, e);
        return Err(e);
    }
    info!("Done creating docker image: {}", tag);

    Ok(DevImage { tag, reused: false })
}

fn build_dev_image(
    docker: &Docker<'_>,
    layout: &ContentLayout,
    base_image: &str,
    tag: &str,
    manifest: &str,
) -> Result<()> {
    let setup_in_container = format!("/{}", ContentLayout::CONTAINER_SETUP);
    let options = CreateOptions::new(base_image)
        .interactive()
        .command(["sh".to_string(), setup_in_container.clone()]);
    let id = docker.create(&options)?;

    docker.copy(
        &layout.container_setup_script().to_string_lossy(),
        &format!("{}:{}", id, setup_in_container),
    )?;

    let setup = docker.start_with_input(&id, manifest)?;
    debug!("{}", setup.combined());
    let commit = docker.commit(&id, tag)?;
    debug!("{}", commit.combined());
    let removed = docker.remove(&id)?;
    debug!("{}", removed.combined());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PkgDevError;
    use crate::exec::{ToolCommand, ToolOutput, ToolRunner};
    use std::cell::RefCell;

    /// No image exists yet and `docker start` fails with some setup output.
    struct FailingSetup {
        seen: RefCell<Vec<String>>,
    }

    impl ToolRunner for FailingSetup {
        fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
            let line = command.command_line();
            self.seen.borrow_mut().push(line.clone());
            match command.args.first().map(String::as_str) {
                Some("create") => Ok(ToolOutput::from_stdout("c0ffee\n")),
                Some("start") => Err(PkgDevError::ToolFailed {
                    command: line,
                    code: Some(1),
                    output: "ERROR: No matching distribution found for pytest==99".into(),
                }),
                _ => Ok(ToolOutput::default()),
            }
        }
    }

    #[test]
    fn test_normalize_image() {
        assert_eq!(normalize_image("alpine"), "alpine:latest");
        assert_eq!(normalize_image("demisto/python"), "demisto/python:latest");
        assert_eq!(
            normalize_image("demisto/python:1.3-alpine"),
            "demisto/python:1.3-alpine"
        );
        assert_eq!(
            normalize_image("registry:5000/demisto/python"),
            "registry:5000/demisto/python:latest"
        );
    }

    #[test]
    fn test_tag_is_content_addressed() {
        let manifest = "pytest==4.6.3\npylint==1.9.4\n";
        let a = dev_image_tag("demisto/python:1.3-alpine", manifest);
        let b = dev_image_tag("demisto/python:1.3-alpine", &manifest.to_string());
        assert_eq!(a, b);
        assert_eq!(
            a,
            format!(
                "devtestdemisto/python:1.3-alpine-{:x}",
                md5::compute(manifest)
            )
        );

        let c = dev_image_tag("demisto/python:1.3-alpine", "pytest==5.0\n");
        assert_ne!(a, c);
    }

    #[test]
    fn test_tag_for_untagged_base() {
        let tag = dev_image_tag("alpine", "");
        assert_eq!(tag, "devtestalpine:latest-d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_build_failure_keeps_output_on_the_error() {
        let runner = FailingSetup {
            seen: RefCell::new(Vec::new()),
        };
        let docker = Docker::new(&runner);
        let layout = ContentLayout::new("/content");

        let err = ensure_dev_image(&docker, &layout, "demisto/python3:3.7", "pytest==99\n")
            .unwrap_err();
        match err {
            PkgDevError::ToolFailed { ref output, .. } => {
                assert!(output.contains("No matching distribution"));
            }
            ref other => panic!("expected ToolFailed, got {:?}", other),
        }
        assert_eq!(err.exit_code(), 2);

        let seen = runner.seen.borrow();
        assert!(!seen.iter().any(|l| l.starts_with("docker commit")));
    }
}
