//! Container phase: dev image resolution and the test container
//!
//! pylint and pytest run inside the package's own docker image, extended with the dev
//! dependencies for its python major version.

pub mod docker;
pub mod image;
pub mod requirements;
pub mod session;

pub use docker::{CreateOptions, Docker};
pub use image::{dev_image_tag, ensure_dev_image, normalize_image, DevImage};
pub use requirements::resolve_dev_requirements;
pub use session::{run_test_container, TestRun, WORKDIR};
