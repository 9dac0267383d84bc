//! Dev dependency manifest resolution

use tracing::debug;

use crate::config::ContentLayout;
use crate::error::Result;
use crate::exec::{ToolCommand, ToolRunner};
use crate::version::PythonVersion;

/// Lock the dev environment for `version`'s major release and return the requirements text.
pub fn resolve_dev_requirements(
    runner: &dyn ToolRunner,
    layout: &ContentLayout,
    version: PythonVersion,
) -> Result<String> {
    let env_dir = layout.dev_env_dir(version.major);
    let command = ToolCommand::new("pipenv")
        .args(["lock", "-r", "-d"])
        .current_dir(&env_dir)
        .capture();
    let output = runner.run(&command)?;
    if !output.stderr.trim().is_empty() {
        debug!("{}", output.stderr.trim_end());
    }

    debug!("dev requirements:\n{}", output.stdout);
    Ok(output.stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ToolOutput;
    use std::cell::RefCell;
    use std::path::Path;

    struct LockRunner {
        seen: RefCell<Vec<ToolCommand>>,
    }

    impl ToolRunner for LockRunner {
        fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
            self.seen.borrow_mut().push(command.clone());
            Ok(ToolOutput {
                stdout: "pytest==4.6.3\n".to_string(),
                stderr: "Locking...\n".to_string(),
            })
        }
    }

    #[test]
    fn test_uses_major_version_env() {
        let runner = LockRunner {
            seen: RefCell::new(Vec::new()),
        };
        let layout = ContentLayout::new("/content");
        let manifest =
            resolve_dev_requirements(&runner, &layout, PythonVersion::new(3, 7)).unwrap();
        assert_eq!(manifest, "pytest==4.6.3\n");

        let seen = runner.seen.borrow();
        assert_eq!(seen[0].command_line(), "pipenv lock -r -d");
        assert_eq!(
            seen[0].cwd.as_deref(),
            Some(Path::new(
                "/content/Tests/scripts/dev_envs/default_python3"
            ))
        );
    }
}
