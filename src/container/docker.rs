//! Thin wrapper over the docker CLI

use tracing::debug;

use crate::error::Result;
use crate::exec::{ToolCommand, ToolOutput, ToolRunner};

/// Options for `docker create`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    pub image: String,
    pub command: Vec<String>,
    /// Keep stdin open (`-i`).
    pub interactive: bool,
    /// Anonymous volume, also used as the working directory.
    pub workdir_volume: Option<String>,
    pub env: Vec<(String, String)>,
}

impl CreateOptions {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }

    pub fn command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    pub fn workdir_volume(mut self, path: impl Into<String>) -> Self {
        self.workdir_volume = Some(path.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn to_args(&self) -> Vec<String> {
        let mut args = vec!["create".to_string()];
        if self.interactive {
            args.push("-i".to_string());
        }
        if let Some(ref dir) = self.workdir_volume {
            args.extend(["-v".to_string(), dir.clone(), "-w".to_string(), dir.clone()]);
        }
        for (key, value) in &self.env {
            args.push("-e".to_string());
            args.push(format!("{}={}", key, value));
        }
        args.push(self.image.clone());
        args.extend(self.command.iter().cloned());
        args
    }
}

pub struct Docker<'a> {
    runner: &'a dyn ToolRunner,
}

impl<'a> Docker<'a> {
    pub fn new(runner: &'a dyn ToolRunner) -> Self {
        Self { runner }
    }

    fn docker(&self) -> ToolCommand {
        ToolCommand::new("docker")
    }

    /// Whether an image with exactly this `repository:tag` exists locally.
    pub fn image_exists(&self, tag: &str) -> Result<bool> {
        let command = self
            .docker()
            .args(["image", "ls", "--format", "{{.Repository}}:{{.Tag}}", tag])
            .capture();
        let output = self.runner.run(&command)?;
        Ok(output.stdout.trim() == tag)
    }

    /// Create a container and return its id.
    pub fn create(&self, options: &CreateOptions) -> Result<String> {
        let command = self.docker().args(options.to_args()).capture();
        let id = self.runner.run(&command)?.stdout.trim().to_string();
        debug!("Created container {} from {}", id, options.image);
        Ok(id)
    }

    pub fn copy(&self, source: &str, destination: &str) -> Result<()> {
        let command = self.docker().args(["cp", source, destination]);
        self.runner.run(&command)?;
        Ok(())
    }

    /// Start attached, streaming output to the terminal.
    pub fn start_attached(&self, id: &str) -> Result<()> {
        let command = self.docker().args(["start", "-a", id]);
        self.runner.run(&command)?;
        Ok(())
    }

    /// Start attached with `input` on the container's stdin, collecting its output.
    pub fn start_with_input(&self, id: &str, input: &str) -> Result<ToolOutput> {
        let command = self
            .docker()
            .args(["start", "-a", "-i", id])
            .stdin(input)
            .capture();
        self.runner.run(&command)
    }

    pub fn commit(&self, id: &str, tag: &str) -> Result<ToolOutput> {
        let command = self.docker().args(["commit", id, tag]).capture();
        self.runner.run(&command)
    }

    pub fn remove(&self, id: &str) -> Result<ToolOutput> {
        let command = self.docker().args(["rm", id]).capture();
        self.runner.run(&command)
    }
}
