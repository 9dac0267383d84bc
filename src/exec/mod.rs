//! External process execution
//!
//! Every linter, container and helper invocation goes through a [`ToolRunner`], so the
//! pipeline can be driven against the real system or a scripted runner.

pub mod command;
pub mod runner;

pub use command::{StdioMode, ToolCommand};
pub use runner::{SystemRunner, ToolOutput, ToolRunner};
