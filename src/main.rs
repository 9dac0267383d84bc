//! pkgdev CLI - lint and test a script/integration package

use std::io::Write;

use pkgdev::cli::Args;
use pkgdev::logging::{init_logging, LoggingConfig};
use pkgdev::{Outcome, PackageRunner, RunConfig, SystemRunner};
use tracing::{debug, error};

fn main() {
    let args = Args::parse_validated();
    init_logging(LoggingConfig::from_cli(
        args.log_level.as_deref(),
        args.verbose,
    ));
    debug!("Arguments: {:?}", args);

    let code = run(&args);
    let _ = std::io::stdout().flush();
    let _ = std::io::stderr().flush();
    std::process::exit(code);
}

fn run(args: &Args) -> i32 {
    let config = match RunConfig::from_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return e.exit_code();
        }
    };
    let package_dir = config.package_dir.clone();

    let runner = SystemRunner::new().verbose(config.verbose);
    match PackageRunner::new(config, &runner).run() {
        Ok(Outcome::Completed(report)) => {
            let phases: Vec<String> = report.phases_run.iter().map(|p| p.to_string()).collect();
            debug!("Completed: {}", phases.join(", "));
            0
        }
        Ok(outcome @ Outcome::NotApplicable { .. }) => outcome.exit_code(),
        Err(e) if e.is_tool_failure() => {
            if let pkgdev::PkgDevError::ToolFailed { ref output, .. } = e {
                if !output.is_empty() {
                    error!("{}", output.trim_end());
                }
            }
            eprintln!("[FAILED {}] Error: {}", package_dir.display(), e);
            e.exit_code()
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}
