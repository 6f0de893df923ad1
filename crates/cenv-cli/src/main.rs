// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! cenv - conda environment.yml editor CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::Result;

mod cmd_check;
mod cmd_install;
mod cmd_pip_install;
mod cmd_pip_remove;
mod cmd_remove;

use cmd_check::CmdCheck;
use cmd_install::CmdInstall;
use cmd_pip_install::CmdPipInstall;
use cmd_pip_remove::CmdPipRemove;
use cmd_remove::CmdRemove;


#[derive(Parser)]
#[clap(
    name = "cenv",
    about = "Keep environment.yml in sync with the active conda environment",
    version,
    long_about = "Install and remove packages in the active conda environment \
                  and record every change in the project's environment.yml"
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Print debug logs and full diagnostics for errors
    #[clap(long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

/// Flags shared by every command that opens environment.yml.
#[derive(Parser, Clone, Debug)]
pub struct EnvFlags {
    /// Start the search for environment.yml from PATH
    #[clap(short, long, default_value = ".")]
    pub file: PathBuf,

    /// conda executable to run
    #[clap(long, env = "CENV_CONDA", default_value = cenv::conda::default_conda())]
    pub conda: String,

    /// python executable of the active environment
    #[clap(long, env = "CENV_PYTHON", default_value = "python")]
    pub python: String,
}

impl EnvFlags {
    pub fn session_options(&self) -> cenv::SessionOptions {
        cenv::SessionOptions {
            start_dir: self.file.clone(),
            conda: self.conda.clone(),
            python: self.python.clone(),
            search_path: None,
        }
    }

    /// Open a session against the real conda and pip.
    pub fn open(&self) -> cenv::Result<cenv::Session<cenv::SystemRunner>> {
        cenv::Session::open(&self.session_options(), cenv::SystemRunner)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Install conda package
    Install(CmdInstall),

    /// Remove conda package
    Remove(CmdRemove),

    /// Install package with pip
    PipInstall(CmdPipInstall),

    /// Remove package with pip
    PipRemove(CmdPipRemove),

    /// Verify environment.yml matches the active environment
    Check(CmdCheck),
}

/// Turn the result of a command into an exit code.
///
/// Errors about the user's environment are reported here and exit with 1;
/// anything else is handed back to `main`.
pub fn report(result: cenv::Result<()>, verbose: bool) -> Result<i32> {
    match result {
        Ok(()) => Ok(0),
        Err(err) if err.is_domain() => {
            let message = err.to_string();
            if verbose {
                eprintln!("\n{:?}\n", miette::Report::new(err));
            }
            eprintln!("{} {message}", "error:".red().bold());
            Ok(1)
        }
        Err(err) => Err(err.into()),
    }
}

/// Print what a mutation did.
pub fn print_outcome(outcome: &cenv::Outcome, env_name: &str) {
    match outcome {
        cenv::Outcome::Unchanged => {}
        cenv::Outcome::Installed { name, .. } => {
            println!("{} {name} installed into {env_name}", "✓".green());
        }
        cenv::Outcome::Removed { name } => {
            println!("{} {name} removed from {env_name}", "✓".green());
        }
    }
}

impl Opt {
    fn run(self) -> Result<i32> {
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, false) => tracing::Level::INFO,
            (false, true) => tracing::Level::DEBUG,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .init();

        let verbose = self.logging.verbose;
        match self.cmd {
            Command::Install(cmd) => cmd.run(verbose),
            Command::Remove(cmd) => cmd.run(verbose),
            Command::PipInstall(cmd) => cmd.run(verbose),
            Command::PipRemove(cmd) => cmd.run(verbose),
            Command::Check(cmd) => cmd.run(verbose),
        }
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
