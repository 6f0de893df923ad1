// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Running external tools and finding them on the search path.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::{Command, Stdio};

#[cfg(test)]
#[path = "./process_test.rs"]
mod process_test;

/// Exit code and standard output of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub code: i32,
    pub stdout: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external commands to completion.
///
/// `argv[0]` is the program, the rest are its arguments.
pub trait CommandRunner {
    /// Run with inherited stdio and return the exit code.
    fn run(&self, argv: &[String]) -> crate::Result<i32>;

    /// Run with stdout captured.
    fn capture(&self, argv: &[String]) -> crate::Result<Captured>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, argv: &[String]) -> crate::Result<i32> {
        (**self).run(argv)
    }

    fn capture(&self, argv: &[String]) -> crate::Result<Captured> {
        (**self).capture(argv)
    }
}

/// [`CommandRunner`] that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(argv: &[String]) -> crate::Result<Command> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            crate::Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "empty command line",
            ))
        })?;
        let mut cmd = Command::new(program);
        cmd.args(args);
        Ok(cmd)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String]) -> crate::Result<i32> {
        tracing::debug!("spawn: {}", command_line(argv));
        let status = Self::command(argv)?
            .status()
            .map_err(|e| spawn_failed(argv, e))?;
        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }

    fn capture(&self, argv: &[String]) -> crate::Result<Captured> {
        tracing::debug!("capture: {}", command_line(argv));
        let output = Self::command(argv)?
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| spawn_failed(argv, e))?;
        Ok(Captured {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

fn spawn_failed(argv: &[String], error: std::io::Error) -> crate::Error {
    crate::Error::SpawnFailed {
        program: argv.first().cloned().unwrap_or_default(),
        error,
    }
}

/// Render a command line for display, quoting arguments that contain spaces.
pub fn command_line(argv: &[String]) -> String {
    argv.iter()
        .map(|arg| {
            if arg.contains(' ') {
                format!("\"{arg}\"")
            } else {
                arg.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find an executable by name.
///
/// Searches `search_path` when given (same format as `PATH`), otherwise the
/// process `PATH`.
pub fn find_executable(name: &str, search_path: Option<&OsStr>) -> crate::Result<PathBuf> {
    let found = match search_path {
        Some(paths) => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            which::which_in(name, Some(paths), cwd)
        }
        None => which::which(name),
    };
    found.map_err(|err| {
        tracing::debug!("{name} lookup failed: {err}");
        crate::Error::ExecutableNotFound(name.to_string())
    })
}
