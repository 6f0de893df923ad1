// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for cenv operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with cenv Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
///
/// Everything except [`ErrorKind::Internal`] is a domain error that the
/// command line reports as a one-line message with exit code 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Mismatch,
    ExternalTool,
    Postcondition,
    Parse,
    Internal,
}

/// Errors that can occur during cenv operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// No environment.yml found in directory tree
    #[error("environment.yml file not found in {0:?} or in any of its parent directories")]
    #[diagnostic(
        code(cenv::env_file_not_found),
        help("Run cenv from a project directory that contains an environment.yml")
    )]
    EnvFileNotFound(PathBuf),

    /// Executable not found on the search path
    #[error("{0} not found in path")]
    #[diagnostic(
        code(cenv::executable_not_found),
        help("Activate the conda environment described by environment.yml")
    )]
    ExecutableNotFound(String),

    /// Active environment name differs from the spec file
    #[error("Active environment is {active} but environment.yml points to {declared}")]
    #[diagnostic(
        code(cenv::name_mismatch),
        help("Run 'conda activate {}' first", declared)
    )]
    NameMismatch { active: String, declared: String },

    /// Active environment prefix differs from the spec file
    #[error("Active environment is located in {active:?} but environment.yml points to {declared:?}")]
    #[diagnostic(code(cenv::prefix_mismatch))]
    PrefixMismatch { active: PathBuf, declared: PathBuf },

    /// Executable resolved outside of the active prefix
    #[error("{executable:?} is not in conda prefix {prefix:?}")]
    #[diagnostic(
        code(cenv::outside_prefix),
        help("Another installation shadows the active environment on PATH")
    )]
    OutsidePrefix {
        executable: PathBuf,
        prefix: PathBuf,
    },

    /// External tool exited with a non-zero code
    #[error("Bad {tool} exitcode: {code}")]
    #[diagnostic(code(cenv::tool_failed))]
    ToolFailed { tool: String, code: i32 },

    /// Package missing after an install
    #[error("Package {name} was not installed (not found in {source_cmd})")]
    #[diagnostic(code(cenv::not_installed))]
    NotInstalled { name: String, source_cmd: String },

    /// Package still present after a removal
    #[error("Package {name} was not removed (found in {source_cmd})")]
    #[diagnostic(code(cenv::not_removed))]
    NotRemoved { name: String, source_cmd: String },

    /// Package spec could not be parsed
    #[error("Failed to parse package specification '{0}'")]
    #[diagnostic(
        code(cenv::invalid_package_spec),
        help("Use 'name', 'name=version' or '<git|hg|svn|bzr>+<url>'")
    )]
    InvalidPackageSpec(String),

    /// Spec file without a `name`
    #[error("{0:?} does not declare an environment name")]
    #[diagnostic(
        code(cenv::missing_name),
        help("Add a top-level 'name:' entry to environment.yml")
    )]
    MissingName(PathBuf),

    /// Invalid YAML in a spec file or tool output
    #[error("Invalid YAML in {origin}: {error}")]
    #[diagnostic(code(cenv::invalid_yaml))]
    InvalidYaml {
        origin: String,
        #[source]
        error: serde_yaml::Error,
    },

    /// Invalid JSON in tool output
    #[error("Invalid JSON from {origin}: {error}")]
    #[diagnostic(code(cenv::invalid_json))]
    InvalidJson {
        origin: String,
        #[source]
        error: serde_json::Error,
    },

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(cenv::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file
    #[error("Failed to write file: {path:?}")]
    #[diagnostic(code(cenv::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to start an external process
    #[error("Failed to run {program}")]
    #[diagnostic(code(cenv::spawn_failed))]
    SpawnFailed {
        program: String,
        #[source]
        error: std::io::Error,
    },

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(cenv::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EnvFileNotFound(_) | Self::ExecutableNotFound(_) => ErrorKind::NotFound,
            Self::NameMismatch { .. } | Self::PrefixMismatch { .. } | Self::OutsidePrefix { .. } => {
                ErrorKind::Mismatch
            }
            Self::ToolFailed { .. } => ErrorKind::ExternalTool,
            Self::NotInstalled { .. } | Self::NotRemoved { .. } => ErrorKind::Postcondition,
            Self::InvalidPackageSpec(_) => ErrorKind::Parse,
            Self::MissingName(_)
            | Self::InvalidYaml { .. }
            | Self::InvalidJson { .. }
            | Self::ReadFailed { .. }
            | Self::WriteFailed { .. }
            | Self::SpawnFailed { .. }
            | Self::Io(_) => ErrorKind::Internal,
        }
    }

    /// True for errors that describe a problem with the user's environment
    /// rather than a failure of cenv itself.
    pub fn is_domain(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}
