// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Command lines for conda and pip, and parsers for what they print.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::package::parse_name;
use crate::spec::Dependency;

#[cfg(test)]
#[path = "./conda_test.rs"]
mod conda_test;

/// Name of the conda executable on this platform.
pub fn default_conda() -> &'static str {
    if cfg!(windows) { "conda.bat" } else { "conda" }
}

/// The part of `conda info --json` that describes the active environment.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct CondaInfo {
    /// Name of the active environment, `None` when nothing is active.
    #[serde(default)]
    pub active_prefix_name: Option<String>,

    /// Install location of the active environment.
    #[serde(default)]
    pub active_prefix: Option<PathBuf>,
}

impl CondaInfo {
    /// Parse the output of `conda info --json`.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json).map_err(|error| crate::Error::InvalidJson {
            origin: "conda info".to_string(),
            error,
        })
    }
}

#[derive(Deserialize)]
struct Export {
    #[serde(default)]
    dependencies: Option<Vec<Dependency>>,
}

/// Builds conda command lines.
#[derive(Debug, Clone)]
pub struct Conda {
    program: String,
}

impl Conda {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn args<const N: usize>(&self, args: [&str; N]) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(args.into_iter().map(String::from))
            .collect()
    }

    pub fn info_args(&self) -> Vec<String> {
        self.args(["info", "--json"])
    }

    pub fn install_args(&self, env_name: &str, spec: &str) -> Vec<String> {
        self.args(["install", "-n", env_name, spec])
    }

    pub fn remove_args(&self, env_name: &str, package: &str) -> Vec<String> {
        self.args(["remove", "-n", env_name, package])
    }

    pub fn export_args(&self, env_name: &str) -> Vec<String> {
        self.args(["env", "export", "-n", env_name])
    }
}

impl Default for Conda {
    fn default() -> Self {
        Self::new(default_conda())
    }
}

/// Package names listed by `conda env export`.
///
/// Only conda packages count; the pip group of the export is ignored.
pub fn parse_export(yaml: &str) -> crate::Result<BTreeSet<String>> {
    let export: Export = serde_yaml::from_str(yaml).map_err(|error| crate::Error::InvalidYaml {
        origin: "conda env export".to_string(),
        error,
    })?;
    Ok(names(
        export
            .dependencies
            .unwrap_or_default()
            .iter()
            .filter_map(Dependency::as_package),
    ))
}

/// Builds `python -m pip` command lines.
#[derive(Debug, Clone)]
pub struct Pip {
    python: PathBuf,
}

impl Pip {
    /// `python` should be the resolved interpreter of the active environment.
    pub fn new<P: Into<PathBuf>>(python: P) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    fn args<const N: usize>(&self, args: [&str; N]) -> Vec<String> {
        [self.python.to_string_lossy().into_owned(), "-m".into(), "pip".into()]
            .into_iter()
            .chain(args.into_iter().map(String::from))
            .collect()
    }

    pub fn install_args(&self, spec: &str) -> Vec<String> {
        self.args(["install", spec])
    }

    pub fn uninstall_args(&self, package: &str) -> Vec<String> {
        self.args(["uninstall", package])
    }

    pub fn freeze_args(&self) -> Vec<String> {
        self.args(["freeze"])
    }
}

/// Package names listed by `pip freeze`.
pub fn parse_freeze(output: &str) -> BTreeSet<String> {
    names(output.lines().map(str::trim).filter(|line| !line.is_empty()))
}

fn names<'a>(specs: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    specs
        .filter_map(|spec| match parse_name(spec) {
            Ok(name) => Some(name),
            Err(_) => {
                tracing::debug!("ignoring unparseable entry: {spec}");
                None
            }
        })
        .collect()
}
