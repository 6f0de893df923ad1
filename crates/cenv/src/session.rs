// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Keeping environment.yml and the active conda environment in lockstep.
//!
//! A [`Session`] is opened against the environment.yml that governs a
//! directory and is only handed out once that file agrees with the active
//! conda environment. Each mutation then edits the in-memory file, runs
//! conda or pip, checks the result with a fresh query and only then writes
//! the file back. Any failure leaves the file on disk untouched.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::conda::{self, Conda, CondaInfo, Pip};
use crate::editor::{self, Edit};
use crate::package::parse_name;
use crate::process::{command_line, find_executable, CommandRunner};
use crate::{EnvFile, ENV_FILENAME};

#[cfg(all(test, unix))]
#[path = "./session_test.rs"]
mod session_test;

/// Options for opening a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Directory where the search for environment.yml starts.
    pub start_dir: PathBuf,

    /// conda executable.
    pub conda: String,

    /// Name of the python executable of the active environment.
    pub python: String,

    /// Search path for python, `PATH` when unset.
    pub search_path: Option<OsString>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            start_dir: PathBuf::from("."),
            conda: conda::default_conda().to_string(),
            python: "python".to_string(),
            search_path: None,
        }
    }
}

/// What a mutation ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do; neither the environment nor the file were touched.
    Unchanged,
    /// The package was installed and the file updated.
    Installed { name: String, edit: Edit },
    /// The package was removed and the file updated.
    Removed { name: String },
}

/// An environment.yml validated against the active conda environment.
#[derive(Debug)]
pub struct Session<R> {
    runner: R,
    conda: Conda,
    pip: Pip,
    env_file: EnvFile,
    path: PathBuf,
    env_name: String,
    prefix: PathBuf,
}

impl<R: CommandRunner> Session<R> {
    /// Find and load environment.yml, then check it against the active
    /// environment.
    pub fn open(options: &SessionOptions, runner: R) -> crate::Result<Self> {
        let path = crate::discovery::find_env_file(&options.start_dir)?;
        let env_file = EnvFile::load(&path)?;
        tracing::debug!("loaded {}", path.display());

        let conda = Conda::new(options.conda.as_str());
        let info = query_info(&runner, &conda)?;

        let declared = env_file
            .name()
            .ok_or_else(|| crate::Error::MissingName(path.clone()))?
            .to_string();
        if info.active_prefix_name.as_deref() != Some(declared.as_str()) {
            return Err(crate::Error::NameMismatch {
                active: info.active_prefix_name.unwrap_or_else(|| "<none>".to_string()),
                declared,
            });
        }

        let prefix = info.active_prefix.unwrap_or_default();
        if let Some(declared_prefix) = env_file.prefix() {
            if Path::new(declared_prefix) != prefix.as_path() {
                return Err(crate::Error::PrefixMismatch {
                    active: prefix,
                    declared: PathBuf::from(declared_prefix),
                });
            }
        }

        // Strict, but installing into another interpreter is worse
        let python = find_executable(&options.python, options.search_path.as_deref())?;
        let python = dunce::canonicalize(&python)?;
        if !is_inside(&python, &prefix) {
            return Err(crate::Error::OutsidePrefix {
                executable: python,
                prefix,
            });
        }
        tracing::debug!(
            "validated against active environment {declared} at {}",
            prefix.display()
        );

        Ok(Self {
            runner,
            conda,
            pip: Pip::new(python),
            env_file,
            path,
            env_name: declared,
            prefix,
        })
    }

    /// Path of the environment.yml this session edits.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The environment file as currently held in memory.
    pub fn env_file(&self) -> &EnvFile {
        &self.env_file
    }

    /// Name of the environment.
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    /// Install location of the active environment.
    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// The interpreter pip runs under.
    pub fn python(&self) -> &Path {
        self.pip.python()
    }

    /// Install a conda package and record it in the file.
    pub fn install(&mut self, spec: &str) -> crate::Result<Outcome> {
        let spec = spec.trim();
        let edit = editor::add_or_update(&mut self.env_file.dependencies, spec)?;
        if !edit.is_changed() {
            return Ok(Outcome::Unchanged);
        }

        let argv = self.conda.install_args(&self.env_name, spec);
        self.exec("conda", &argv)?;

        let name = parse_name(spec)?;
        if !self.conda_has(&name)? {
            return Err(crate::Error::NotInstalled {
                name,
                source_cmd: "conda env export".to_string(),
            });
        }
        tracing::info!("Verified that package has been installed");

        self.persist()?;
        Ok(Outcome::Installed { name, edit })
    }

    /// Remove a conda package and drop it from the file.
    pub fn remove(&mut self, spec: &str) -> crate::Result<Outcome> {
        let spec = spec.trim();
        let removal = editor::remove(&self.env_file.dependencies, spec)?;
        let Some(name) = removal.name else {
            tracing::info!("Specified package '{}' not found", parse_name(spec)?);
            return Ok(Outcome::Unchanged);
        };
        self.env_file.dependencies = removal.entries;

        let argv = self.conda.remove_args(&self.env_name, &name);
        self.exec("conda", &argv)?;

        if self.conda_has(&name)? {
            return Err(crate::Error::NotRemoved {
                name,
                source_cmd: "conda env export".to_string(),
            });
        }
        tracing::info!("Verified that package has been removed");

        self.persist()?;
        Ok(Outcome::Removed { name })
    }

    /// Install a package with pip and record it in the pip group.
    pub fn pip_install(&mut self, spec: &str) -> crate::Result<Outcome> {
        let spec = spec.trim();
        let edit = editor::add_or_update(self.env_file.pip_dependencies_mut(), spec)?;
        if !edit.is_changed() {
            return Ok(Outcome::Unchanged);
        }

        let argv = self.pip.install_args(spec);
        self.exec("pip", &argv)?;

        let name = parse_name(spec)?;
        if !self.pip_has(&name)? {
            return Err(crate::Error::NotInstalled {
                name,
                source_cmd: "pip freeze".to_string(),
            });
        }
        tracing::info!("Verified that package has been installed");

        self.persist()?;
        Ok(Outcome::Installed { name, edit })
    }

    /// Uninstall a package with pip and drop it from the pip group.
    pub fn pip_remove(&mut self, spec: &str) -> crate::Result<Outcome> {
        let spec = spec.trim();
        let removal = editor::remove(self.env_file.pip_dependencies().unwrap_or(&[]), spec)?;
        let Some(name) = removal.name else {
            tracing::info!(
                "Specified package '{}' not found in pip section",
                parse_name(spec)?
            );
            return Ok(Outcome::Unchanged);
        };
        *self.env_file.pip_dependencies_mut() = removal.entries;

        let argv = self.pip.uninstall_args(&name);
        self.exec("pip", &argv)?;

        if self.pip_has(&name)? {
            return Err(crate::Error::NotRemoved {
                name,
                source_cmd: "pip freeze".to_string(),
            });
        }
        tracing::info!("Verified that package has been removed");

        self.persist()?;
        Ok(Outcome::Removed { name })
    }

    /// Run a tool that changes the environment, echoing its command line.
    fn exec(&self, tool: &str, argv: &[String]) -> crate::Result<()> {
        tracing::info!(">>> {}", command_line(argv));
        let code = self.runner.run(argv)?;
        tracing::info!("{}", "-".repeat(80));
        tracing::info!("{tool} finished with exit code: {code}");
        if code != 0 {
            return Err(crate::Error::ToolFailed {
                tool: tool.to_string(),
                code,
            });
        }
        Ok(())
    }

    fn conda_has(&self, name: &str) -> crate::Result<bool> {
        let stdout = capture(&self.runner, "conda", &self.conda.export_args(&self.env_name))?;
        Ok(conda::parse_export(&stdout)?.contains(name))
    }

    fn pip_has(&self, name: &str) -> crate::Result<bool> {
        let stdout = capture(&self.runner, "pip", &self.pip.freeze_args())?;
        Ok(conda::parse_freeze(&stdout).contains(name))
    }

    fn persist(&self) -> crate::Result<()> {
        self.env_file.save()?;
        tracing::info!("Updated {ENV_FILENAME}");
        Ok(())
    }
}

fn query_info<R: CommandRunner>(runner: &R, conda: &Conda) -> crate::Result<CondaInfo> {
    let stdout = capture(runner, "conda", &conda.info_args())?;
    CondaInfo::from_json(&stdout)
}

/// Run a read-only query; a non-zero exit is a tool failure.
fn capture<R: CommandRunner>(runner: &R, tool: &str, argv: &[String]) -> crate::Result<String> {
    let captured = runner.capture(argv)?;
    if !captured.success() {
        return Err(crate::Error::ToolFailed {
            tool: tool.to_string(),
            code: captured.code,
        });
    }
    Ok(captured.stdout)
}

/// True when `path` lies strictly below `dir`, comparing real paths.
fn is_inside(path: &Path, dir: &Path) -> bool {
    match dunce::canonicalize(dir) {
        Ok(dir) => path != dir && path.starts_with(&dir),
        Err(_) => false,
    }
}
