// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! cenv - conda environment.yml editor
//!
//! This crate keeps a project's `environment.yml` in lockstep with the
//! active conda environment. Packages are installed or removed through
//! conda or pip, the result is verified against the environment, and only
//! then is the file rewritten.
//!
//! # Example
//!
//! ```yaml
//! # environment.yml
//! name: science
//! channels:
//!   - conda-forge
//! dependencies:
//!   - python=3.11
//!   - numpy
//!   - pip:
//!       - requests
//! ```
//!
//! Running `cenv install scipy` inside the activated `science` environment
//! installs scipy with conda and appends `scipy` to `dependencies`;
//! `cenv pip-remove requests` uninstalls requests with pip and drops it
//! from the `pip` group.

pub mod conda;
pub mod discovery;
pub mod editor;
pub mod error;
pub mod package;
pub mod process;
pub mod session;
pub mod spec;

pub use conda::{Conda, CondaInfo, Pip};
pub use discovery::{find_env_file, locate_ancestor_file};
pub use editor::{add_or_update, remove, Edit, Removal, SpecEntry};
pub use error::{Error, ErrorKind, Result};
pub use package::parse_name;
pub use process::{Captured, CommandRunner, SystemRunner};
pub use session::{Outcome, Session, SessionOptions};
pub use spec::{Dependency, EnvFile, PipGroup};

/// Well-known filename for environment specs.
pub const ENV_FILENAME: &str = "environment.yml";
