// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Discovery of the environment.yml that governs a directory.

use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "./discovery_test.rs"]
mod discovery_test;

use crate::ENV_FILENAME;

/// Find `filename` in `start_dir` or the closest of its ancestors.
///
/// Walks up one directory at a time and stops at the filesystem root.
pub fn locate_ancestor_file(start_dir: &Path, filename: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// Find the environment.yml that applies to `start_dir`.
///
/// The start directory is resolved to its canonical form first so that
/// relative paths and symlinked directories walk the real tree.
pub fn find_env_file<P: AsRef<Path>>(start_dir: P) -> crate::Result<PathBuf> {
    let start_dir = start_dir.as_ref();
    let start = dunce::canonicalize(start_dir).map_err(|e| crate::Error::ReadFailed {
        path: start_dir.to_path_buf(),
        error: e,
    })?;

    match locate_ancestor_file(&start, ENV_FILENAME) {
        Some(path) => {
            tracing::debug!("Found {ENV_FILENAME} at {}", path.display());
            Ok(path)
        }
        None => Err(crate::Error::EnvFileNotFound(start)),
    }
}
