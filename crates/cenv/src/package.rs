// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Package spec parsing.
//!
//! A package spec is either `name` followed by an optional version or build
//! constraint (`numpy`, `numpy=1.26`, `requests>=2.0`) or a VCS url of the
//! form `<git|hg|svn|bzr>+<url>`. The canonical name is what identifies a
//! package inside a dependency list.

use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(test)]
#[path = "./package_test.rs"]
mod package_test;

/// VCS specs are keyed by the whole string, bare specs by their leading name.
static PACKAGE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(git|hg|svn|bzr)\+.*|^[\w-]+").expect("package name pattern is valid")
});

/// Extract the canonical package name from a package spec.
pub fn parse_name(spec: &str) -> crate::Result<String> {
    PACKAGE_NAME
        .find(spec)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| crate::Error::InvalidPackageSpec(spec.to_string()))
}
