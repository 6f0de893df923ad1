// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Adding, updating and removing package specs in a dependency list.
//!
//! Both operations match entries by canonical package name (see
//! [`crate::package::parse_name`]) and leave every other entry where it was.
//! Entries that are not package specs, like the nested pip group in the
//! conda list or an `{editable: ...}` item in the pip list, are skipped when
//! matching and kept as they are.

use serde_yaml::Value;

use crate::package::parse_name;
use crate::spec::Dependency;

#[cfg(test)]
#[path = "./editor_test.rs"]
mod editor_test;

/// An entry of a list the editor can work on.
pub trait SpecEntry: Clone {
    /// The package spec held by this entry, if it holds one.
    fn spec(&self) -> Option<&str>;

    /// Create an entry for a package spec.
    fn from_spec(spec: String) -> Self;
}

impl SpecEntry for Value {
    fn spec(&self) -> Option<&str> {
        self.as_str()
    }

    fn from_spec(spec: String) -> Self {
        Value::String(spec)
    }
}

impl SpecEntry for Dependency {
    fn spec(&self) -> Option<&str> {
        self.as_package()
    }

    fn from_spec(spec: String) -> Self {
        Dependency::Package(spec)
    }
}

/// What [`add_or_update`] did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// The spec was appended.
    Added,
    /// An entry for the same package was replaced in place.
    Updated { previous: String },
    /// The exact spec was already present.
    Unchanged,
}

impl Edit {
    /// True when the list was modified.
    pub fn is_changed(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Add `spec` to `entries`, or replace the first entry for the same package.
pub fn add_or_update<E: SpecEntry>(entries: &mut Vec<E>, spec: &str) -> crate::Result<Edit> {
    let name = parse_name(spec)?;

    for entry in entries.iter_mut() {
        let Some(existing) = entry.spec().map(str::trim) else {
            continue;
        };
        if parse_name(existing)? != name {
            continue;
        }
        if existing == spec {
            tracing::info!("Same package spec already found: {existing}");
            return Ok(Edit::Unchanged);
        }
        let previous = existing.to_string();
        tracing::info!("Updating spec from {previous} to {spec} ...");
        *entry = E::from_spec(spec.to_string());
        return Ok(Edit::Updated { previous });
    }

    tracing::info!("Adding package spec {spec} to dependencies ...");
    entries.push(E::from_spec(spec.to_string()));
    Ok(Edit::Added)
}

/// Result of [`remove`].
#[derive(Debug, Clone, PartialEq)]
pub struct Removal<E> {
    /// Canonical name of the removed package, `None` when nothing matched.
    pub name: Option<String>,
    /// How many entries matched.
    pub matched: usize,
    /// The list without the matching entries.
    pub entries: Vec<E>,
}

/// Build a copy of `entries` without any spec for the package named by `spec`.
pub fn remove<E: SpecEntry>(entries: &[E], spec: &str) -> crate::Result<Removal<E>> {
    let name = parse_name(spec)?;

    let mut kept = Vec::with_capacity(entries.len());
    let mut matched = 0;
    for entry in entries {
        if let Some(existing) = entry.spec() {
            if parse_name(existing.trim())? == name {
                matched += 1;
                continue;
            }
        }
        kept.push(entry.clone());
    }

    if matched > 1 {
        tracing::warn!("More than one spec matched {name}");
    }

    Ok(Removal {
        name: (matched > 0).then_some(name),
        matched,
        entries: kept,
    })
}
