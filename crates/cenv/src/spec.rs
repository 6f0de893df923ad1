// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Parsing and writing of conda `environment.yml` files.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

#[cfg(test)]
#[path = "./spec_test.rs"]
mod spec_test;

/// Key of the nested mapping that holds pip requirements.
pub const PIP_KEY: &str = "pip";

const DEPENDENCIES_KEY: &str = "dependencies";

/// One entry of the `dependencies:` list.
#[derive(Debug, Clone, PartialEq)]
pub enum Dependency {
    /// A conda package spec, e.g. `numpy=1.26`.
    Package(String),

    /// The `- pip: [...]` group of pip requirements.
    Pip(PipGroup),

    /// Anything else, carried through untouched.
    Other(Value),
}

impl Dependency {
    /// The package spec, if this entry is one.
    pub fn as_package(&self) -> Option<&str> {
        match self {
            Self::Package(spec) => Some(spec),
            _ => None,
        }
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::String(spec) => Self::Package(spec),
            Value::Mapping(mapping) if mapping.contains_key(PIP_KEY) => {
                Self::Pip(PipGroup::from_mapping(mapping))
            }
            other => Self::Other(other),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Package(spec) => Value::String(spec.clone()),
            Self::Pip(group) => group.to_value(),
            Self::Other(value) => value.clone(),
        }
    }
}

/// A mapping entry holding the `pip` key.
///
/// Keys next to `pip` and items that are not requirement strings are kept.
/// The mapping is written back as it was read until its items change.
#[derive(Debug, Clone)]
pub struct PipGroup {
    mapping: Mapping,
    items: Vec<Value>,
}

impl PipGroup {
    /// A `{pip: [...]}` group holding `items`.
    pub fn new(items: Vec<Value>) -> Self {
        let mut mapping = Mapping::new();
        mapping.insert(Value::from(PIP_KEY), Value::Sequence(items.clone()));
        Self { mapping, items }
    }

    fn from_mapping(mapping: Mapping) -> Self {
        let items = pip_items(mapping.get(PIP_KEY));
        Self { mapping, items }
    }

    /// Items of the `pip:` list, in file order.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }

    fn to_value(&self) -> Value {
        let mut mapping = self.mapping.clone();
        if pip_items(mapping.get(PIP_KEY)) != self.items {
            // Replacing an existing key keeps its position
            mapping.insert(Value::from(PIP_KEY), Value::Sequence(self.items.clone()));
        }
        Value::Mapping(mapping)
    }
}

impl PartialEq for PipGroup {
    fn eq(&self, other: &Self) -> bool {
        self.to_value() == other.to_value()
    }
}

/// Items under a `pip` key; `pip:` with no value has none.
fn pip_items(value: Option<&Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(items)) => items.clone(),
        Some(other) => vec![other.clone()],
    }
}

impl<'de> Deserialize<'de> for Dependency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for Dependency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

/// A loaded `environment.yml`.
///
/// The document keeps every top-level key in the order it was authored, so
/// writing the file back only changes the `dependencies` list.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    document: Mapping,

    /// Entries of the `dependencies:` list, in file order.
    pub dependencies: Vec<Dependency>,

    /// Path to the file this was loaded from (not serialized).
    pub source_path: Option<PathBuf>,
}

impl EnvFile {
    /// Parse an environment file from a YAML string.
    pub fn from_yaml<S: Into<String>>(yaml: S) -> crate::Result<Self> {
        let yaml = yaml.into();
        let invalid = |error: serde_yaml::Error| crate::Error::InvalidYaml {
            origin: crate::ENV_FILENAME.to_string(),
            error,
        };

        // An empty file is an empty document
        let document: Mapping = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            serde_yaml::from_str::<Option<Mapping>>(&yaml)
                .map_err(invalid)?
                .unwrap_or_default()
        };

        let dependencies = match document.get(DEPENDENCIES_KEY) {
            Some(value) => serde_yaml::from_value::<Option<Vec<Dependency>>>(value.clone())
                .map_err(invalid)?
                .unwrap_or_default(),
            None => Vec::new(),
        };

        Ok(Self {
            document,
            dependencies,
            source_path: None,
        })
    }

    /// Load an environment file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| crate::Error::ReadFailed {
            path: path.to_path_buf(),
            error: e,
        })?;

        let mut spec = Self::from_yaml(yaml)?;
        spec.source_path = Some(path.to_path_buf());
        Ok(spec)
    }

    /// The declared environment name.
    pub fn name(&self) -> Option<&str> {
        self.document.get("name").and_then(Value::as_str)
    }

    /// The declared environment prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.document.get("prefix").and_then(Value::as_str)
    }

    /// Items of the pip group, if the file has one.
    pub fn pip_dependencies(&self) -> Option<&[Value]> {
        self.dependencies.iter().find_map(|dep| match dep {
            Dependency::Pip(group) => Some(group.items()),
            _ => None,
        })
    }

    /// Items of the first pip group, appending an empty group when the file
    /// has none.
    pub fn pip_dependencies_mut(&mut self) -> &mut Vec<Value> {
        let index = match self
            .dependencies
            .iter()
            .position(|dep| matches!(dep, Dependency::Pip(_)))
        {
            Some(index) => index,
            None => {
                self.dependencies
                    .push(Dependency::Pip(PipGroup::new(Vec::new())));
                self.dependencies.len() - 1
            }
        };
        match &mut self.dependencies[index] {
            Dependency::Pip(group) => group.items_mut(),
            _ => unreachable!("index points at the pip group"),
        }
    }

    /// Render the document, with the current dependencies, as YAML.
    pub fn to_yaml(&self) -> crate::Result<String> {
        let mut document = self.document.clone();
        let dependencies =
            Value::Sequence(self.dependencies.iter().map(Dependency::to_value).collect());
        // Replacing an existing key keeps its position
        document.insert(Value::String(DEPENDENCIES_KEY.to_string()), dependencies);

        serde_yaml::to_string(&Value::Mapping(document)).map_err(|error| {
            crate::Error::InvalidYaml {
                origin: crate::ENV_FILENAME.to_string(),
                error,
            }
        })
    }

    /// Write the document back to the file it was loaded from.
    pub fn save(&self) -> crate::Result<()> {
        let path = self.source_path.as_ref().ok_or_else(|| {
            crate::Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "environment file has no source path",
            ))
        })?;
        self.save_to(path)
    }

    /// Atomically replace `path` with the rendered document.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let yaml = self.to_yaml()?;
        let write_failed = |error: std::io::Error| crate::Error::WriteFailed {
            path: path.to_path_buf(),
            error,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
        tmp.write_all(yaml.as_bytes()).map_err(write_failed)?;
        if let Ok(metadata) = std::fs::metadata(path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(write_failed)?;
        }
        tmp.persist(path).map_err(|e| write_failed(e.error))?;
        Ok(())
    }
}
