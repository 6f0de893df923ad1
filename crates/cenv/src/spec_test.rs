// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;
use tempfile::TempDir;

use super::*;

fn pip(items: &[&str]) -> Dependency {
    Dependency::Pip(PipGroup::new(items.iter().map(|s| Value::from(*s)).collect()))
}

const FULL: &str = r#"
name: science
channels:
  - conda-forge
dependencies:
  - python=3.11
  - numpy
  - pip:
      - requests
      - flask>=3
prefix: /opt/conda/envs/science
"#;

#[rstest]
fn test_parse_minimal_spec() {
    let spec = EnvFile::from_yaml("name: science\n").expect("Should parse minimal spec");
    assert_eq!(spec.name(), Some("science"));
    assert_eq!(spec.prefix(), None);
    assert!(spec.dependencies.is_empty());
    assert!(spec.pip_dependencies().is_none());
}

#[rstest]
fn test_parse_full_spec() {
    let spec = EnvFile::from_yaml(FULL).expect("Should parse full spec");
    assert_eq!(spec.name(), Some("science"));
    assert_eq!(spec.prefix(), Some("/opt/conda/envs/science"));
    assert_eq!(
        spec.dependencies,
        vec![
            Dependency::Package("python=3.11".into()),
            Dependency::Package("numpy".into()),
            pip(&["requests", "flask>=3"]),
        ]
    );
    assert_eq!(
        spec.pip_dependencies(),
        Some(&[Value::from("requests"), Value::from("flask>=3")][..])
    );
}

#[rstest]
fn test_empty_file_is_empty_document() {
    let spec = EnvFile::from_yaml("\n").expect("Should parse empty file");
    assert_eq!(spec.name(), None);
    assert!(spec.dependencies.is_empty());
}

#[rstest]
fn test_null_dependencies() {
    let spec = EnvFile::from_yaml("name: x\ndependencies:\n").expect("Should parse");
    assert!(spec.dependencies.is_empty());
}

#[rstest]
fn test_unknown_entries_are_kept() {
    let yaml = r#"
name: x
dependencies:
  - numpy
  - 42
  - channel: defaults
"#;
    let spec = EnvFile::from_yaml(yaml).expect("Should parse");
    assert_eq!(spec.dependencies.len(), 3);
    assert!(matches!(spec.dependencies[1], Dependency::Other(Value::Number(_))));
    assert!(matches!(spec.dependencies[2], Dependency::Other(Value::Mapping(_))));

    let reloaded = EnvFile::from_yaml(spec.to_yaml().unwrap()).unwrap();
    assert_eq!(reloaded.dependencies, spec.dependencies);
}

#[rstest]
fn test_pip_group_created_on_demand() {
    let mut spec = EnvFile::from_yaml("name: x\ndependencies:\n  - numpy\n").unwrap();
    spec.pip_dependencies_mut().push("requests".into());

    assert_eq!(
        spec.dependencies,
        vec![
            Dependency::Package("numpy".into()),
            pip(&["requests"]),
        ]
    );

    // A second call reuses the same group
    spec.pip_dependencies_mut().push("flask".into());
    assert_eq!(spec.dependencies.len(), 2);
    assert_eq!(
        spec.pip_dependencies(),
        Some(&[Value::from("requests"), Value::from("flask")][..])
    );
}

#[rstest]
fn test_pip_group_with_extra_content_is_reused() {
    let yaml = r#"
name: science
dependencies:
  - numpy
  - pip:
      - requests
      - editable: ./src
    index-url: https://pypi.example.com/simple
"#;
    let mut spec = EnvFile::from_yaml(yaml).unwrap();
    crate::editor::add_or_update(spec.pip_dependencies_mut(), "flask").unwrap();

    let reloaded = EnvFile::from_yaml(spec.to_yaml().unwrap()).unwrap();
    let groups: Vec<_> = reloaded
        .dependencies
        .iter()
        .filter_map(|dep| match dep {
            Dependency::Pip(group) => Some(group.to_value()),
            _ => None,
        })
        .collect();
    let expected: Value = serde_yaml::from_str(
        r#"
pip:
  - requests
  - editable: ./src
  - flask
index-url: https://pypi.example.com/simple
"#,
    )
    .unwrap();
    assert_eq!(groups, vec![expected]);
}

#[rstest]
fn test_untouched_empty_pip_group_is_kept() {
    let mut spec = EnvFile::from_yaml("name: x\ndependencies:\n  - numpy\n  - pip:\n").unwrap();
    assert_eq!(spec.pip_dependencies(), Some(&[][..]));
    spec.dependencies.push(Dependency::Package("scipy".into()));

    let yaml = spec.to_yaml().unwrap();
    let document: Value = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(document["dependencies"][1]["pip"], Value::Null);

    spec.pip_dependencies_mut().push("requests".into());
    let document: Value = serde_yaml::from_str(&spec.to_yaml().unwrap()).unwrap();
    assert_eq!(document["dependencies"][1]["pip"][0], Value::from("requests"));
}

#[rstest]
fn test_to_yaml_preserves_key_order() {
    let mut spec = EnvFile::from_yaml(FULL).unwrap();
    spec.dependencies.push(Dependency::Package("scipy".into()));
    let yaml = spec.to_yaml().unwrap();

    let position = |key: &str| {
        yaml.find(&format!("{key}:"))
            .unwrap_or_else(|| panic!("{key} missing from output:\n{yaml}"))
    };
    assert!(position("name") < position("channels"));
    assert!(position("channels") < position("dependencies"));
    assert!(position("dependencies") < position("prefix"));

    let reloaded = EnvFile::from_yaml(yaml).unwrap();
    assert_eq!(reloaded.dependencies, spec.dependencies);
}

#[rstest]
fn test_to_yaml_adds_missing_dependencies_key() {
    let mut spec = EnvFile::from_yaml("name: x\n").unwrap();
    spec.dependencies.push(Dependency::Package("numpy".into()));

    let reloaded = EnvFile::from_yaml(spec.to_yaml().unwrap()).unwrap();
    assert_eq!(reloaded.name(), Some("x"));
    assert_eq!(reloaded.dependencies, vec![Dependency::Package("numpy".into())]);
}

#[rstest]
fn test_save_then_load_round_trip() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(crate::ENV_FILENAME);
    std::fs::write(&path, FULL).unwrap();

    let mut spec = EnvFile::load(&path).expect("Should load spec");
    assert_eq!(spec.source_path.as_deref(), Some(path.as_path()));
    spec.pip_dependencies_mut()
        .retain(|item| item.as_str() != Some("requests"));
    spec.save().expect("Should save spec");

    let reloaded = EnvFile::load(&path).unwrap();
    assert_eq!(reloaded.dependencies, spec.dependencies);
    assert_eq!(reloaded.prefix(), Some("/opt/conda/envs/science"));
}

#[rstest]
fn test_save_without_source_path() {
    let spec = EnvFile::default();
    assert!(spec.save().is_err());
}

#[rstest]
fn test_parse_invalid_yaml() {
    let yaml = r#"
name: x
dependencies: [
  unclosed bracket
"#;
    match EnvFile::from_yaml(yaml) {
        Err(crate::Error::InvalidYaml { .. }) => {}
        other => panic!("Expected InvalidYaml, got: {:?}", other),
    }
}

#[rstest]
fn test_load_missing_file() {
    let tmp = TempDir::new().unwrap();
    match EnvFile::load(tmp.path().join(crate::ENV_FILENAME)) {
        Err(crate::Error::ReadFailed { .. }) => {}
        other => panic!("Expected ReadFailed, got: {:?}", other),
    }
}
