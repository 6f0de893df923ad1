// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
#[case("numpy", "numpy")]
#[case("numpy=1.26", "numpy")]
#[case("numpy=1.26.4=py311h64a7726_0", "numpy")]
#[case("requests>=2.31,<3", "requests")]
#[case("scikit-learn==1.4.0", "scikit-learn")]
#[case("typing_extensions", "typing_extensions")]
#[case("python 3.11.*", "python")]
fn test_bare_spec_yields_leading_name(#[case] spec: &str, #[case] expected: &str) {
    assert_eq!(parse_name(spec).unwrap(), expected);
}

#[rstest]
#[case("git+https://github.com/psf/requests.git@v2.31.0")]
#[case("hg+https://hg.example.com/repo#egg=thing")]
#[case("svn+svn://svn.example.com/project/trunk")]
#[case("bzr+lp:project")]
fn test_vcs_spec_is_its_own_name(#[case] spec: &str) {
    assert_eq!(parse_name(spec).unwrap(), spec);
}

#[rstest]
fn test_vcs_specs_with_different_refs_are_distinct() {
    let a = parse_name("git+https://example.com/pkg.git@v1").unwrap();
    let b = parse_name("git+https://example.com/pkg.git@v2").unwrap();
    assert_ne!(a, b);
}

#[rstest]
fn test_unknown_scheme_falls_back_to_bare_name() {
    // `cvs` is not a supported VCS scheme, so only the leading word counts
    assert_eq!(parse_name("cvs+https://example.com/x").unwrap(), "cvs");
}

#[rstest]
#[case("")]
#[case("=1.0")]
#[case(">=2")]
#[case(" numpy")]
fn test_unparseable_spec(#[case] spec: &str) {
    match parse_name(spec) {
        Err(crate::Error::InvalidPackageSpec(s)) => assert_eq!(s, spec),
        other => panic!("Expected InvalidPackageSpec, got: {:?}", other),
    }
}
