use pinset_schema::{
    parse_manifest_str, process_str, ManifestFormat, PackageName, ParseError, PipelineError,
    ResolvedSet, ValidationError,
};

fn manifest_with(requirements: &[&str]) -> String {
    format!(
        r#"
[package]
name = "artiq-dev"
version = "5.0"
[build]
noarch = "python"
number = 0
string = "py_0+git1a2b3c4d"
[requirements]
run = [{}]
"#,
        requirements
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

fn resolve(text: &str) -> ResolvedSet {
    process_str(text, ManifestFormat::Toml).unwrap()
}

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn resolving_twice_is_byte_identical() {
    let text = manifest_with(&["python >=3.5.3,<3.6", "llvm-or1k 4.0.1", "numpy"]);
    let a = resolve(&text);
    let b = resolve(&text);
    assert_eq!(a.canonical_json().unwrap(), b.canonical_json().unwrap());
    assert_eq!(a.to_json_lines().unwrap(), b.to_json_lines().unwrap());
    assert_eq!(a.to_toml().unwrap(), b.to_toml().unwrap());
}

#[test]
fn every_permutation_resolves_to_the_same_set() {
    let reqs = [
        "python >=3.5.3,<3.6",
        "rust-core-or1k 1.23.0 19",
        "numpy",
        "PyQt5",
        "llvmlite-artiq 0.20.0",
    ];
    let expected = resolve(&manifest_with(&reqs)).canonical_json().unwrap();
    for perm in permutations(&reqs) {
        let got = resolve(&manifest_with(&perm)).canonical_json().unwrap();
        assert_eq!(got, expected, "order {perm:?} changed the resolved set");
    }
}

#[test]
fn duplicate_detected_iff_names_collide() {
    let cases: &[(&[&str], bool)] = &[
        (&["numpy", "scipy"][..], false),
        (&["numpy", "numpy"][..], true),
        (&["numpy 1.14", "numpy 1.15"][..], true),
        (&["Numpy", "numpy"][..], false),
        (&["a", "b", "c", "b"][..], true),
    ];
    for (reqs, duplicated) in cases {
        let result = parse_manifest_str(&manifest_with(reqs), ManifestFormat::Toml)
            .unwrap()
            .validate();
        let has_duplicate = result.as_ref().err().is_some_and(|report| {
            report
                .violations
                .iter()
                .any(|v| matches!(v, ValidationError::DuplicateRequirement { .. }))
        });
        assert_eq!(has_duplicate, *duplicated, "case {reqs:?}");
    }
}

#[test]
fn artiq_dev_duplicate_numpy_is_named() {
    let err = process_str(
        &manifest_with(&["python >=3.5.3,<3.6", "numpy", "numpy"]),
        ManifestFormat::Toml,
    )
    .unwrap_err();
    let report = match err {
        PipelineError::Validation(report) => report,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert_eq!(
        report.violations,
        vec![ValidationError::DuplicateRequirement {
            name: PackageName::new("numpy"),
            first: 1,
            duplicate: 2,
        }]
    );
}

#[test]
fn artiq_dev_without_duplicate_sorts_numpy_first() {
    let set = resolve(&manifest_with(&["python >=3.5.3,<3.6", "numpy"]));
    let names: Vec<&str> = set.requirements().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["numpy", "python"]);
}

#[test]
fn negative_build_number_fails_validation() {
    let text = "[package]\nname = \"artiq-dev\"\n[build]\nnumber = -1\n";
    let err = process_str(text, ManifestFormat::Toml).unwrap_err();
    let report = match err {
        PipelineError::Validation(report) => report,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert!(matches!(
        report.violations.as_slice(),
        [ValidationError::InvalidBuildMetadata { .. }]
    ));
}

#[test]
fn unresolved_version_placeholder_fails_validation() {
    let text = r#"
[package]
name = "artiq-dev"
version = '{{ environ.get("GIT_DESCRIBE_TAG", "") }}'
"#;
    let err = process_str(text, ManifestFormat::Toml).unwrap_err();
    let report = match err {
        PipelineError::Validation(report) => report,
        other => panic!("expected validation failure, got {other:?}"),
    };
    assert!(matches!(
        report.violations.as_slice(),
        [ValidationError::UnresolvedPlaceholder { field, .. }] if field == "package.version"
    ));
}

#[test]
fn placeholders_rejected_in_every_requirement_field() {
    for req in ["{{ pkg }}", "numpy {{ v }}", "numpy 1.14 {{ b }}"] {
        let err = process_str(&manifest_with(&[req]), ManifestFormat::Toml).unwrap_err();
        assert!(
            matches!(err, PipelineError::Validation(_)),
            "'{req}' should fail validation"
        );
    }
}

#[test]
fn malformed_input_never_reaches_validation() {
    assert!(matches!(
        process_str("not = [valid", ManifestFormat::Toml),
        Err(PipelineError::Parse(ParseError::Toml(_)))
    ));
    assert!(matches!(
        process_str(&manifest_with(&["a b c d"]), ManifestFormat::Toml),
        Err(PipelineError::Parse(ParseError::MalformedRequirement {
            index: 0,
            ..
        }))
    ));
    assert!(matches!(
        process_str(&manifest_with(&["numpy", "a 1 {{ 2 3"]), ManifestFormat::Toml),
        Err(PipelineError::Parse(ParseError::MalformedRequirement {
            index: 1,
            ..
        }))
    ));
}

#[test]
fn non_integer_build_number_is_reported_not_rejected_at_parse() {
    let yaml = "package:\n  name: artiq-dev\n  version: '{{ v }}'\nbuild:\n  number: 1.5\n";
    let err = process_str(yaml, ManifestFormat::Yaml).unwrap_err();
    let report = match err {
        PipelineError::Validation(report) => report,
        other => panic!("expected validation failure, got {other:?}"),
    };
    let fields: Vec<String> = report.violations.iter().map(ValidationError::field).collect();
    assert_eq!(fields, vec!["package.version", "build.number"]);
}

#[test]
fn yaml_and_toml_forms_resolve_identically() {
    let yaml = r#"
package:
  name: artiq-dev
  version: "5.0"
build:
  noarch: python
  number: 0
  string: py_0+git1a2b3c4d
requirements:
  run:
    - numpy
    - python >=3.5.3,<3.6
"#;
    let from_yaml = process_str(yaml, ManifestFormat::Yaml).unwrap();
    let from_toml = resolve(&manifest_with(&["python >=3.5.3,<3.6", "numpy"]));
    assert_eq!(
        from_yaml.canonical_json().unwrap(),
        from_toml.canonical_json().unwrap()
    );
    assert_eq!(from_yaml.identity(), from_toml.identity());
}
