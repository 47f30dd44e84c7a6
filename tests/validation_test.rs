use remote_exec::validation::{RECOGNIZED_KEYS, validate};
use serde_yaml::Value;

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).expect("test YAML should parse")
}

#[test]
fn test_validate_good() {
    let report = validate(&yaml("inline: echo foo\n"), RECOGNIZED_KEYS);
    assert!(report.warnings.is_empty(), "Warnings: {:?}", report.warnings);
    assert!(report.errors.is_empty(), "Errors: {:?}", report.errors);
}

#[test]
fn test_validate_bad() {
    let report = validate(&yaml("invalid: nope\n"), RECOGNIZED_KEYS);
    assert!(report.warnings.is_empty(), "Warnings: {:?}", report.warnings);
    assert!(!report.errors.is_empty(), "Should have errors");
}

#[test]
fn test_validate_each_single_mode_is_clean() {
    let blocks = [
        "inline:\n  - cd /tmp\n  - wget http://foobar\n  - exit 0\n",
        "script: test-fixtures/script1.sh\n",
        "scripts:\n  - test-fixtures/script1.sh\n  - test-fixtures/script1.sh\n",
        "inline: []\nscripts: [a.sh]\n",
        "script: ~\ninline: [exit 0]\n",
    ];

    for block in blocks {
        let report = validate(&yaml(block), RECOGNIZED_KEYS);
        assert!(report.warnings.is_empty(), "Warnings for {:?}: {:?}", block, report.warnings);
        assert!(report.errors.is_empty(), "Errors for {:?}: {:?}", block, report.errors);
    }
}

#[test]
fn test_validate_unrecognized_key_beside_valid_mode() {
    let report = validate(&yaml("inline: [exit 0]\nscript_path: /tmp/x.sh\n"), RECOGNIZED_KEYS);
    assert_eq!(report.errors.len(), 1, "Errors: {:?}", report.errors);
    assert!(report.errors[0].to_string().contains("'script_path'"));
}

#[test]
fn test_validate_all_modes_set() {
    let report = validate(&yaml("inline: [exit 0]\nscript: a.sh\nscripts: [b.sh]\n"), RECOGNIZED_KEYS);
    assert_eq!(report.errors.len(), 1, "Errors: {:?}", report.errors);
    assert!(report.errors[0].to_string().contains("only one of"));
}

#[test]
fn test_validate_with_custom_recognized_keys() {
    let keys = ["inline", "script", "scripts", "connection"];
    let report = validate(&yaml("inline: [exit 0]\nconnection: ssh\n"), &keys);
    assert!(report.is_valid(), "Errors: {:?}", report.errors);
}

#[test]
fn test_validate_does_not_touch_files() {
    let report = validate(&yaml("script: /non/existent/script.sh\n"), RECOGNIZED_KEYS);
    assert!(report.is_valid(), "Errors: {:?}", report.errors);
}
