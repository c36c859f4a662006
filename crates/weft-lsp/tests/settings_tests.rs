use super::*;
use std::io::Write as _;

use crate::decisions::DecisionPointId;

#[test]
fn test_defaults_are_safe() {
    let settings = Settings::default();
    assert!(!settings.allow_heuristic_provenance);
    assert!(!settings.strict_decisions);
    assert!(settings.allow_fallback_route);
    // Every decision point has an inferred fallback out of the box.
    for point in DecisionPointId::ALL {
        assert!(settings.inferred_style.get(point).is_some());
    }
}

#[test]
fn test_from_json_with_partial_fields() {
    let settings = Settings::from_json(
        r#"{
            "allowHeuristicProvenance": true,
            "decisionDefaults": { "rename-style": "kebab-case" }
        }"#,
    )
    .unwrap();

    assert!(settings.allow_heuristic_provenance);
    assert_eq!(
        settings.decision_defaults.get(DecisionPointId::RenameStyle),
        Some("kebab-case")
    );
    // Unspecified fields keep their defaults.
    assert!(settings.allow_fallback_route);
}

#[test]
fn test_unknown_fields_are_tolerated() {
    let settings = Settings::from_json(r#"{ "futureKnob": 3, "strictDecisions": true }"#).unwrap();
    assert!(settings.strict_decisions);
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "allowFallbackRoute": false }}"#).unwrap();

    let settings = Settings::load(file.path()).unwrap();
    assert!(!settings.allow_fallback_route);
}

#[test]
fn test_load_reports_missing_file() {
    let err = Settings::load(std::path::Path::new("/nonexistent/weft.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Io(..)));
}

#[test]
fn test_strict_policy_empties_inferred_tier() {
    let mut settings = Settings::default();
    settings.strict_decisions = true;
    assert!(settings.effective_inferred_style().is_empty());

    settings.strict_decisions = false;
    assert!(!settings.effective_inferred_style().is_empty());
}
