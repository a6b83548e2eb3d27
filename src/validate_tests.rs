use super::*;
use serde_json::json;

#[test]
fn rejects_object_at_top_level() {
    let report = validate_script(&json!({ "sections": [] }));
    assert!(!report.ok);
    assert_eq!(report.problems.len(), 1);
    assert!(
        report.problems[0].contains("top level must be an array"),
        "unexpected problem: {}",
        report.problems[0]
    );
}

#[test]
fn accepts_empty_script() {
    let report = validate_script(&json!([]));
    assert!(report.ok);
    assert!(report.problems.is_empty());
}

#[test]
fn collects_every_problem_in_one_pass() {
    let candidate = json!([
        { "section": "", "steps": [] },
        { "section": "Brakes", "steps": "none" },
        "not a section",
        {
            "section": "Wheels",
            "steps": [
                { "label": "Rims", "script": "" },
                { "label": "Tires", "script": "Check tread depth.", "mustSay": "yes" },
                { "script": "Lug nuts present.", "required": 1, "skip": null },
                7
            ]
        }
    ]);
    let report = validate_script(&candidate);
    assert!(!report.ok);
    let expected = [
        "[0].section: must be a non-empty string",
        "[1].steps: must be an array",
        "[2]: section must be an object",
        "[3].steps[0].script: must be a non-empty string",
        "[3].steps[1].mustSay: must be a boolean",
        "[3].steps[2].required: must be a boolean",
        "[3].steps[2].skip: must be a boolean",
        "[3].steps[3]: step must be an object",
    ];
    assert_eq!(report.problems.len(), expected.len(), "{:?}", report.problems);
    for (problem, prefix) in report.problems.iter().zip(expected) {
        assert!(problem.starts_with(prefix), "{problem} vs {prefix}");
    }
}

#[test]
fn missing_fields_are_reported() {
    let report = validate_script(&json!([
        { "steps": [{ "label": "Horn" }] },
        { "section": "Cab" }
    ]));
    assert_eq!(
        report.problems,
        vec![
            "[0].section: missing section name".to_string(),
            "[0].steps[0].script: missing script text".to_string(),
            "[1].steps: missing steps array".to_string(),
        ]
    );
}

#[test]
fn duplicate_section_names_are_rejected() {
    let report = validate_script(&json!([
        { "section": "Brakes", "steps": [] },
        { "section": "Wheels", "steps": [] },
        { "section": "Brakes", "steps": [] }
    ]));
    assert!(!report.ok);
    assert_eq!(report.problems.len(), 1);
    assert!(report.problems[0].contains("duplicate section name \"Brakes\""));
    assert!(report.problems[0].contains("first used at [0]"));
}

#[test]
fn label_and_phase_types_are_checked() {
    let report = validate_script(&json!([{
        "section": "Cab",
        "steps": [
            { "label": 3, "script": "Check mirrors." },
            { "script": "Check horn.", "phase": "road-test" }
        ]
    }]));
    assert_eq!(report.problems.len(), 2, "{:?}", report.problems);
    assert!(report.problems[0].starts_with("[0].steps[0].label: must be a string"));
    assert!(report.problems[1].contains("must be one of pre-trip, skills-test"));
}

#[test]
fn parse_script_narrows_valid_json() {
    let candidate = json!([{
        "section": "Engine Compartment",
        "steps": [{
            "label": "Oil Level",
            "script": "Check the dipstick.",
            "mustSay": true,
            "phase": "pre-trip"
        }]
    }]);
    let script = parse_script(&candidate).expect("valid script");
    assert_eq!(script.len(), 1);
    assert_eq!(script[0].steps[0].must_say, Some(true));
    assert_eq!(script[0].steps[0].phase, Some(Phase::PreTrip));
}

#[test]
fn parse_script_returns_all_problems() {
    let candidate = json!([{ "section": "Cab", "steps": [{ "script": 1, "skip": "no" }] }]);
    let failure = parse_script(&candidate).expect_err("invalid script");
    assert_eq!(failure.problems.len(), 2);
}

#[test]
fn accepted_scripts_survive_a_serialize_round_trip() {
    let candidate = json!([
        {
            "section": "Coupling System",
            "notes": { "instructor": "demo first" },
            "steps": [
                {
                    "label": "Fifth Wheel",
                    "script": "Locking jaws closed around kingpin.",
                    "required": true,
                    "passFail": false
                },
                { "script": "Release arm engaged.", "skip": true, "audio": "clip-7" }
            ]
        },
        { "section": "Empty", "steps": [] }
    ]);
    let script = parse_script(&candidate).expect("valid script");
    let text = serde_json::to_string(&script).expect("serialize script");
    let reparsed: Value = serde_json::from_str(&text).expect("reparse script");
    assert!(validate_script(&reparsed).ok);
    assert_eq!(reparsed, candidate);
    assert_eq!(parse_script(&reparsed).expect("still valid"), script);
}

#[test]
fn validate_typed_matches_untyped_rules() {
    let candidate = json!([{ "section": "Cab", "steps": [{ "script": "Horn works." }] }]);
    let mut script = parse_script(&candidate).expect("valid script");
    assert!(validate_typed(&script).ok);
    script[0].steps[0].script = "   ".to_string();
    let report = validate_typed(&script);
    assert!(!report.ok);
    assert!(report.problems[0].starts_with("[0].steps[0].script"));
}
