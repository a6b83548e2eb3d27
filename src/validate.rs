//! Structural validation of candidate walkthrough scripts.
//!
//! This is the only place untyped JSON becomes a `WalkthroughScript`. Every
//! rule runs to completion so authors see all problems in one pass; the same
//! rule set gates editor saves and resolver self-checks.
use crate::error::ValidationFailure;
use crate::schema::{Phase, WalkthroughScript};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Step flags that must be exact JSON booleans when present.
pub const STEP_FLAG_FIELDS: [&str; 4] = ["mustSay", "required", "passFail", "skip"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub problems: Vec<String>,
}

impl ValidationReport {
    fn from_problems(problems: Vec<String>) -> Self {
        Self {
            ok: problems.is_empty(),
            problems,
        }
    }

    pub fn into_result(self) -> Result<(), ValidationFailure> {
        if self.ok {
            Ok(())
        } else {
            Err(ValidationFailure {
                problems: self.problems,
            })
        }
    }
}

/// Check a candidate script against every structural rule.
pub fn validate_script(candidate: &Value) -> ValidationReport {
    let mut problems = Vec::new();
    let Some(sections) = candidate.as_array() else {
        problems.push(format!(
            "top level must be an array of sections (got {})",
            json_kind(candidate)
        ));
        return ValidationReport::from_problems(problems);
    };

    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    for (section_idx, section) in sections.iter().enumerate() {
        let at = format!("[{section_idx}]");
        let Some(fields) = section.as_object() else {
            problems.push(format!(
                "{at}: section must be an object (got {})",
                json_kind(section)
            ));
            continue;
        };

        match fields.get("section") {
            Some(Value::String(name)) if !name.trim().is_empty() => {
                if let Some(prev) = first_seen.get(name.as_str()) {
                    problems.push(format!(
                        "{at}.section: duplicate section name {name:?} (first used at [{prev}])"
                    ));
                } else {
                    first_seen.insert(name.as_str(), section_idx);
                }
            }
            Some(other) => problems.push(format!(
                "{at}.section: must be a non-empty string (got {})",
                describe(other)
            )),
            None => problems.push(format!("{at}.section: missing section name")),
        }

        match fields.get("steps") {
            Some(Value::Array(steps)) => {
                for (step_idx, step) in steps.iter().enumerate() {
                    validate_step(&format!("{at}.steps[{step_idx}]"), step, &mut problems);
                }
            }
            Some(other) => problems.push(format!(
                "{at}.steps: must be an array (got {})",
                json_kind(other)
            )),
            None => problems.push(format!("{at}.steps: missing steps array")),
        }
    }

    ValidationReport::from_problems(problems)
}

fn validate_step(at: &str, step: &Value, problems: &mut Vec<String>) {
    let Some(fields) = step.as_object() else {
        problems.push(format!(
            "{at}: step must be an object (got {})",
            json_kind(step)
        ));
        return;
    };

    match fields.get("script") {
        Some(Value::String(text)) if !text.trim().is_empty() => {}
        Some(other) => problems.push(format!(
            "{at}.script: must be a non-empty string (got {})",
            describe(other)
        )),
        None => problems.push(format!("{at}.script: missing script text")),
    }

    for flag in STEP_FLAG_FIELDS {
        if let Some(value) = fields.get(flag) {
            if !value.is_boolean() {
                problems.push(format!(
                    "{at}.{flag}: must be a boolean (got {})",
                    describe(value)
                ));
            }
        }
    }

    if let Some(label) = fields.get("label") {
        if !label.is_string() {
            problems.push(format!(
                "{at}.label: must be a string (got {})",
                json_kind(label)
            ));
        }
    }

    if let Some(phase) = fields.get("phase") {
        let known = phase.as_str().and_then(Phase::parse).is_some();
        if !known {
            let expected = Phase::ALL.map(|phase| phase.as_str()).join(", ");
            problems.push(format!(
                "{at}.phase: must be one of {expected} (got {})",
                describe(phase)
            ));
        }
    }
}

/// Validate and narrow candidate JSON into a typed script.
pub fn parse_script(candidate: &Value) -> Result<WalkthroughScript, ValidationFailure> {
    validate_script(candidate).into_result()?;
    serde_json::from_value(candidate.clone()).map_err(|err| ValidationFailure {
        problems: vec![format!("script could not be decoded: {err}")],
    })
}

/// Validate an already-typed script through the identical rule set.
pub fn validate_typed(script: &WalkthroughScript) -> ValidationReport {
    match serde_json::to_value(script) {
        Ok(value) => validate_script(&value),
        Err(err) => ValidationReport::from_problems(vec![format!(
            "script could not be encoded: {err}"
        )]),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) if text.trim().is_empty() => "empty string".to_string(),
        Value::String(text) => format!("string {text:?}"),
        Value::Number(number) => format!("number {number}"),
        Value::Bool(flag) => format!("boolean {flag}"),
        other => json_kind(other).to_string(),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
