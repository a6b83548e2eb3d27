//! Base walkthrough scripts, one per vehicle class.
//!
//! The scripts ship as JSON under `defaults/` and are parsed once into an
//! immutable store that callers pass by reference.
use crate::error::{UnknownClassToken, ValidationFailure};
use crate::schema::{ClassToken, WalkthroughScript};
use crate::validate::parse_script;
use serde_json::Value;
use std::collections::BTreeMap;

pub const CLASS_A_JSON: &str = include_str!("../defaults/class-a.json");
pub const CLASS_A_WITHOUT_AIR_ELECTRIC_JSON: &str =
    include_str!("../defaults/class-a-without-air-electric.json");
pub const CLASS_B_JSON: &str = include_str!("../defaults/class-b.json");
pub const PASSENGER_BUS_JSON: &str = include_str!("../defaults/passenger-bus.json");

fn builtin_source(class: ClassToken) -> &'static str {
    match class {
        ClassToken::ClassA => CLASS_A_JSON,
        ClassToken::ClassAWithoutAirElectric => CLASS_A_WITHOUT_AIR_ELECTRIC_JSON,
        ClassToken::ClassB => CLASS_B_JSON,
        ClassToken::PassengerBus => PASSENGER_BUS_JSON,
    }
}

#[derive(Debug, thiserror::Error)]
#[error("built-in default for {class} is unusable: {reason}")]
pub struct DefaultsLoadError {
    class: ClassToken,
    reason: String,
}

/// Read-only mapping from class token to its base script.
#[derive(Debug, Clone, Default)]
pub struct DefaultsStore {
    scripts: BTreeMap<ClassToken, WalkthroughScript>,
}

impl DefaultsStore {
    /// Parse and validate every embedded default.
    pub fn builtin() -> Result<Self, DefaultsLoadError> {
        let mut scripts = BTreeMap::new();
        for class in ClassToken::ALL {
            let value: Value =
                serde_json::from_str(builtin_source(class)).map_err(|err| DefaultsLoadError {
                    class,
                    reason: err.to_string(),
                })?;
            let script = parse_script(&value).map_err(|failure| DefaultsLoadError {
                class,
                reason: failure.problems.join("; "),
            })?;
            scripts.insert(class, script);
        }
        Ok(Self { scripts })
    }

    /// Build a store from explicit scripts; used for isolated tests and
    /// deployments that ship their own defaults.
    pub fn from_scripts(
        scripts: impl IntoIterator<Item = (ClassToken, Value)>,
    ) -> Result<Self, ValidationFailure> {
        let mut out = BTreeMap::new();
        for (class, value) in scripts {
            let script = parse_script(&value).map_err(|failure| ValidationFailure {
                problems: failure
                    .problems
                    .into_iter()
                    .map(|problem| format!("{class}: {problem}"))
                    .collect(),
            })?;
            out.insert(class, script);
        }
        Ok(Self { scripts: out })
    }

    /// Return a fresh copy of the default script for `class`.
    pub fn get_default(&self, class: ClassToken) -> Result<WalkthroughScript, UnknownClassToken> {
        self.scripts
            .get(&class)
            .cloned()
            .ok_or_else(|| UnknownClassToken {
                token: class.as_str().to_string(),
            })
    }

    /// Registered class tokens in stable order.
    pub fn list_class_tokens(&self) -> Vec<ClassToken> {
        self.scripts.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate_typed;

    #[test]
    fn every_builtin_default_validates() {
        let store = DefaultsStore::builtin().expect("load builtin defaults");
        assert_eq!(store.list_class_tokens(), ClassToken::ALL.to_vec());
        for class in ClassToken::ALL {
            let script = store.get_default(class).expect("default present");
            let report = validate_typed(&script);
            assert!(report.ok, "{class}: {:?}", report.problems);
            assert!(!script.is_empty(), "{class} has sections");
        }
    }

    #[test]
    fn class_b_opens_with_engine_compartment_oil_level() {
        let store = DefaultsStore::builtin().expect("load builtin defaults");
        let script = store.get_default(ClassToken::ClassB).expect("class-b");
        let first = &script[0];
        assert_eq!(first.section, "Engine Compartment");
        let oil = first
            .steps
            .iter()
            .find(|step| step.has_label("Oil Level"))
            .expect("oil level step");
        assert_eq!(oil.must_say, Some(true));
        assert_eq!(oil.required, Some(true));
    }

    #[test]
    fn get_default_returns_independent_copies() {
        let store = DefaultsStore::builtin().expect("load builtin defaults");
        let mut first = store.get_default(ClassToken::ClassA).expect("class-a");
        first[0].steps.clear();
        first[0].section = "Mutated".to_string();
        let second = store.get_default(ClassToken::ClassA).expect("class-a");
        assert_eq!(second[0].section, "Engine Compartment");
        assert!(!second[0].steps.is_empty());
    }

    #[test]
    fn class_specific_sections_are_present() {
        let store = DefaultsStore::builtin().expect("load builtin defaults");
        let names = |class| {
            store
                .get_default(class)
                .expect("default")
                .into_iter()
                .map(|section| section.section)
                .collect::<Vec<_>>()
        };
        assert!(names(ClassToken::ClassA).contains(&"Coupling System".to_string()));
        assert!(!names(ClassToken::ClassB).contains(&"Coupling System".to_string()));
        let hydraulic = names(ClassToken::ClassAWithoutAirElectric);
        assert!(!hydraulic.contains(&"Air Brake Check".to_string()));
        assert!(hydraulic.contains(&"Hydraulic Brakes".to_string()));
        assert!(names(ClassToken::PassengerBus).contains(&"Passenger Compartment".to_string()));
    }

    #[test]
    fn subset_store_reports_unknown_class() {
        let store = DefaultsStore::from_scripts([(
            ClassToken::ClassB,
            serde_json::json!([{ "section": "Cab", "steps": [] }]),
        )])
        .expect("valid subset");
        assert_eq!(store.list_class_tokens(), vec![ClassToken::ClassB]);
        let err = store
            .get_default(ClassToken::PassengerBus)
            .expect_err("not registered");
        assert_eq!(err.token, "passenger-bus");
    }

    #[test]
    fn from_scripts_prefixes_problems_with_class() {
        let failure = DefaultsStore::from_scripts([(ClassToken::ClassA, serde_json::json!({}))])
            .expect_err("object is not a script");
        assert!(failure.problems[0].starts_with("class-a: top level must be an array"));
    }
}
