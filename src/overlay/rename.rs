use crate::schema::WalkthroughScript;
use std::collections::{BTreeMap, BTreeSet};

/// Relabel sections found in `mapping`; all other sections are untouched.
///
/// A section already carrying a target name is left alone, so applying the
/// same mapping twice equals applying it once. Two sections landing on the
/// same label are left in place for the validator to reject.
pub fn rename_sections(
    mut script: WalkthroughScript,
    mapping: &BTreeMap<String, String>,
) -> WalkthroughScript {
    let targets: BTreeSet<&str> = mapping.values().map(String::as_str).collect();
    for section in &mut script {
        if targets.contains(section.section.as_str()) {
            continue;
        }
        if let Some(renamed) = mapping.get(&section.section) {
            section.section.clone_from(renamed);
        }
    }
    script
}
