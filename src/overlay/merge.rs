use crate::schema::{find_section_mut, WalkthroughScript, WalkthroughSection, WalkthroughStep};
use serde::{Deserialize, Serialize};

/// How `merge_steps` places incoming steps.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// Append to the section, creating it at the end of the script if absent.
    #[default]
    Append,
    /// Swap the step sharing each incoming label, else append. Needs the section.
    Replace,
    /// Insert after the step labelled `anchor`. Needs the section and anchor.
    InsertAfter { anchor: String },
}

/// Inject or replace steps within the named section.
pub fn merge_steps(
    mut script: WalkthroughScript,
    section_name: &str,
    steps: &[WalkthroughStep],
    mode: &MergeMode,
) -> WalkthroughScript {
    match mode {
        MergeMode::Append => match find_section_mut(&mut script, section_name) {
            Some(section) => section.steps.extend(steps.iter().cloned()),
            None => script.push(WalkthroughSection::new(section_name, steps.to_vec())),
        },
        MergeMode::Replace => {
            let Some(section) = find_section_mut(&mut script, section_name) else {
                return script;
            };
            for incoming in steps {
                let existing = incoming
                    .label
                    .as_deref()
                    .and_then(|label| section.steps.iter().position(|step| step.has_label(label)));
                match existing {
                    Some(idx) => section.steps[idx] = incoming.clone(),
                    None => section.steps.push(incoming.clone()),
                }
            }
        }
        MergeMode::InsertAfter { anchor } => {
            let Some(section) = find_section_mut(&mut script, section_name) else {
                return script;
            };
            let Some(idx) = section.steps.iter().position(|step| step.has_label(anchor)) else {
                return script;
            };
            let tail = section.steps.split_off(idx + 1);
            section.steps.extend(steps.iter().cloned());
            section.steps.extend(tail);
        }
    }
    script
}
