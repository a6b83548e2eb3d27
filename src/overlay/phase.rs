use crate::schema::{Phase, WalkthroughScript};

/// Skip steps tagged for a different phase. Untagged steps apply everywhere.
pub fn apply_phase(mut script: WalkthroughScript, phase: Phase) -> WalkthroughScript {
    for section in &mut script {
        for step in &mut section.steps {
            if step.phase.is_some_and(|tagged| tagged != phase) {
                step.skip = Some(true);
            }
        }
    }
    script
}

/// Tag the untagged steps of the named sections with `phase`.
pub fn tag_phase(
    mut script: WalkthroughScript,
    sections: &[String],
    phase: Phase,
) -> WalkthroughScript {
    for section in &mut script {
        if !sections.contains(&section.section) {
            continue;
        }
        for step in &mut section.steps {
            if step.phase.is_none() {
                step.phase = Some(phase);
            }
        }
    }
    script
}
