//! Overlay pipeline over walkthrough scripts.
//!
//! An overlay is a tagged, pure transform. The applicator folds a list of them
//! left to right; each overlay sees the previous one's output. Overlays never
//! fail: an unmet precondition (missing section, missing anchor) leaves the
//! script unchanged and the validator stays the authoritative gate.
mod merge;
mod phase;
mod rename;
mod restriction;

use crate::schema::{ClassToken, Phase, WalkthroughScript, WalkthroughStep};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use merge::{merge_steps, MergeMode};
pub use phase::{apply_phase, tag_phase};
pub use rename::rename_sections;
pub use restriction::{apply_restriction, Restriction};

/// Ordering bucket for an overlay; lower ranks apply first.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OverlayCategory {
    Common,
    Restriction,
    Phase,
    School,
}

impl OverlayCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlayCategory::Common => "common",
            OverlayCategory::Restriction => "restriction",
            OverlayCategory::Phase => "phase",
            OverlayCategory::School => "school",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayKind {
    MergeSteps {
        section: String,
        steps: Vec<WalkthroughStep>,
        #[serde(default)]
        mode: MergeMode,
    },
    RenameSections {
        mapping: BTreeMap<String, String>,
    },
    Restriction {
        restriction: Restriction,
    },
    Phase {
        phase: Phase,
    },
    TagPhase {
        sections: Vec<String>,
        phase: Phase,
    },
}

/// A named overlay with its ordering category and optional class filter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OverlaySpec {
    pub name: String,
    pub category: OverlayCategory,
    /// Classes this overlay applies to; empty means every class.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassToken>,
    #[serde(flatten)]
    pub kind: OverlayKind,
}

impl OverlaySpec {
    pub fn new(name: &str, category: OverlayCategory, kind: OverlayKind) -> Self {
        Self {
            name: name.to_string(),
            category,
            classes: Vec::new(),
            kind,
        }
    }

    pub fn restriction(restriction: Restriction) -> Self {
        Self::new(
            &format!("restriction:{}", restriction.as_str()),
            OverlayCategory::Restriction,
            OverlayKind::Restriction { restriction },
        )
    }

    pub fn phase(phase: Phase) -> Self {
        Self::new(
            &format!("phase:{}", phase.as_str()),
            OverlayCategory::Phase,
            OverlayKind::Phase { phase },
        )
    }

    pub fn applies_to(&self, class: ClassToken) -> bool {
        self.classes.is_empty() || self.classes.contains(&class)
    }

    /// Run this overlay on `script`.
    pub fn apply(&self, script: WalkthroughScript) -> WalkthroughScript {
        match &self.kind {
            OverlayKind::MergeSteps {
                section,
                steps,
                mode,
            } => merge_steps(script, section, steps, mode),
            OverlayKind::RenameSections { mapping } => rename_sections(script, mapping),
            OverlayKind::Restriction { restriction } => apply_restriction(script, *restriction),
            OverlayKind::Phase { phase } => apply_phase(script, *phase),
            OverlayKind::TagPhase { sections, phase } => tag_phase(script, sections, *phase),
        }
    }

    /// Reject specs that could never apply cleanly.
    pub fn validate_shape(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("overlay name must not be empty"));
        }
        match &self.kind {
            OverlayKind::MergeSteps {
                section,
                steps,
                mode,
            } => {
                if section.trim().is_empty() {
                    return Err(anyhow!("overlay {name}: merge_steps section must not be empty"));
                }
                if steps.is_empty() {
                    return Err(anyhow!("overlay {name}: merge_steps requires at least one step"));
                }
                for (idx, step) in steps.iter().enumerate() {
                    if step.script.trim().is_empty() {
                        return Err(anyhow!(
                            "overlay {name}: merge_steps steps[{idx}].script must not be empty"
                        ));
                    }
                    if matches!(mode, MergeMode::Replace) && step.label.is_none() {
                        return Err(anyhow!(
                            "overlay {name}: replace mode requires a label on steps[{idx}]"
                        ));
                    }
                }
                if let MergeMode::InsertAfter { anchor } = mode {
                    if anchor.trim().is_empty() {
                        return Err(anyhow!(
                            "overlay {name}: insert_after anchor must not be empty"
                        ));
                    }
                }
            }
            OverlayKind::RenameSections { mapping } => {
                for (from, to) in mapping {
                    if from.trim().is_empty() || to.trim().is_empty() {
                        return Err(anyhow!(
                            "overlay {name}: rename_sections entries must be non-empty"
                        ));
                    }
                    if from != to && mapping.contains_key(to) {
                        return Err(anyhow!(
                            "overlay {name}: rename_sections maps {from:?} to {to:?}, \
                             which is itself renamed"
                        ));
                    }
                }
            }
            OverlayKind::TagPhase { sections, .. } => {
                if sections.iter().any(|section| section.trim().is_empty()) {
                    return Err(anyhow!("overlay {name}: tag_phase sections must be non-empty"));
                }
            }
            OverlayKind::Restriction { .. } | OverlayKind::Phase { .. } => {}
        }
        Ok(())
    }
}

/// Apply overlays strictly in list order.
pub fn apply_overlays(base: WalkthroughScript, overlays: &[OverlaySpec]) -> WalkthroughScript {
    overlays.iter().fold(base, |script, overlay| {
        tracing::debug!(
            overlay = %overlay.name,
            category = overlay.category.as_str(),
            "applying walkthrough overlay"
        );
        overlay.apply(script)
    })
}
