use crate::schema::WalkthroughScript;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CDL license restriction that makes some inspection steps inapplicable.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Restriction {
    NoAir,
    NoFifthWheel,
    Automatic,
}

/// Fixed allowlists naming what a restriction skips.
struct RestrictionRule {
    sections: &'static [&'static str],
    labels: &'static [&'static str],
}

static NO_AIR: RestrictionRule = RestrictionRule {
    sections: &["Brakes", "Air Brake Check"],
    labels: &[],
};

static NO_FIFTH_WHEEL: RestrictionRule = RestrictionRule {
    sections: &["Coupling System"],
    labels: &[],
};

static AUTOMATIC: RestrictionRule = RestrictionRule {
    sections: &[],
    labels: &["Clutch / Gearshift", "Clutch Operation"],
};

impl Restriction {
    pub const ALL: [Restriction; 3] = [
        Restriction::NoAir,
        Restriction::NoFifthWheel,
        Restriction::Automatic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Restriction::NoAir => "no-air",
            Restriction::NoFifthWheel => "no-fifth-wheel",
            Restriction::Automatic => "automatic",
        }
    }

    fn rule(&self) -> &'static RestrictionRule {
        match self {
            Restriction::NoAir => &NO_AIR,
            Restriction::NoFifthWheel => &NO_FIFTH_WHEEL,
            Restriction::Automatic => &AUTOMATIC,
        }
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Restriction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Restriction::ALL
            .into_iter()
            .find(|restriction| restriction.as_str() == value.trim())
            .ok_or_else(|| {
                let expected = Restriction::ALL.map(|r| r.as_str()).join(", ");
                format!("unknown restriction {value:?} (expected one of {expected})")
            })
    }
}

/// Flag every step the restriction makes inapplicable with `skip = true`.
///
/// Steps stay in place so a resolved script still shows what was skipped.
pub fn apply_restriction(
    mut script: WalkthroughScript,
    restriction: Restriction,
) -> WalkthroughScript {
    let rule = restriction.rule();
    for section in &mut script {
        let whole_section = rule.sections.contains(&section.section.as_str());
        for step in &mut section.steps {
            let by_label = step
                .label
                .as_deref()
                .is_some_and(|label| rule.labels.contains(&label));
            if whole_section || by_label {
                step.skip = Some(true);
            }
        }
    }
    script
}
