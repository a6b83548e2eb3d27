//! Schema types for walkthrough scripts, persisted records, and resolutions.
//!
//! Field names follow the platform's camelCase JSON. Unknown author-supplied
//! fields are kept in `extra` so a parse/serialize round trip is lossless.

use crate::error::{PersistenceError, UnknownClassToken};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One inspection action inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkthroughStep {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub script: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub must_say: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pass_fail: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<Phase>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WalkthroughStep {
    pub fn new(label: &str, script: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            script: script.to_string(),
            must_say: None,
            required: None,
            pass_fail: None,
            skip: None,
            phase: None,
            extra: Map::new(),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    /// True when the step is excluded from the current resolution.
    pub fn is_skipped(&self) -> bool {
        self.skip == Some(true)
    }
}

/// Named group of steps; the `section` label is unique within a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkthroughSection {
    pub section: String,
    pub steps: Vec<WalkthroughStep>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WalkthroughSection {
    pub fn new(section: &str, steps: Vec<WalkthroughStep>) -> Self {
        Self {
            section: section.to_string(),
            steps,
            extra: Map::new(),
        }
    }
}

/// A complete inspection script: sections in presentation order.
pub type WalkthroughScript = Vec<WalkthroughSection>;

pub fn find_section<'a>(
    script: &'a WalkthroughScript,
    name: &str,
) -> Option<&'a WalkthroughSection> {
    script.iter().find(|section| section.section == name)
}

pub fn find_section_mut<'a>(
    script: &'a mut WalkthroughScript,
    name: &str,
) -> Option<&'a mut WalkthroughSection> {
    script.iter_mut().find(|section| section.section == name)
}

/// Vehicle/license class variant keying the defaults store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassToken {
    ClassA,
    ClassAWithoutAirElectric,
    ClassB,
    PassengerBus,
}

impl ClassToken {
    pub const ALL: [ClassToken; 4] = [
        ClassToken::ClassA,
        ClassToken::ClassAWithoutAirElectric,
        ClassToken::ClassB,
        ClassToken::PassengerBus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassToken::ClassA => "class-a",
            ClassToken::ClassAWithoutAirElectric => "class-a-without-air-electric",
            ClassToken::ClassB => "class-b",
            ClassToken::PassengerBus => "passenger-bus",
        }
    }
}

impl fmt::Display for ClassToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassToken {
    type Err = UnknownClassToken;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ClassToken::ALL
            .into_iter()
            .find(|token| token.as_str() == trimmed)
            .ok_or_else(|| UnknownClassToken {
                token: trimmed.to_string(),
            })
    }
}

/// Opaque training-school identifier.
///
/// Ids key files in the file-backed store, so separators and `..` are refused.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchoolId(String);

impl SchoolId {
    pub fn new(value: &str) -> Result<Self, InvalidSchoolId> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(InvalidSchoolId {
                value: value.to_string(),
                reason: "must not be empty",
            });
        }
        if trimmed.contains(['/', '\\']) || trimmed == "." || trimmed == ".." {
            return Err(InvalidSchoolId {
                value: value.to_string(),
                reason: "must not contain path separators or dot segments",
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SchoolId {
    type Error = InvalidSchoolId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SchoolId::new(&value)
    }
}

impl From<SchoolId> for String {
    fn from(value: SchoolId) -> Self {
        value.0
    }
}

impl FromStr for SchoolId {
    type Err = InvalidSchoolId;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SchoolId::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid school id {value:?}: {reason}")]
pub struct InvalidSchoolId {
    value: String,
    reason: &'static str,
}

/// Test phase a step belongs to; untagged steps apply to every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    PreTrip,
    SkillsTest,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::PreTrip, Phase::SkillsTest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreTrip => "pre-trip",
            Phase::SkillsTest => "skills-test",
        }
    }

    pub fn parse(value: &str) -> Option<Phase> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == value.trim())
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Phase::parse(value).ok_or_else(|| {
            let expected = Phase::ALL.map(|phase| phase.as_str()).join(", ");
            format!("unknown phase {value:?} (expected one of {expected})")
        })
    }
}

/// Persisted override for one `(school, class)` pair.
///
/// `script` stays raw JSON until the validator narrows it; records come from
/// an external store and are not trusted to be well-formed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWalkthroughRecord {
    pub script: Value,
    pub updated_at: DateTime<Utc>,
    pub updated_by: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub version: u64,
}

impl CustomWalkthroughRecord {
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn to_json_pretty(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(|source| PersistenceError::Codec {
            path: None,
            source,
        })
    }
}

/// Output of a single resolution call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedWalkthrough {
    pub script: WalkthroughScript,
    pub is_custom: bool,
    pub class_token: ClassToken,
    pub school_id: SchoolId,
    /// Overlay names in application order; empty for custom scripts.
    #[serde(default)]
    pub applied_overlays: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_version: Option<u64>,
    /// Problems of a custom script that was bypassed under soft-fail.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fallback_problems: Vec<String>,
}
