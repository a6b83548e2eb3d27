//! School overlay registry.
//!
//! The registry is plain configuration: built once (empty, in code, or from a
//! JSON file) and handed to the resolver by reference.
use crate::overlay::{OverlayCategory, OverlaySpec};
use crate::schema::{ClassToken, SchoolId};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const REGISTRY_SCHEMA_VERSION: u32 = 1;

/// On-disk registry layout.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct RegistryFile {
    pub schema_version: u32,
    #[serde(default)]
    pub common: Vec<OverlaySpec>,
    #[serde(default)]
    pub schools: BTreeMap<String, Vec<OverlaySpec>>,
}

#[derive(Debug, Clone, Default)]
pub struct OverlayRegistry {
    common: Vec<OverlaySpec>,
    schools: BTreeMap<SchoolId, Vec<OverlaySpec>>,
}

impl OverlayRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Overlays applied to every school, before restriction/phase overlays.
    pub fn with_common(mut self, overlays: Vec<OverlaySpec>) -> Result<Self> {
        for overlay in &overlays {
            overlay.validate_shape().context("common overlay")?;
        }
        self.common.extend(overlays);
        Ok(self)
    }

    pub fn with_school(mut self, school: SchoolId, overlays: Vec<OverlaySpec>) -> Result<Self> {
        for overlay in &overlays {
            overlay
                .validate_shape()
                .with_context(|| format!("overlay for school {school}"))?;
        }
        self.schools.entry(school).or_default().extend(overlays);
        Ok(self)
    }

    pub fn from_file(file: RegistryFile) -> Result<Self> {
        if file.schema_version != REGISTRY_SCHEMA_VERSION {
            return Err(anyhow!(
                "unsupported overlay registry schema_version {}",
                file.schema_version
            ));
        }
        for overlay in &file.common {
            if overlay.category != OverlayCategory::Common {
                return Err(anyhow!(
                    "common overlay {} must use category \"common\" (got {:?})",
                    overlay.name,
                    overlay.category.as_str()
                ));
            }
        }
        let mut registry = Self::empty().with_common(file.common)?;
        for (school, overlays) in file.schools {
            let school = SchoolId::new(&school)?;
            registry = registry.with_school(school, overlays)?;
        }
        Ok(registry)
    }

    /// Common overlays then school overlays that apply to `class`, in
    /// registration order. Unknown schools simply contribute nothing.
    pub fn overlays_for(&self, school: &SchoolId, class: ClassToken) -> Vec<&OverlaySpec> {
        let school_overlays = self.schools.get(school).map(Vec::as_slice).unwrap_or(&[]);
        self.common
            .iter()
            .chain(school_overlays)
            .filter(|overlay| overlay.applies_to(class))
            .collect()
    }
}

/// Load a registry from a JSON file.
pub fn load_registry(path: &Path) -> Result<OverlayRegistry> {
    let bytes =
        fs::read(path).with_context(|| format!("read overlay registry {}", path.display()))?;
    let file: RegistryFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse overlay registry JSON {}", path.display()))?;
    OverlayRegistry::from_file(file)
        .with_context(|| format!("load overlay registry {}", path.display()))
}
