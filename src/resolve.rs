//! Walkthrough resolution.
//!
//! A resolution either returns a school's persisted custom script or computes
//! default + overlays. Both paths go through the validator before returning;
//! a computed script that fails validation is a configuration bug and is
//! reported as `ResolutionInvariantViolation`, never degraded.
use crate::defaults::DefaultsStore;
use crate::error::ResolveError;
use crate::overlay::{apply_overlays, OverlayCategory, OverlaySpec, Restriction};
use crate::registry::OverlayRegistry;
use crate::schema::{ClassToken, Phase, ResolvedWalkthrough, SchoolId};
use crate::store::CustomScriptReader;
use crate::validate::{parse_script, validate_typed};

/// Inputs for one resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub class_token: ClassToken,
    pub school_id: SchoolId,
    pub prefer_custom: bool,
    /// Fall back to defaults when the custom script is invalid.
    pub soft_fail: bool,
    pub restrictions: Vec<Restriction>,
    pub phase: Option<Phase>,
}

impl ResolveRequest {
    pub fn new(class_token: ClassToken, school_id: SchoolId) -> Self {
        Self {
            class_token,
            school_id,
            prefer_custom: true,
            soft_fail: false,
            restrictions: Vec::new(),
            phase: None,
        }
    }
}

/// Build the ordered overlay list for a computed resolution.
///
/// Candidates are gathered as registry common overlays, requested
/// restrictions, the requested phase, then registry school overlays, and
/// stable-sorted by category so each overlay lands in its category's slot
/// while keeping registration order inside a category.
pub fn plan_overlays(registry: &OverlayRegistry, request: &ResolveRequest) -> Vec<OverlaySpec> {
    let registered = registry.overlays_for(&request.school_id, request.class_token);
    let mut planned: Vec<OverlaySpec> = registered
        .iter()
        .copied()
        .filter(|overlay| overlay.category == OverlayCategory::Common)
        .cloned()
        .collect();
    planned.extend(
        request
            .restrictions
            .iter()
            .copied()
            .map(OverlaySpec::restriction),
    );
    planned.extend(request.phase.map(OverlaySpec::phase));
    planned.extend(
        registered
            .into_iter()
            .filter(|overlay| overlay.category != OverlayCategory::Common)
            .cloned(),
    );
    planned.sort_by_key(|overlay| overlay.category);
    planned
}

/// Resolution entry point over injected defaults, registry, and store.
pub struct Resolver<'a> {
    defaults: &'a DefaultsStore,
    registry: &'a OverlayRegistry,
    store: &'a dyn CustomScriptReader,
}

impl<'a> Resolver<'a> {
    pub fn new(
        defaults: &'a DefaultsStore,
        registry: &'a OverlayRegistry,
        store: &'a dyn CustomScriptReader,
    ) -> Self {
        Self {
            defaults,
            registry,
            store,
        }
    }

    pub fn resolve(&self, request: &ResolveRequest) -> Result<ResolvedWalkthrough, ResolveError> {
        let school = &request.school_id;
        let class = request.class_token;
        let mut fallback_problems = Vec::new();

        if request.prefer_custom {
            if let Some(record) = self.store.get_custom_script(school, class)? {
                match parse_script(&record.script) {
                    Ok(script) => {
                        tracing::info!(
                            school = %school,
                            class = %class,
                            version = record.version,
                            "resolved custom walkthrough"
                        );
                        return Ok(ResolvedWalkthrough {
                            script,
                            is_custom: true,
                            class_token: class,
                            school_id: school.clone(),
                            applied_overlays: Vec::new(),
                            custom_version: Some(record.version),
                            fallback_problems: Vec::new(),
                        });
                    }
                    Err(failure) if request.soft_fail => {
                        tracing::warn!(
                            school = %school,
                            class = %class,
                            version = record.version,
                            problems = ?failure.problems,
                            "custom walkthrough invalid; falling back to defaults"
                        );
                        fallback_problems = failure.problems;
                    }
                    Err(failure) => {
                        return Err(ResolveError::InvalidCustomScript {
                            school: school.clone(),
                            class,
                            problems: failure.problems,
                        });
                    }
                }
            }
        }

        let base = self.defaults.get_default(class)?;
        let overlays = plan_overlays(self.registry, request);
        let script = apply_overlays(base, &overlays);

        let report = validate_typed(&script);
        if !report.ok {
            let names: Vec<&str> = overlays.iter().map(|overlay| overlay.name.as_str()).collect();
            tracing::error!(
                school = %school,
                class = %class,
                overlays = ?names,
                problems = ?report.problems,
                "overlay pipeline produced an invalid walkthrough"
            );
            return Err(ResolveError::ResolutionInvariantViolation {
                school: school.clone(),
                class,
                problems: report.problems,
            });
        }

        tracing::info!(
            school = %school,
            class = %class,
            overlays = overlays.len(),
            "resolved default walkthrough"
        );
        Ok(ResolvedWalkthrough {
            script,
            is_custom: false,
            class_token: class,
            school_id: school.clone(),
            applied_overlays: overlays.into_iter().map(|overlay| overlay.name).collect(),
            custom_version: None,
            fallback_problems,
        })
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
