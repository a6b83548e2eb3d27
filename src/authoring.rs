//! Operations behind the superadmin walkthrough editor.
//!
//! Operator-edited JSON is untyped until `parse_script` accepts it; the
//! writer is never called for a candidate that fails validation.
use crate::error::AuthoringError;
use crate::schema::{ClassToken, CustomWalkthroughRecord, SchoolId};
use crate::store::CustomScriptWriter;
use crate::validate::parse_script;
use serde_json::Value;

/// Validate `candidate` and upsert it as the custom script for the pair.
pub fn save_custom_script(
    writer: &dyn CustomScriptWriter,
    school: &SchoolId,
    class: ClassToken,
    candidate: &Value,
    author: &str,
    source: &str,
) -> Result<CustomWalkthroughRecord, AuthoringError> {
    let script = match parse_script(candidate) {
        Ok(script) => script,
        Err(failure) => {
            tracing::info!(
                school = %school,
                class = %class,
                problems = failure.problems.len(),
                "refused to save invalid custom walkthrough"
            );
            return Err(failure.into());
        }
    };
    let record = writer.save_custom_script(school, class, &script, author.trim(), source)?;
    Ok(record)
}

/// Drop the custom script so the pair resolves from defaults again.
pub fn reset_to_default(
    writer: &dyn CustomScriptWriter,
    school: &SchoolId,
    class: ClassToken,
) -> Result<bool, AuthoringError> {
    let removed = writer.delete_custom_script(school, class)?;
    tracing::info!(school = %school, class = %class, removed, "reset walkthrough to default");
    Ok(removed)
}
