//! Custom walkthrough persistence boundary.
//!
//! The resolver only reads through `CustomScriptReader`; the authoring
//! operations write through `CustomScriptWriter`. Retry and timeout policy
//! belong to the implementation, never to the core.
mod file;
mod memory;

use crate::error::PersistenceError;
use crate::schema::{ClassToken, CustomWalkthroughRecord, SchoolId, WalkthroughScript};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Source tag recorded when the superadmin editor saves a script.
pub const EDITOR_SOURCE: &str = "superadmin-editor";

pub trait CustomScriptReader {
    fn get_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
    ) -> Result<Option<CustomWalkthroughRecord>, PersistenceError>;
}

pub trait CustomScriptWriter {
    /// Upsert the script for `(school, class)`. Last writer wins; the stored
    /// `version` is advisory and only counts saves.
    fn save_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
        script: &WalkthroughScript,
        author: &str,
        source: &str,
    ) -> Result<CustomWalkthroughRecord, PersistenceError>;

    /// Remove the record; returns whether one existed.
    fn delete_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
    ) -> Result<bool, PersistenceError>;
}

fn encode_script(script: &WalkthroughScript) -> Result<serde_json::Value, PersistenceError> {
    serde_json::to_value(script).map_err(|source| PersistenceError::Codec { path: None, source })
}

fn next_record(
    previous: Option<&CustomWalkthroughRecord>,
    script: &WalkthroughScript,
    author: &str,
    source: &str,
) -> Result<CustomWalkthroughRecord, PersistenceError> {
    Ok(CustomWalkthroughRecord {
        script: encode_script(script)?,
        updated_at: chrono::Utc::now(),
        updated_by: author.to_string(),
        source: source.to_string(),
        version: previous.map_or(1, |record| record.version.saturating_add(1)),
    })
}
