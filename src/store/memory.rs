use super::{next_record, CustomScriptReader, CustomScriptWriter};
use crate::error::PersistenceError;
use crate::schema::{ClassToken, CustomWalkthroughRecord, SchoolId, WalkthroughScript};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type RecordKey = (SchoolId, ClassToken);
type RecordMap = BTreeMap<RecordKey, CustomWalkthroughRecord>;

/// Process-local store, used by tests and embedders without a document store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<RecordMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record verbatim, bypassing validation, as an external writer could.
    pub fn insert_record(
        &self,
        school: SchoolId,
        class: ClassToken,
        record: CustomWalkthroughRecord,
    ) -> Result<(), PersistenceError> {
        self.write()?.insert((school, class), record);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, RecordMap>, PersistenceError> {
        self.records
            .read()
            .map_err(|_| PersistenceError::Backend("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RecordMap>, PersistenceError> {
        self.records
            .write()
            .map_err(|_| PersistenceError::Backend("memory store lock poisoned".to_string()))
    }
}

impl CustomScriptReader for MemoryStore {
    fn get_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
    ) -> Result<Option<CustomWalkthroughRecord>, PersistenceError> {
        Ok(self.read()?.get(&(school.clone(), class)).cloned())
    }
}

impl CustomScriptWriter for MemoryStore {
    fn save_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
        script: &WalkthroughScript,
        author: &str,
        source: &str,
    ) -> Result<CustomWalkthroughRecord, PersistenceError> {
        let mut records = self.write()?;
        let key = (school.clone(), class);
        let record = next_record(records.get(&key), script, author, source)?;
        records.insert(key, record.clone());
        Ok(record)
    }

    fn delete_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
    ) -> Result<bool, PersistenceError> {
        Ok(self.write()?.remove(&(school.clone(), class)).is_some())
    }
}
