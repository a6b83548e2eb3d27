use super::{next_record, CustomScriptReader, CustomScriptWriter};
use crate::error::PersistenceError;
use crate::schema::{ClassToken, CustomWalkthroughRecord, SchoolId, WalkthroughScript};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// One JSON document per `(school, class)` at `<root>/<school>/<class>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the record path for a `(school, class)` pair.
    pub fn record_path(&self, school: &SchoolId, class: ClassToken) -> PathBuf {
        self.root
            .join(school.as_str())
            .join(format!("{}.json", class.as_str()))
    }

    fn read_record(
        &self,
        path: &Path,
    ) -> Result<Option<CustomWalkthroughRecord>, PersistenceError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        CustomWalkthroughRecord::from_json(&bytes)
            .map(Some)
            .map_err(|source| PersistenceError::Codec {
                path: Some(path.to_path_buf()),
                source,
            })
    }

    /// Write through a sibling temp file and rename so readers never see a
    /// partial record.
    fn write_record(
        &self,
        path: &Path,
        record: &CustomWalkthroughRecord,
    ) -> Result<(), PersistenceError> {
        let io_err = |source: std::io::Error| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        };
        let parent = path
            .parent()
            .ok_or_else(|| PersistenceError::Backend(format!("{} has no parent", path.display())))?;
        fs::create_dir_all(parent).map_err(io_err)?;
        let text = record.to_json_pretty()?;
        let mut staged = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        staged.write_all(text.as_bytes()).map_err(io_err)?;
        staged.write_all(b"\n").map_err(io_err)?;
        staged.persist(path).map_err(|err| io_err(err.error))?;
        Ok(())
    }
}

impl CustomScriptReader for FileStore {
    fn get_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
    ) -> Result<Option<CustomWalkthroughRecord>, PersistenceError> {
        self.read_record(&self.record_path(school, class))
    }
}

impl CustomScriptWriter for FileStore {
    fn save_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
        script: &WalkthroughScript,
        author: &str,
        source: &str,
    ) -> Result<CustomWalkthroughRecord, PersistenceError> {
        let path = self.record_path(school, class);
        // An unreadable previous record is reported, not overwritten.
        let previous = self.read_record(&path)?;
        let record = next_record(previous.as_ref(), script, author, source)?;
        self.write_record(&path, &record)?;
        tracing::info!(
            school = %school,
            class = %class,
            version = record.version,
            path = %path.display(),
            "saved custom walkthrough"
        );
        Ok(record)
    }

    fn delete_custom_script(
        &self,
        school: &SchoolId,
        class: ClassToken,
    ) -> Result<bool, PersistenceError> {
        let path = self.record_path(school, class);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PersistenceError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{WalkthroughSection, WalkthroughStep};

    fn school() -> SchoolId {
        SchoolId::new("school1").expect("school id")
    }

    fn script() -> WalkthroughScript {
        vec![WalkthroughSection::new(
            "Brakes",
            vec![WalkthroughStep::new("Slack Adjuster", "Under one inch of play.")],
        )]
    }

    #[test]
    fn missing_record_reads_as_none() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().to_path_buf());
        let record = store
            .get_custom_script(&school(), ClassToken::ClassA)
            .expect("read");
        assert!(record.is_none());
        assert!(!store
            .delete_custom_script(&school(), ClassToken::ClassA)
            .expect("delete"));
    }

    #[test]
    fn save_then_read_bumps_version() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().join("custom"));
        let first = store
            .save_custom_script(&school(), ClassToken::ClassA, &script(), "op@example.com", "test")
            .expect("first save");
        assert_eq!(first.version, 1);
        let second = store
            .save_custom_script(
                &school(),
                ClassToken::ClassA,
                &Vec::new(),
                "other@example.com",
                "test",
            )
            .expect("second save");
        assert_eq!(second.version, 2);

        let loaded = store
            .get_custom_script(&school(), ClassToken::ClassA)
            .expect("read")
            .expect("record present");
        assert_eq!(loaded, second);
        assert_eq!(loaded.script, serde_json::json!([]));
        assert_eq!(loaded.updated_by, "other@example.com");
        assert!(store
            .record_path(&school(), ClassToken::ClassA)
            .ends_with("school1/class-a.json"));
    }

    #[test]
    fn corrupt_record_is_a_codec_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().to_path_buf());
        let path = store.record_path(&school(), ClassToken::ClassB);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, b"{ not json").expect("write corrupt");
        let err = store
            .get_custom_script(&school(), ClassToken::ClassB)
            .expect_err("corrupt record");
        assert!(matches!(err, PersistenceError::Codec { path: Some(_), .. }));
    }

    #[test]
    fn save_over_corrupt_record_fails_and_keeps_it() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().to_path_buf());
        for _ in 0..3 {
            store
                .save_custom_script(&school(), ClassToken::ClassB, &script(), "op", "test")
                .expect("save");
        }
        let path = store.record_path(&school(), ClassToken::ClassB);
        fs::write(&path, b"{ torn").expect("write corrupt");

        let err = store
            .save_custom_script(&school(), ClassToken::ClassB, &script(), "op", "test")
            .expect_err("corrupt previous record");
        assert!(matches!(err, PersistenceError::Codec { path: Some(_), .. }));
        assert_eq!(fs::read(&path).expect("read back"), b"{ torn");

        assert!(store
            .delete_custom_script(&school(), ClassToken::ClassB)
            .expect("delete"));
        let fresh = store
            .save_custom_script(&school(), ClassToken::ClassB, &script(), "op", "test")
            .expect("save after reset");
        assert_eq!(fresh.version, 1);
    }

    #[test]
    fn delete_removes_record() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileStore::new(dir.path().to_path_buf());
        store
            .save_custom_script(&school(), ClassToken::ClassB, &script(), "op", "test")
            .expect("save");
        assert!(store
            .delete_custom_script(&school(), ClassToken::ClassB)
            .expect("delete"));
        assert!(store
            .get_custom_script(&school(), ClassToken::ClassB)
            .expect("read")
            .is_none());
    }
}
