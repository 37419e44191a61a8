use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use crs_engine::ledger::{
    advances_token, CandidateId, CandidateRecord, CandidateRepository, RepositoryError,
};
use fs4::FileExt;
use tempfile::NamedTempFile;

type Records = BTreeMap<String, CandidateRecord>;

/// Candidate records kept in a single JSON document keyed by candidate id.
///
/// Every operation reloads the document under an exclusive lock on a sibling
/// `<store>.lock` file, held from the read through the replacing write. Separate `crs`
/// processes therefore serialize their read-check-write cycles, and the `last_updated`
/// check rejects writers that read an older record.
#[derive(Debug)]
pub struct FileCandidateRepository {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileCandidateRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn with_records<T>(
        &self,
        operation: impl FnOnce(&mut Records) -> Result<(T, bool), RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self
            .guard
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        // Released when the handle drops.
        let _lock = self.lock_exclusive()?;

        let mut records = self.read()?;
        let (value, dirty) = operation(&mut records)?;
        if dirty {
            self.write(&records)?;
        }
        Ok(value)
    }

    fn lock_exclusive(&self) -> Result<File, RepositoryError> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|err| self.unavailable("open lock for", err))?;
        FileExt::lock_exclusive(&file).map_err(|err| self.unavailable("lock", err))?;
        Ok(file)
    }

    fn read(&self) -> Result<Records, RepositoryError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Records::new()),
            Err(err) => return Err(self.unavailable("read", err)),
        };
        serde_json::from_reader(BufReader::new(file)).map_err(|err| self.unavailable("parse", err))
    }

    /// Stage into a uniquely named file in the store's directory, then rename it over
    /// the store so a failed write never truncates it.
    fn write(&self, records: &Records) -> Result<(), RepositoryError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging =
            NamedTempFile::new_in(directory).map_err(|err| self.unavailable("stage", err))?;
        let mut writer = BufWriter::new(staging);
        serde_json::to_writer_pretty(&mut writer, records)
            .map_err(|err| self.unavailable("serialize", err))?;
        let staging = writer
            .into_inner()
            .map_err(|err| self.unavailable("write", err.error()))?;
        staging
            .persist(&self.path)
            .map_err(|err| self.unavailable("replace", err))?;
        Ok(())
    }

    fn unavailable(&self, action: &str, err: impl std::fmt::Display) -> RepositoryError {
        RepositoryError::Unavailable(format!(
            "failed to {action} {}: {err}",
            self.path.display()
        ))
    }
}

impl CandidateRepository for FileCandidateRepository {
    fn insert(&self, id: &CandidateId, record: CandidateRecord) -> Result<(), RepositoryError> {
        self.with_records(|records| {
            if records.contains_key(&id.0) {
                return Err(RepositoryError::AlreadyExists(id.clone()));
            }
            records.insert(id.0.clone(), record);
            Ok(((), true))
        })
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        self.with_records(|records| Ok((records.get(&id.0).cloned(), false)))
    }

    fn update(
        &self,
        id: &CandidateId,
        record: CandidateRecord,
        expected_last_updated: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.with_records(|records| {
            let stored = records
                .get_mut(&id.0)
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
            if !advances_token(stored, &record, expected_last_updated) {
                return Err(RepositoryError::Conflict(id.clone()));
            }
            *stored = record;
            Ok(((), true))
        })
    }

    fn list(&self) -> Result<Vec<CandidateId>, RepositoryError> {
        self.with_records(|records| Ok((records.keys().cloned().map(CandidateId).collect(), false)))
    }
}
