//! finans-storage-json
//!
//! Filesystem-backed JSON persistence for a [`Household`], exposed to the
//! services through [`finans_core::FinanceRepository`].

use std::{
    cmp::Reverse,
    ffi::OsStr,
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, NaiveDateTime, Utc};
use finans_config::write_atomic;
use finans_core::{CoreError, CoreResult, HouseholdAccess};
use finans_domain::Household;
use thiserror::Error;

const FILE_EXTENSION: &str = "json";
const HOUSEHOLD_STEM: &str = "household";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%.3f";
const DEFAULT_RETENTION: usize = 5;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Backup `{0}` not found")]
    BackupNotFound(String),
    #[error("`{0}` is not a backup name")]
    InvalidBackupName(String),
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

/// Where the household file and its backups live.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub household_file: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    pub fn in_dir(base: &Path) -> Self {
        Self {
            household_file: base.join(format!("{HOUSEHOLD_STEM}.{FILE_EXTENSION}")),
            backup_root: base.join("backups"),
        }
    }
}

/// A backup copy of the household file.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Disambiguates backups taken within the same millisecond.
    pub sequence: u32,
    pub path: PathBuf,
}

/// Household repository persisted as a single pretty-printed JSON file.
///
/// Each write is staged on a copy of the household, written to a temporary
/// file and renamed over the previous one; only then does the in-memory
/// state advance. The previous file is kept as a uniquely named backup,
/// pruned to the configured retention.
#[derive(Debug)]
pub struct JsonRepository {
    paths: StoragePaths,
    retention: usize,
    household: Mutex<Household>,
}

impl JsonRepository {
    /// Opens the household at `paths`, starting a new one when no file exists.
    pub fn open(paths: StoragePaths) -> Result<Self, StorageError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    /// Like [`JsonRepository::open`], keeping at most `retention` backups
    /// (never fewer than one).
    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, StorageError> {
        if let Some(parent) = paths.household_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir_all(&paths.backup_root)?;
        let household = if paths.household_file.exists() {
            let household = load_household_from_path(&paths.household_file)?;
            tracing::info!(path = %paths.household_file.display(), "loaded household");
            household
        } else {
            tracing::info!(path = %paths.household_file.display(), "starting new household");
            Household::new()
        };
        Ok(Self {
            paths,
            retention: retention.max(1),
            household: Mutex::new(household),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Backups of the household file, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, StorageError> {
        if !self.paths.backup_root.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.paths.backup_root)? {
            let path = entry?.path();
            let Some(name) = path.file_name().and_then(OsStr::to_str) else {
                continue;
            };
            let Some((created_at, sequence)) = parse_backup_name(name) else {
                continue;
            };
            entries.push(BackupInfo {
                name: name.to_string(),
                created_at,
                sequence,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse((info.created_at, info.sequence)));
        Ok(entries)
    }

    /// Replaces the current household with the named backup.
    ///
    /// Only plain backup file names as returned by [`Self::list_backups`]
    /// are accepted.
    pub fn restore_backup(&self, name: &str) -> CoreResult<Household> {
        let plain = Path::new(name).file_name() == Some(OsStr::new(name));
        if !plain || parse_backup_name(name).is_none() {
            tracing::warn!(backup = name, "refused backup name");
            return Err(StorageError::InvalidBackupName(name.to_string()).into());
        }
        let path = self.paths.backup_root.join(name);
        if !path.is_file() {
            return Err(StorageError::BackupNotFound(name.to_string()).into());
        }
        let restored = load_household_from_path(&path)?;
        let snapshot = restored.clone();
        self.write(move |household| {
            *household = restored;
            Ok(())
        })?;
        tracing::info!(backup = name, "restored household backup");
        Ok(snapshot)
    }

    fn lock(&self) -> CoreResult<std::sync::MutexGuard<'_, Household>> {
        self.household
            .lock()
            .map_err(|_| CoreError::Storage("household lock poisoned".into()))
    }

    fn persist(&self, household: &Household) -> Result<(), StorageError> {
        let path = &self.paths.household_file;
        if path.exists() {
            self.backup_existing_file(path)?;
        }
        save_household_to_path(household, path)
    }

    fn backup_existing_file(&self, path: &Path) -> Result<(), StorageError> {
        fs::create_dir_all(&self.paths.backup_root)?;
        let stamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut sequence = 0;
        loop {
            let target = self.paths.backup_root.join(backup_name(&stamp, sequence));
            match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(mut backup) => {
                    io::copy(&mut File::open(path)?, &mut backup)?;
                    backup.sync_all()?;
                    return self.prune_backups();
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => sequence += 1,
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn prune_backups(&self) -> Result<(), StorageError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                tracing::warn!(backup = %entry.name, error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl HouseholdAccess for JsonRepository {
    fn read<R>(&self, view: impl FnOnce(&Household) -> R) -> CoreResult<R> {
        let guard = self.lock()?;
        Ok(view(&guard))
    }

    fn write<R>(&self, apply: impl FnOnce(&mut Household) -> CoreResult<R>) -> CoreResult<R> {
        let mut guard = self.lock()?;
        let mut staged = guard.clone();
        let result = apply(&mut staged)?;
        self.persist(&staged).map_err(|err| {
            tracing::warn!(error = %err, "failed to persist household");
            CoreError::from(err)
        })?;
        *guard = staged;
        Ok(result)
    }
}

pub fn save_household_to_path(household: &Household, path: &Path) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(household)?;
    write_atomic(path, &json)?;
    Ok(())
}

pub fn load_household_from_path(path: &Path) -> Result<Household, StorageError> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// `household_<stamp>.json`, or `household_<stamp>-<n>.json` for the n-th
/// backup sharing a stamp.
fn backup_name(stamp: &str, sequence: u32) -> String {
    if sequence == 0 {
        format!("{HOUSEHOLD_STEM}_{stamp}.{FILE_EXTENSION}")
    } else {
        format!("{HOUSEHOLD_STEM}_{stamp}-{sequence}.{FILE_EXTENSION}")
    }
}

fn parse_backup_name(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let stem = name.strip_suffix(&format!(".{FILE_EXTENSION}"))?;
    let raw = stem.strip_prefix(&format!("{HOUSEHOLD_STEM}_"))?;
    let (stamp, sequence) = match raw.split_once('-') {
        Some((stamp, sequence)) => (stamp, sequence.parse().ok()?),
        None => (raw, 0),
    };
    let created_at = NaiveDateTime::parse_from_str(stamp, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))?;
    Some((created_at, sequence))
}
