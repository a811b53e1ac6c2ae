//! Crash-safe file replacement shared by configuration and data stores.

use std::{
    ffi::OsString,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

const STAGING_SUFFIX: &str = ".tmp";

/// Replaces `path` with `data`.
///
/// The bytes are flushed to a sibling staging file first and renamed over
/// `path`, so readers see either the old or the new content, never a mix.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(path);
    let mut file = File::create(&staging)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    fs::rename(&staging, path)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(STAGING_SUFFIX);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn staging_file_sits_next_to_target() {
        assert_eq!(
            staging_path(Path::new("/data/household.json")),
            PathBuf::from("/data/household.json.tmp")
        );
    }

    #[test]
    fn replaces_content_without_leaving_staging_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("state.json");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!staging_path(&path).exists());
    }
}
