//! Capability-based filesystem helpers for locating and resetting database
//! files.
//!
//! All helpers resolve an ambient directory with `cap-std` and then operate
//! relative to it, so callers never touch paths outside the directory they
//! name.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open the parent directory of `path` and return it together with the file
/// name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Create every missing directory above `path`.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Report whether `path` exists and is a regular file.
///
/// A missing parent directory is reported as `Ok(false)`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Delete the file at `path`, returning whether anything was removed.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use rideshare_fs::remove_file_if_exists;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let path = Utf8PathBuf::from_path_buf(dir.path().join("rides.db")).expect("utf-8 path");
/// std::fs::write(&path, b"stale").expect("write file");
///
/// assert!(remove_file_if_exists(&path).expect("remove file"));
/// assert!(!remove_file_if_exists(&path).expect("second removal is a no-op"));
/// ```
pub fn remove_file_if_exists(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.remove_file(name.as_str()) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Split `parent` into an ambient base directory and the path below it.
pub fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_parent = parent.as_std_path();
    let base = match std_parent.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(format!("{prefix}{}", std::path::MAIN_SEPARATOR))
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };

    let relative = if base.as_str() == "." {
        parent.to_path_buf()
    } else {
        parent
            .strip_prefix(&base)
            .map_err(|_| io::Error::other(format!("failed to strip {base} from {parent}")))?
            .to_path_buf()
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8(dir: &TempDir, relative: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(relative)).expect("utf-8 path")
    }

    #[rstest]
    fn creates_nested_parent_directories(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "a/b/rides.db");
        ensure_parent_dir(&path).expect("create parents");
        assert!(temp_dir.path().join("a/b").is_dir());
    }

    #[rstest]
    fn ensure_parent_dir_accepts_bare_file_name() {
        ensure_parent_dir(Utf8Path::new("rides.db")).expect("nothing to create");
    }

    #[rstest]
    fn file_is_file_distinguishes_directories(temp_dir: TempDir) {
        let file = utf8(&temp_dir, "rides.db");
        std::fs::write(&file, b"x").expect("write file");
        let dir = utf8(&temp_dir, "nested");
        std::fs::create_dir(&dir).expect("create dir");

        assert!(file_is_file(&file).expect("inspect file"));
        assert!(!file_is_file(&dir).expect("inspect dir"));
        assert!(!file_is_file(&utf8(&temp_dir, "missing.db")).expect("inspect missing"));
    }

    #[rstest]
    fn removing_under_missing_directory_is_a_no_op(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "absent/rides.db");
        assert!(!remove_file_if_exists(&path).expect("no-op removal"));
    }

    #[rstest]
    fn removes_existing_file(temp_dir: TempDir) {
        let path = utf8(&temp_dir, "rides.db");
        std::fs::write(&path, b"old").expect("write file");
        assert!(remove_file_if_exists(&path).expect("remove"));
        assert!(!path.exists());
    }
}
