//! Resolves a bare command name to an executable path by scanning `PATH`.

use std::ffi::CString;
use std::path::{Path, PathBuf};

/// An ordered list of directories to search for executables, derived from
/// the `PATH` environment variable.
#[derive(Debug, Clone)]
pub struct PathList {
    dirs: Vec<PathBuf>,
}

impl PathList {
    pub fn from_env_value(value: &str) -> Self {
        let dirs = std::env::split_paths(value)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve `name` to an absolute executable path.
    ///
    /// If `name` contains a path separator it is used as-is (checked for
    /// existence and execute permission); otherwise each PATH entry is
    /// tried in order and the first executable regular file wins.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if name.contains('/') {
            let path = PathBuf::from(name);
            return is_executable_file(&path).then_some(path);
        }
        for dir in &self.dirs {
            let candidate = dir.join(name);
            if is_executable_file(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// List every executable name visible anywhere on PATH, in scan order,
    /// deduplicated so the first PATH hit for a name wins. Used by the
    /// completer.
    pub fn all_executable_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut names = Vec::new();
        for dir in &self.dirs {
            let Ok(entries) = std::fs::read_dir(dir) else { continue };
            for entry in entries.filter_map(|e| e.ok()) {
                let Some(name) = entry.file_name().to_str().map(str::to_string) else { continue };
                let path = entry.path();
                if is_executable_file(&path) && seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }
        names
    }
}

fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Ok(c_path) = CString::new(path.as_os_str().as_encoded_bytes()) else { return false };
    // SAFETY: c_path is a valid NUL-terminated byte string and access() only
    // reads it; no pointers escape this call.
    unsafe { libc::access(c_path.as_ptr(), libc::X_OK) == 0 }
}
