//! In-memory command history with `HISTFILE`-backed persistence.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::ShellError;

/// An ordered, append-only record of previously entered non-empty lines.
#[derive(Debug, Default)]
pub struct HistoryBuffer {
    entries: Vec<String>,
    /// Number of entries already flushed by the last `-a` (or startup load).
    append_index: usize,
}

impl HistoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: String) {
        if !line.is_empty() {
            self.entries.push(line);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries to print for `history [n]`: the last `n`, or all if `n` is
    /// `None` or negative (bash-style fallback, per the reference shell).
    pub fn tail(&self, n: Option<i64>) -> &[String] {
        match n {
            Some(n) if n >= 0 => {
                let n = n as usize;
                let start = self.entries.len().saturating_sub(n);
                &self.entries[start..]
            }
            _ => &self.entries[..],
        }
    }

    /// Load newline-separated entries from `path`, skipping blank lines.
    /// A missing file is a soft error: the caller decides how to report it.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), ShellError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ShellError::Io(path.display().to_string(), e)),
        };
        for line in contents.lines() {
            if !line.is_empty() {
                self.entries.push(line.to_string());
            }
        }
        Ok(())
    }

    /// Mark every entry currently in the buffer as already persisted, so a
    /// subsequent `-a` only appends what comes after (used at startup,
    /// after a `-r` load).
    pub fn mark_all_appended(&mut self) {
        self.append_index = self.entries.len();
    }

    /// `-w <path>`: overwrite the file with every in-memory entry.
    pub fn write_all(&self, path: &Path) -> Result<(), ShellError> {
        let mut file = fs::File::create(path).map_err(|e| ShellError::Io(path.display().to_string(), e))?;
        for entry in &self.entries {
            writeln!(file, "{}", entry).map_err(|e| ShellError::Io(path.display().to_string(), e))?;
        }
        Ok(())
    }

    /// `-a <path>`: append entries with index strictly greater than the
    /// persisted marker, then advance the marker to the buffer's length.
    /// A second consecutive call with no intervening `push` appends nothing.
    pub fn append_new(&mut self, path: &Path) -> Result<(), ShellError> {
        if self.append_index < self.entries.len() {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| ShellError::Io(path.display().to_string(), e))?;
            for entry in &self.entries[self.append_index..] {
                writeln!(file, "{}", entry).map_err(|e| ShellError::Io(path.display().to_string(), e))?;
            }
        }
        self.append_index = self.entries.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");

        let mut writer = HistoryBuffer::new();
        writer.push("echo a".into());
        writer.push("echo b".into());
        writer.write_all(&path).unwrap();

        let mut reader = HistoryBuffer::new();
        reader.load_from_file(&path).unwrap();
        assert_eq!(reader.entries(), &["echo a".to_string(), "echo b".to_string()]);
    }

    #[test]
    fn load_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");
        fs::write(&path, "a\n\nb\n\n").unwrap();

        let mut buf = HistoryBuffer::new();
        buf.load_from_file(&path).unwrap();
        assert_eq!(buf.entries(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn missing_file_load_is_not_an_error() {
        let mut buf = HistoryBuffer::new();
        assert!(buf.load_from_file(Path::new("/no/such/histfile")).is_ok());
    }

    #[test]
    fn append_new_is_idempotent_with_no_intervening_pushes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");

        let mut buf = HistoryBuffer::new();
        buf.push("one".into());
        buf.append_new(&path).unwrap();
        buf.append_new(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "one\n");
    }

    #[test]
    fn append_new_only_writes_entries_past_the_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist");

        let mut buf = HistoryBuffer::new();
        buf.push("one".into());
        buf.append_new(&path).unwrap();
        buf.push("two".into());
        buf.append_new(&path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }

    #[test]
    fn tail_with_negative_or_missing_count_shows_all() {
        let mut buf = HistoryBuffer::new();
        buf.push("a".into());
        buf.push("b".into());
        buf.push("c".into());
        assert_eq!(buf.tail(None), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(buf.tail(Some(-1)), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(buf.tail(Some(2)), &["b".to_string(), "c".to_string()]);
    }
}
