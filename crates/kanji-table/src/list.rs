//! One-entry-per-line list files.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Result, TableError};
use crate::reader::file_name;

/// Ordered set of unique single-token entries loaded from a file.
///
/// Blank lines and lines starting with `#` are skipped; surrounding
/// whitespace is trimmed. An entry's index is its 1-based position among
/// the loaded entries.
#[derive(Debug, Clone)]
pub struct ListFile {
    name: String,
    entries: Vec<String>,
    index: HashMap<String, usize>,
}

impl ListFile {
    /// Load a list file.
    ///
    /// # Errors
    ///
    /// - Io: the file cannot be opened or read
    /// - Data: a line holds more than one token or repeats an earlier entry
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = file_name(path);
        let file = File::open(path).map_err(|e| {
            TableError::io(format!("failed to open '{}': {e}", path.display()), e)
        })?;

        let mut entries = Vec::new();
        let mut index = HashMap::new();
        for (line_index, line) in BufReader::new(file).lines().enumerate() {
            let line_number = line_index as u64 + 1;
            let line = line.map_err(|e| {
                TableError::io(format!("failed to read line: {e}"), e)
                    .with_file(&name)
                    .with_row(line_number)
            })?;
            let entry = line.trim_start_matches('\u{feff}').trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }
            if entry.split_whitespace().nth(1).is_some() {
                return Err(TableError::data("got multiple tokens")
                    .with_file(&name)
                    .with_row(line_number)
                    .with_value(entry));
            }
            if index.contains_key(entry) {
                return Err(TableError::data("duplicate entry")
                    .with_file(&name)
                    .with_row(line_number)
                    .with_value(entry));
            }
            entries.push(entry.to_string());
            index.insert(entry.to_string(), entries.len());
        }

        debug!(file = %name, entries = entries.len(), "loaded list file");
        Ok(Self {
            name,
            entries,
            index,
        })
    }

    /// File name without directories.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.index.contains_key(entry)
    }

    /// 1-based position of `entry`.
    pub fn index(&self, entry: &str) -> Option<usize> {
        self.index.get(entry).copied()
    }

    /// Entry at 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_list(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_skips_blank_and_comment_lines() {
        let file = create_temp_list("# frequency\n日\n\n  一 \n国\n");
        let list = ListFile::load(file.path()).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(list.entries(), &["日", "一", "国"]);
        assert_eq!(list.index("一"), Some(2));
        assert_eq!(list.get(3), Some("国"));
        assert_eq!(list.get(0), None);
        assert_eq!(list.get(4), None);
        assert!(list.contains("日"));
        assert!(!list.contains("月"));
    }

    #[test]
    fn test_duplicate_entry() {
        let file = create_temp_list("日\n一\n日\n");
        let err = ListFile::load(file.path()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Data);
        assert_eq!(err.message(), "duplicate entry");
        assert_eq!(err.context().row, Some(3));
        assert_eq!(err.context().value.as_deref(), Some("日"));
    }

    #[test]
    fn test_multiple_tokens() {
        let file = create_temp_list("日 月\n");
        let err = ListFile::load(file.path()).unwrap_err();
        assert_eq!(err.message(), "got multiple tokens");
    }

    #[test]
    fn test_missing_file() {
        let err = ListFile::load("/nonexistent/list.txt").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("/nonexistent/list.txt"));
    }

    #[test]
    fn test_empty_file() {
        let file = create_temp_list("");
        let list = ListFile::load(file.path()).unwrap();
        assert!(list.is_empty());
    }
}
