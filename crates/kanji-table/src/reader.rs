//! Column-checked reader for delimiter-separated tables.
//!
//! A [`ColumnFile`] validates the header row against a declared set of
//! columns when it is opened, then reads data rows one at a time. Fields are
//! looked up by [`Column`] handle, so the physical column order in the file
//! does not matter.
//!
//! # Example
//!
//! ```no_run
//! use kanji_table::{ColumnFile, ColumnRegistry};
//!
//! let registry = ColumnRegistry::new();
//! let number = registry.register("Number");
//! let name = registry.register("Name");
//!
//! let mut file = ColumnFile::open("radicals.txt", &registry, &[number.clone(), name.clone()])?;
//! while file.advance()? {
//!     println!("{} {}", file.get_uint(&number, None)?, file.get(&name)?);
//! }
//! # Ok::<(), kanji_table::TableError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, trace, warn};

use crate::column::{Column, ColumnRegistry, RegistryId};
use crate::error::{ReaderId, Result, TableError};

static NEXT_READER_ID: AtomicU64 = AtomicU64::new(0);

/// Field separator used when none is configured.
pub const DEFAULT_SEPARATOR: char = '\t';

const BOM: char = '\u{feff}';

/// Options controlling how a [`ColumnFile`] reads its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFileOptions {
    /// Character separating fields. Defaults to a tab.
    pub separator: char,
    /// Accept header columns that were not declared. Defaults to false.
    pub allow_extra_columns: bool,
}

impl Default for ColumnFileOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            allow_extra_columns: false,
        }
    }
}

impl ColumnFileOptions {
    /// Set the field separator.
    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Allow or reject undeclared header columns.
    #[must_use]
    pub fn with_extra_columns(mut self, allow: bool) -> Self {
        self.allow_extra_columns = allow;
        self
    }
}

/// Forward-only reader over a table with a validated header row.
///
/// The reader owns its file until the data is exhausted (when
/// [`advance`](Self::advance) returns `false`), [`close`](Self::close) is
/// called, or it is dropped.
#[derive(Debug)]
pub struct ColumnFile {
    id: ReaderId,
    path: PathBuf,
    name: String,
    options: ColumnFileOptions,
    columns: Vec<Column>,
    registry: RegistryId,
    /// Header position per column number; only declared columns are mapped.
    positions: Vec<Option<usize>>,
    values: Vec<String>,
    current_row: u64,
    row_valid: bool,
    line: String,
    reader: Option<BufReader<File>>,
}

impl ColumnFile {
    /// Open `path` with default options (tab separated, no extra columns).
    pub fn open(
        path: impl AsRef<Path>,
        registry: &ColumnRegistry,
        columns: &[Column],
    ) -> Result<Self> {
        Self::with_options(path, registry, columns, ColumnFileOptions::default())
    }

    /// Open `path` and validate its header against `columns`.
    ///
    /// # Errors
    ///
    /// - Configuration: `columns` is empty, has duplicates, or mixes registries
    /// - Io: the file cannot be opened or the header cannot be read
    /// - Schema: the header is missing, repeats a name, has an undeclared
    ///   column (unless allowed) or lacks a declared column
    pub fn with_options(
        path: impl AsRef<Path>,
        registry: &ColumnRegistry,
        columns: &[Column],
        options: ColumnFileOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        let name = file_name(path);
        validate_columns(registry, columns).map_err(|e| e.with_file(&name))?;

        let file = File::open(path).map_err(|e| {
            TableError::io(format!("failed to open '{}': {e}", path.display()), e)
        })?;
        // Dropping the reader on any early return below closes the file.
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        let has_header = read_line(&mut reader, &mut line).map_err(|e| {
            TableError::io(format!("failed to read header: {e}"), e).with_file(&name)
        })?;
        if !has_header {
            return Err(TableError::schema("missing header row").with_file(&name));
        }
        let header = line.strip_prefix(BOM).unwrap_or(&line);
        let mut positions = vec![None; registry.len()];
        let header_len = map_header(header, columns, options, &mut positions)
            .map_err(|e| e.with_file(&name))?;

        debug!(
            file = %name,
            columns = columns.len(),
            header_columns = header_len,
            "opened column file"
        );
        Ok(Self {
            id: ReaderId(NEXT_READER_ID.fetch_add(1, Ordering::Relaxed)),
            path: path.to_path_buf(),
            name,
            options,
            columns: columns.to_vec(),
            registry: registry.id(),
            positions,
            values: vec![String::new(); header_len],
            current_row: 0,
            row_valid: false,
            line,
            reader: Some(reader),
        })
    }

    /// Identity used to mark errors raised by this reader.
    pub fn id(&self) -> ReaderId {
        self.id
    }

    /// File name without directories.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> ColumnFileOptions {
        self.options
    }

    /// Declared columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of declared columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Number of data rows consumed so far, including rejected ones.
    pub fn current_row(&self) -> u64 {
        self.current_row
    }

    /// Returns true once the file has been closed.
    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// Read the next data row.
    ///
    /// Returns `false` and closes the file when no rows remain. A row with
    /// the wrong number of fields (or one that cannot be read) fails this
    /// call only: the row counter still advances and the next call moves on
    /// to the following row.
    ///
    /// # Errors
    ///
    /// - State: the file has already been closed
    /// - Row: the row could not be read or has too few/many fields
    pub fn advance(&mut self) -> Result<bool> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(
                TableError::state(format!("file '{}' has been closed", self.name))
                    .with_origin(self.id),
            );
        };
        let read = read_line(reader, &mut self.line);
        let has_row = match read {
            Ok(has_row) => has_row,
            Err(e) => {
                self.current_row += 1;
                self.row_valid = false;
                let message = format!("failed to read row: {e}");
                return Err(self.contextual(TableError::row(message).with_source(e)));
            }
        };
        if !has_row {
            self.close();
            return Ok(false);
        }

        self.current_row += 1;
        let fields = self.line.split(self.options.separator).count();
        if fields != self.values.len() {
            self.row_valid = false;
            warn!(
                file = %self.name,
                row = self.current_row,
                expected = self.values.len(),
                found = fields,
                "rejected row"
            );
            let message = if fields < self.values.len() {
                "not enough columns"
            } else {
                "too many columns"
            };
            return Err(self.contextual(TableError::row(message)));
        }
        for (value, field) in self
            .values
            .iter_mut()
            .zip(self.line.split(self.options.separator))
        {
            value.clear();
            value.push_str(field);
        }
        self.row_valid = true;
        trace!(file = %self.name, row = self.current_row, "read row");
        Ok(true)
    }

    /// Release the underlying file. Calling this more than once is a no-op.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            debug!(file = %self.name, rows = self.current_row, "closed column file");
        }
    }

    /// Run `f` for every remaining row, threading an accumulator through.
    ///
    /// Errors returned by `f` gain this file's name and the current row
    /// unless this reader already attached them.
    pub fn process_rows<T, F>(&mut self, initial: T, mut f: F) -> Result<T>
    where
        F: FnMut(T, &Self) -> Result<T>,
    {
        let mut acc = initial;
        while self.advance()? {
            acc = f(acc, self).map_err(|e| e.contextualize(&self.name, self.current_row, self.id))?;
        }
        Ok(acc)
    }

    /// Build a Data error carrying this file's context.
    pub fn error(&self, message: impl Into<String>) -> TableError {
        self.contextual(TableError::data(message))
    }

    /// Raw text of `column` in the current row.
    ///
    /// An empty string is a valid value.
    ///
    /// # Errors
    ///
    /// - State: no row has been read yet, or the last row was rejected
    /// - Schema: `column` is unknown to this reader or was not declared
    pub fn get(&self, column: &Column) -> Result<&str> {
        if self.current_row == 0 {
            return Err(TableError::state("'advance' must be called before 'get'")
                .with_file(&self.name)
                .with_origin(self.id));
        }
        let position = self.position(column)?;
        if !self.row_valid {
            return Err(self.contextual(TableError::state("current row failed to parse")));
        }
        Ok(&self.values[position])
    }

    /// Like [`get`](Self::get) but returns `None` for an empty field.
    pub fn get_optional(&self, column: &Column) -> Result<Option<&str>> {
        Ok(Some(self.get(column)?).filter(|value| !value.is_empty()))
    }

    /// Parse `column` as a non-negative base-10 integer.
    ///
    /// When `max` is given, larger values are rejected.
    pub fn get_uint(&self, column: &Column, max: Option<u64>) -> Result<u64> {
        let raw = self.get(column)?;
        self.parse_uint(column, raw, max)
    }

    /// Like [`get_uint`](Self::get_uint) but an empty field yields `default`
    /// without any conversion or max check.
    pub fn get_uint_or(&self, column: &Column, default: u64, max: Option<u64>) -> Result<u64> {
        let raw = self.get(column)?;
        if raw.is_empty() {
            return Ok(default);
        }
        self.parse_uint(column, raw, max)
    }

    /// Like [`get_uint`](Self::get_uint) but an empty field yields `None`.
    pub fn get_optional_uint(&self, column: &Column, max: Option<u64>) -> Result<Option<u64>> {
        match self.get_optional(column)? {
            Some(raw) => self.parse_uint(column, raw, max).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_u8(&self, column: &Column) -> Result<u8> {
        self.get_narrow(column, u8::MAX)
    }

    pub fn get_u16(&self, column: &Column) -> Result<u16> {
        self.get_narrow(column, u16::MAX)
    }

    /// Parse `column` as a flag: `Y`/`T` are true, `N`/`F`/empty are false.
    pub fn get_bool(&self, column: &Column) -> Result<bool> {
        match self.get(column)? {
            "Y" | "T" => Ok(true),
            "N" | "F" | "" => Ok(false),
            raw => Err(self.value_error("convert to bool failed", column, raw)),
        }
    }

    fn get_narrow<T>(&self, column: &Column, max: T) -> Result<T>
    where
        T: TryFrom<u64>,
        u64: From<T>,
    {
        let raw = self.get(column)?;
        let limit = u64::from(max);
        let value = self.parse_uint(column, raw, Some(limit))?;
        T::try_from(value)
            .map_err(|_| self.value_error(format!("exceeded max value {limit}"), column, raw))
    }

    fn parse_uint(&self, column: &Column, raw: &str, max: Option<u64>) -> Result<u64> {
        let value = if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse::<u64>().ok()
        } else {
            None
        };
        let Some(value) = value else {
            return Err(self.value_error("convert to UInt failed", column, raw));
        };
        match max {
            Some(max) if value > max => {
                Err(self.value_error(format!("exceeded max value {max}"), column, raw))
            }
            _ => Ok(value),
        }
    }

    fn position(&self, column: &Column) -> Result<usize> {
        if column.registry() != self.registry || column.number() >= self.positions.len() {
            let err = TableError::schema(format!("unknown column '{column}'"));
            return Err(self.contextual(err));
        }
        self.positions[column.number()].ok_or_else(|| {
            self.contextual(TableError::schema(format!("invalid column '{column}'")))
        })
    }

    fn contextual(&self, err: TableError) -> TableError {
        let err = err.with_file(&self.name).with_origin(self.id);
        if self.current_row == 0 {
            err
        } else {
            err.with_row(self.current_row)
        }
    }

    /// Build a Value error for `raw` in `column` carrying this file's context.
    pub fn value_error(
        &self,
        message: impl Into<String>,
        column: &Column,
        raw: &str,
    ) -> TableError {
        self.contextual(TableError::value(message))
            .with_column(column.name())
            .with_value(raw)
    }
}

/// File name component of `path`, falling back to the whole path.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read one line without its terminator. Returns false at end of input.
fn read_line(reader: &mut impl BufRead, line: &mut String) -> io::Result<bool> {
    line.clear();
    if reader.read_line(line)? == 0 {
        return Ok(false);
    }
    if line.ends_with('\n') {
        line.pop();
    }
    // A final line may end in a bare '\r'.
    if line.ends_with('\r') {
        line.pop();
    }
    Ok(true)
}

fn validate_columns(registry: &ColumnRegistry, columns: &[Column]) -> Result<()> {
    if columns.is_empty() {
        return Err(TableError::configuration("must specify at least one column"));
    }
    let mut seen = HashSet::new();
    for column in columns {
        if column.registry() != registry.id() {
            return Err(TableError::configuration(format!(
                "column '{column}' belongs to a different registry"
            )));
        }
        if !seen.insert(column.number()) {
            return Err(TableError::configuration(format!("duplicate column '{column}'")));
        }
    }
    Ok(())
}

/// Map every declared column to its header position.
///
/// Returns the number of header fields.
fn map_header(
    header: &str,
    columns: &[Column],
    options: ColumnFileOptions,
    positions: &mut [Option<usize>],
) -> Result<usize> {
    let declared: HashMap<&str, &Column> = columns.iter().map(|c| (c.name(), c)).collect();
    let mut seen = HashSet::new();
    let mut header_len = 0;
    for (position, field) in header.split(options.separator).enumerate() {
        if !seen.insert(field) {
            return Err(TableError::schema(format!("duplicate header '{field}'")));
        }
        match declared.get(field) {
            Some(column) => positions[column.number()] = Some(position),
            None if options.allow_extra_columns => {}
            None => {
                return Err(TableError::schema(format!("unrecognized header '{field}'")));
            }
        }
        header_len = position + 1;
    }

    let mut missing: Vec<&str> = columns
        .iter()
        .filter(|column| positions[column.number()].is_none())
        .map(Column::name)
        .collect();
    missing.sort_unstable();
    match missing.as_slice() {
        [] => Ok(header_len),
        [name] => Err(TableError::schema(format!("column '{name}' not found"))),
        names => {
            let list = names
                .iter()
                .map(|name| format!("'{name}'"))
                .collect::<Vec<_>>()
                .join(", ");
            Err(TableError::schema(format!(
                "{} columns not found: {list}",
                names.len()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_table(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn columns(registry: &ColumnRegistry, names: &[&str]) -> Vec<Column> {
        registry.register_all(names)
    }

    #[test]
    fn test_read_line_strips_terminators() {
        let mut input = io::Cursor::new("a\r\nb\nc");
        let mut line = String::new();
        assert!(read_line(&mut input, &mut line).unwrap());
        assert_eq!(line, "a");
        assert!(read_line(&mut input, &mut line).unwrap());
        assert_eq!(line, "b");
        assert!(read_line(&mut input, &mut line).unwrap());
        assert_eq!(line, "c");
        assert!(!read_line(&mut input, &mut line).unwrap());
    }

    #[test]
    fn test_read_line_strips_final_carriage_return() {
        let mut input = io::Cursor::new("a\r\nb\r");
        let mut line = String::new();
        assert!(read_line(&mut input, &mut line).unwrap());
        assert_eq!(line, "a");
        assert!(read_line(&mut input, &mut line).unwrap());
        assert_eq!(line, "b");
        assert!(!read_line(&mut input, &mut line).unwrap());
    }

    #[test]
    fn test_validate_columns_rejects_foreign_registry() {
        let registry = ColumnRegistry::new();
        let other = ColumnRegistry::new();
        let err = validate_columns(&registry, &[other.register("a")]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.message(), "column 'a' belongs to a different registry");
    }

    #[test]
    fn test_map_header_any_order() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a", "b", "c"]);
        let mut positions = vec![None; registry.len()];
        let len = map_header("c\ta\tb", &cols, ColumnFileOptions::default(), &mut positions)
            .unwrap();
        assert_eq!(len, 3);
        assert_eq!(positions, vec![Some(1), Some(2), Some(0)]);
    }

    #[test]
    fn test_map_header_extra_columns() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a"]);
        let mut positions = vec![None; registry.len()];
        let err = map_header("x\ta", &cols, ColumnFileOptions::default(), &mut positions)
            .unwrap_err();
        assert_eq!(err.message(), "unrecognized header 'x'");

        let mut positions = vec![None; registry.len()];
        let options = ColumnFileOptions::default().with_extra_columns(true);
        let len = map_header("x\ta", &cols, options, &mut positions).unwrap();
        assert_eq!(len, 2);
        assert_eq!(positions, vec![Some(1)]);
    }

    #[test]
    fn test_map_header_custom_separator() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a", "b"]);
        let mut positions = vec![None; registry.len()];
        let options = ColumnFileOptions::default().with_separator(',');
        assert_eq!(map_header("b,a", &cols, options, &mut positions).unwrap(), 2);
        assert_eq!(positions, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_header_with_bom() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a", "b"]);
        let file = create_temp_table("\u{feff}a\tb\n1\t2\n");
        let mut table = ColumnFile::open(file.path(), &registry, &cols).unwrap();
        assert!(table.advance().unwrap());
        assert_eq!(table.get(&cols[0]).unwrap(), "1");
    }

    #[test]
    fn test_crlf_rows() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a", "b"]);
        let file = create_temp_table("a\tb\r\n1\t\r\n");
        let mut table = ColumnFile::open(file.path(), &registry, &cols).unwrap();
        assert!(table.advance().unwrap());
        assert_eq!(table.get(&cols[1]).unwrap(), "");
        assert!(!table.advance().unwrap());
    }

    #[test]
    fn test_crlf_last_row_without_newline() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a", "b"]);
        let file = create_temp_table("a\tb\r\n1\t2\r\n3\t4\r");
        let mut table = ColumnFile::open(file.path(), &registry, &cols).unwrap();
        assert!(table.advance().unwrap());
        assert_eq!(table.get(&cols[1]).unwrap(), "2");
        assert!(table.advance().unwrap());
        assert_eq!(table.get(&cols[1]).unwrap(), "4");
        assert!(!table.advance().unwrap());
    }

    #[test]
    fn test_invalid_utf8_row_is_skippable() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a"]);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"a\n\xff\xfe\nok\n").unwrap();
        let mut table = ColumnFile::open(file.path(), &registry, &cols).unwrap();

        let err = table.advance().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Row);
        assert!(err.message().starts_with("failed to read row: "));
        assert_eq!(err.context().row, Some(1));

        assert!(table.advance().unwrap());
        assert_eq!(table.current_row(), 2);
        assert_eq!(table.get(&cols[0]).unwrap(), "ok");
    }

    #[test]
    fn test_close_is_idempotent() {
        let registry = ColumnRegistry::new();
        let cols = columns(&registry, &["a"]);
        let file = create_temp_table("a\n1\n");
        let mut table = ColumnFile::open(file.path(), &registry, &cols).unwrap();
        table.close();
        table.close();
        assert!(table.is_closed());
        let err = table.advance().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
