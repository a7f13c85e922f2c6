//! Reference table loading for the kanji quiz.
//!
//! This crate reads the delimiter-separated text tables that hold the
//! reference data (radicals, kanji lists and attributes).
//!
//! # Features
//!
//! - **Column registry**: stable numbers for column names, shared by every
//!   table that uses them
//! - **Header validation**: declared columns are matched against the header
//!   row in any order, with optional extra columns
//! - **Row iteration**: forward-only, a malformed row fails only its own
//!   `advance` call
//! - **Typed access**: unsigned integers with limits, flags and optional
//!   fields, all with file/line/column diagnostics
//! - **List files**: one unique entry per line
//!
//! # Example
//!
//! ```no_run
//! use kanji_table::{ColumnFile, ColumnRegistry};
//!
//! let registry = ColumnRegistry::new();
//! let columns = registry.register_all(&["Number", "Name", "Strokes"]);
//! let [number, name, strokes] = [&columns[0], &columns[1], &columns[2]];
//!
//! let mut file = ColumnFile::open("data/radicals.txt", &registry, &columns)?;
//! let total = file.process_rows(0u64, |total, file| {
//!     println!("{} {}", file.get_u8(number)?, file.get(name)?);
//!     Ok(total + file.get_uint(strokes, None)?)
//! })?;
//! # Ok::<(), kanji_table::TableError>(())
//! ```

mod column;
mod error;
mod list;
mod reader;

// === Column Identity ===
pub use column::{Column, ColumnRegistry};

// === Error Types ===
pub use error::{ErrorContext, ErrorKind, ReaderId, Result, TableError};

// === Readers ===
pub use list::ListFile;
pub use reader::{ColumnFile, ColumnFileOptions, DEFAULT_SEPARATOR};
