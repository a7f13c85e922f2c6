//! The 214 Kangxi radicals.

use std::path::Path;

use kanji_table::ColumnFile;
use serde::{Deserialize, Serialize};

use crate::columns::Columns;
use crate::error::Result;

/// Highest radical number.
pub const MAX_RADICAL: u8 = 214;

/// Most strokes any radical has.
pub const MAX_RADICAL_STROKES: u8 = 17;

/// A radical row from `radicals.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Radical {
    /// Kangxi number (1-214).
    pub number: u8,
    /// The radical character.
    pub name: String,
    /// Descriptive English name, e.g. "sun".
    pub long_name: String,
    /// Japanese reading of the radical name.
    pub reading: String,
    pub strokes: u8,
}

/// Load radicals, which must be numbered consecutively from 1.
pub(crate) fn load_radicals(path: &Path, columns: &Columns) -> Result<Vec<Radical>> {
    let declared = [
        columns.number.clone(),
        columns.name.clone(),
        columns.long_name.clone(),
        columns.reading.clone(),
        columns.strokes.clone(),
    ];
    let mut file = ColumnFile::open(path, &columns.registry, &declared)?;
    let radicals = file.process_rows(Vec::new(), |mut radicals: Vec<Radical>, file| {
        let number = file.get_uint(&columns.number, Some(u64::from(MAX_RADICAL)))?;
        let expected = radicals.len() as u64 + 1;
        if number != expected {
            return Err(file.error(format!(
                "radical number {number} out of order, expected {expected}"
            )));
        }
        let strokes = file.get_u8(&columns.strokes)?;
        if strokes > MAX_RADICAL_STROKES {
            let raw = file.get(&columns.strokes)?;
            return Err(file.value_error(
                format!("exceeded max value {MAX_RADICAL_STROKES}"),
                &columns.strokes,
                raw,
            ));
        }
        radicals.push(Radical {
            number: file.get_u8(&columns.number)?,
            name: file.get(&columns.name)?.to_string(),
            long_name: file.get(&columns.long_name)?.to_string(),
            reading: file.get(&columns.reading)?.to_string(),
            strokes,
        });
        Ok(radicals)
    })?;
    tracing::debug!(count = radicals.len(), "loaded radicals");
    Ok(radicals)
}
