//! Kanji entries and the tables they are loaded from.
//!
//! Every kanji shares the same [`KanjiFields`]; what differs between the
//! source lists is captured by the closed [`KanjiKind`] set:
//!
//! - **Jouyou**: the official "regular use" list, taught by school grade
//! - **Jinmei**: additional kanji approved for use in personal names
//! - **Extra**: anything else the quiz knows about

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use kanji_table::{Column, ColumnFile, ListFile};
use serde::{Deserialize, Deserializer, Serialize};

use crate::columns::Columns;
use crate::error::{DataError, Result};
use crate::radical::{MAX_RADICAL, Radical};

/// Most strokes a kanji may have.
pub const MAX_STROKES: u8 = 50;

/// School grade a Jouyou kanji is taught in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    /// Taught in secondary school.
    Secondary,
}

impl Grade {
    /// Value as written in `jouyou.txt`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::G1 => "1",
            Grade::G2 => "2",
            Grade::G3 => "3",
            Grade::G4 => "4",
            Grade::G5 => "5",
            Grade::G6 => "6",
            Grade::Secondary => "S",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1" => Ok(Grade::G1),
            "2" => Ok(Grade::G2),
            "3" => Ok(Grade::G3),
            "4" => Ok(Grade::G4),
            "5" => Ok(Grade::G5),
            "6" => Ok(Grade::G6),
            "S" => Ok(Grade::Secondary),
            _ => Err(DataError::InvalidValue {
                field: "grade",
                value: s.to_string(),
            }),
        }
    }
}

/// Why a Jinmei kanji was approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JinmeiReason {
    /// Commonly used in names.
    Names,
    /// Common in print.
    Print,
    /// Variant of a Jouyou kanji.
    Variant,
    /// Moved from the Jouyou list.
    Moved,
    /// Simplified form.
    Simple,
    Other,
}

impl JinmeiReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            JinmeiReason::Names => "Names",
            JinmeiReason::Print => "Print",
            JinmeiReason::Variant => "Variant",
            JinmeiReason::Moved => "Moved",
            JinmeiReason::Simple => "Simple",
            JinmeiReason::Other => "Other",
        }
    }
}

impl fmt::Display for JinmeiReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JinmeiReason {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Names" => Ok(JinmeiReason::Names),
            "Print" => Ok(JinmeiReason::Print),
            "Variant" => Ok(JinmeiReason::Variant),
            "Moved" => Ok(JinmeiReason::Moved),
            "Simple" => Ok(JinmeiReason::Simple),
            "Other" => Ok(JinmeiReason::Other),
            _ => Err(DataError::InvalidValue {
                field: "reason",
                value: s.to_string(),
            }),
        }
    }
}

/// Which list a kanji comes from, without its list-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KanjiType {
    Jouyou,
    Jinmei,
    Extra,
}

impl KanjiType {
    pub const ALL: [KanjiType; 3] = [KanjiType::Jouyou, KanjiType::Jinmei, KanjiType::Extra];

    /// Name of the table file this type is loaded from.
    pub fn file_name(&self) -> &'static str {
        match self {
            KanjiType::Jouyou => "jouyou.txt",
            KanjiType::Jinmei => "jinmei.txt",
            KanjiType::Extra => "extra.txt",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KanjiType::Jouyou => "Jouyou",
            KanjiType::Jinmei => "Jinmei",
            KanjiType::Extra => "Extra",
        }
    }
}

impl fmt::Display for KanjiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields every kanji has regardless of its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanjiFields {
    /// Position within its source table (1-based).
    pub number: u16,
    /// The kanji character.
    pub name: String,
    /// Kangxi radical number.
    pub radical: u8,
    pub strokes: u8,
    pub meaning: String,
    /// Readings, comma separated (on'yomi in katakana, kun'yomi in hiragana).
    pub reading: String,
    /// Rank in the frequency list, if listed.
    pub frequency: Option<usize>,
}

/// List-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KanjiKind {
    Jouyou { grade: Grade, year: Option<u16> },
    Jinmei { reason: JinmeiReason, year: Option<u16> },
    Extra { rare: bool },
}

/// A validated kanji entry.
///
/// Deserializing checks the same rules as [`Kanji::new`], except that the
/// radical only has to be a valid Kangxi number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kanji {
    fields: KanjiFields,
    kind: KanjiKind,
}

#[derive(Deserialize)]
struct KanjiRecord {
    fields: KanjiFields,
    kind: KanjiKind,
}

impl<'de> Deserialize<'de> for Kanji {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let KanjiRecord { fields, kind } = KanjiRecord::deserialize(deserializer)?;
        Self::validated(fields, kind, |number| (1..=MAX_RADICAL).contains(&number))
            .map_err(serde::de::Error::custom)
    }
}

impl Kanji {
    /// Validate and build a kanji.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::InvalidKanji`] if the name is not exactly one
    /// character, the stroke count is outside 1-50, or the radical is not
    /// one of `radicals`.
    pub fn new(fields: KanjiFields, kind: KanjiKind, radicals: &[Radical]) -> Result<Self> {
        Self::validated(fields, kind, |number| {
            radicals.iter().any(|r| r.number == number)
        })
    }

    fn validated(
        fields: KanjiFields,
        kind: KanjiKind,
        radical_exists: impl Fn(u8) -> bool,
    ) -> Result<Self> {
        if fields.name.chars().count() != 1 {
            return Err(DataError::invalid_kanji(
                &fields.name,
                "name must be a single character",
            ));
        }
        if fields.strokes == 0 || fields.strokes > MAX_STROKES {
            return Err(DataError::invalid_kanji(
                &fields.name,
                format!("strokes must be between 1 and {MAX_STROKES}"),
            ));
        }
        if !radical_exists(fields.radical) {
            return Err(DataError::invalid_kanji(
                &fields.name,
                format!("unknown radical {}", fields.radical),
            ));
        }
        let kanji = Self { fields, kind };
        if kanji.year() == Some(0) {
            return Err(DataError::invalid_kanji(kanji.name(), "year must not be 0"));
        }
        Ok(kanji)
    }

    pub fn fields(&self) -> &KanjiFields {
        &self.fields
    }

    pub fn kind(&self) -> &KanjiKind {
        &self.kind
    }

    pub fn kanji_type(&self) -> KanjiType {
        match self.kind {
            KanjiKind::Jouyou { .. } => KanjiType::Jouyou,
            KanjiKind::Jinmei { .. } => KanjiType::Jinmei,
            KanjiKind::Extra { .. } => KanjiType::Extra,
        }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn meaning(&self) -> &str {
        &self.fields.meaning
    }

    pub fn reading(&self) -> &str {
        &self.fields.reading
    }

    pub fn strokes(&self) -> u8 {
        self.fields.strokes
    }

    pub fn radical(&self) -> u8 {
        self.fields.radical
    }

    pub fn frequency(&self) -> Option<usize> {
        self.fields.frequency
    }

    /// School grade, for Jouyou kanji only.
    pub fn grade(&self) -> Option<Grade> {
        match self.kind {
            KanjiKind::Jouyou { grade, .. } => Some(grade),
            _ => None,
        }
    }

    /// Year the kanji was added to its list, when known.
    pub fn year(&self) -> Option<u16> {
        match self.kind {
            KanjiKind::Jouyou { year, .. } | KanjiKind::Jinmei { year, .. } => year,
            KanjiKind::Extra { .. } => None,
        }
    }
}

/// Load one kanji table.
///
/// Rows must be numbered consecutively from 1. Each row is validated as it
/// is read; the first invalid row stops the load.
pub(crate) fn load_kanji(
    path: &Path,
    kanji_type: KanjiType,
    columns: &Columns,
    radicals: &[Radical],
    frequency: &ListFile,
) -> Result<Vec<Kanji>> {
    let mut declared = vec![
        columns.number.clone(),
        columns.name.clone(),
        columns.radical.clone(),
        columns.strokes.clone(),
        columns.meaning.clone(),
        columns.reading.clone(),
    ];
    match kanji_type {
        KanjiType::Jouyou => declared.extend([columns.grade.clone(), columns.year.clone()]),
        KanjiType::Jinmei => declared.extend([columns.reason.clone(), columns.year.clone()]),
        KanjiType::Extra => declared.push(columns.rare.clone()),
    }

    let mut file = ColumnFile::open(path, &columns.registry, &declared)?;
    let kanji = file.process_rows(Vec::new(), |mut kanji: Vec<Kanji>, file| {
        let number = file.get_u16(&columns.number)?;
        let expected = kanji.len() + 1;
        if usize::from(number) != expected {
            return Err(file.error(format!(
                "kanji number {number} out of order, expected {expected}"
            )));
        }
        let name = file.get(&columns.name)?;
        let fields = KanjiFields {
            number,
            name: name.to_string(),
            radical: file.get_u8(&columns.radical)?,
            strokes: file.get_u8(&columns.strokes)?,
            meaning: file.get(&columns.meaning)?.to_string(),
            reading: file.get(&columns.reading)?.to_string(),
            frequency: frequency.index(name),
        };
        let kind = match kanji_type {
            KanjiType::Jouyou => KanjiKind::Jouyou {
                grade: parse_field(file, &columns.grade)?,
                year: optional_year(file, &columns.year)?,
            },
            KanjiType::Jinmei => KanjiKind::Jinmei {
                reason: parse_field(file, &columns.reason)?,
                year: optional_year(file, &columns.year)?,
            },
            KanjiType::Extra => KanjiKind::Extra {
                rare: file.get_bool(&columns.rare)?,
            },
        };
        let entry = Kanji::new(fields, kind, radicals).map_err(|e| file.error(e.to_string()))?;
        kanji.push(entry);
        Ok(kanji)
    })?;
    tracing::debug!(kind = %kanji_type, count = kanji.len(), "loaded kanji table");
    Ok(kanji)
}

fn parse_field<T>(file: &ColumnFile, column: &Column) -> kanji_table::Result<T>
where
    T: FromStr<Err = DataError>,
{
    let raw = file.get(column)?;
    raw.parse()
        .map_err(|_| file.value_error(format!("invalid {}", column.name()), column, raw))
}

fn optional_year(file: &ColumnFile, column: &Column) -> kanji_table::Result<Option<u16>> {
    match file.get_optional(column)? {
        Some(_) => file.get_u16(column).map(Some),
        None => Ok(None),
    }
}
