//! The loaded reference dataset.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use kanji_table::ListFile;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, info_span};

use crate::columns::Columns;
use crate::error::{DataError, Result};
use crate::kanji::{Grade, Kanji, KanjiType, load_kanji};
use crate::radical::{Radical, load_radicals};

/// Environment variable for overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "KANJI_DATA_DIR";

/// File holding the radical table.
pub const RADICALS_FILE: &str = "radicals.txt";

/// File listing kanji from most to least frequent.
pub const FREQUENCY_FILE: &str = "frequency.txt";

/// Get the default data directory.
///
/// Checks the `KANJI_DATA_DIR` environment variable first, then falls back
/// to the `data/` directory at the workspace root.
pub fn default_data_root() -> PathBuf {
    if let Ok(root) = std::env::var(DATA_DIR_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

/// Restricts which kanji a query considers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KanjiFilter {
    /// Only kanji from this list.
    pub kanji_type: Option<KanjiType>,
    /// Only Jouyou kanji taught in this grade.
    pub grade: Option<Grade>,
}

impl KanjiFilter {
    #[must_use]
    pub fn with_type(mut self, kanji_type: KanjiType) -> Self {
        self.kanji_type = Some(kanji_type);
        self
    }

    #[must_use]
    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn matches(&self, kanji: &Kanji) -> bool {
        self.kanji_type.is_none_or(|t| kanji.kanji_type() == t)
            && self.grade.is_none_or(|g| kanji.grade() == Some(g))
    }
}

/// Radicals, kanji and frequency ranks loaded from a data directory.
#[derive(Debug)]
pub struct KanjiData {
    root: PathBuf,
    radicals: Vec<Radical>,
    kanji: Vec<Kanji>,
    by_name: HashMap<String, usize>,
    frequency: ListFile,
}

impl KanjiData {
    /// Load the dataset from [`default_data_root`].
    pub fn load_default() -> Result<Self> {
        Self::load(default_data_root())
    }

    /// Load every table under `dir`.
    ///
    /// Expects `radicals.txt`, `frequency.txt` and one table per
    /// [`KanjiType`]. A kanji may only appear in one table.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let root = dir.as_ref().to_path_buf();
        let span = info_span!("load_data", root = %root.display());
        let _guard = span.enter();
        if !root.is_dir() {
            return Err(DataError::DirectoryNotFound { path: root });
        }

        let columns = Columns::new();
        let radicals = load_radicals(&root.join(RADICALS_FILE), &columns)?;
        let frequency = ListFile::load(root.join(FREQUENCY_FILE))?;

        let mut kanji: Vec<Kanji> = Vec::new();
        let mut by_name = HashMap::new();
        for kanji_type in KanjiType::ALL {
            let path = root.join(kanji_type.file_name());
            for entry in load_kanji(&path, kanji_type, &columns, &radicals, &frequency)? {
                if let Some(&first) = by_name.get(entry.name()) {
                    let first: &Kanji = &kanji[first];
                    return Err(DataError::DuplicateKanji {
                        name: entry.name().to_string(),
                        file: kanji_type.file_name().to_string(),
                        first: first.kanji_type().file_name().to_string(),
                    });
                }
                by_name.insert(entry.name().to_string(), kanji.len());
                kanji.push(entry);
            }
        }

        info!(
            radicals = radicals.len(),
            kanji = kanji.len(),
            frequency = frequency.len(),
            "loaded reference data"
        );
        Ok(Self {
            root,
            radicals,
            kanji,
            by_name,
            frequency,
        })
    }

    /// Directory the data was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn radicals(&self) -> &[Radical] {
        &self.radicals
    }

    /// Radical by Kangxi number.
    pub fn radical(&self, number: u8) -> Option<&Radical> {
        usize::from(number)
            .checked_sub(1)
            .and_then(|i| self.radicals.get(i))
    }

    /// All kanji, Jouyou first, then Jinmei, then Extra.
    pub fn kanji(&self) -> &[Kanji] {
        &self.kanji
    }

    /// Kanji by character.
    pub fn find(&self, name: &str) -> Option<&Kanji> {
        self.by_name.get(name).map(|&i| &self.kanji[i])
    }

    pub fn frequency(&self) -> &ListFile {
        &self.frequency
    }

    /// Kanji matching `filter`, in load order.
    pub fn filter(&self, filter: &KanjiFilter) -> Vec<&Kanji> {
        self.kanji.iter().filter(|k| filter.matches(k)).collect()
    }

    /// Number of kanji per list.
    pub fn type_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for kanji in &self.kanji {
            *counts.entry(kanji.kanji_type().as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of Jouyou kanji per grade.
    pub fn grade_counts(&self) -> BTreeMap<Grade, usize> {
        let mut counts = BTreeMap::new();
        for grade in self.kanji.iter().filter_map(Kanji::grade) {
            *counts.entry(grade).or_insert(0) += 1;
        }
        counts
    }

    /// A random kanji matching `filter`, or `None` if nothing matches.
    pub fn random_kanji<R: Rng + ?Sized>(&self, rng: &mut R, filter: &KanjiFilter) -> Option<&Kanji> {
        self.filter(filter).choose(rng).copied()
    }

    /// Up to `count` kanji matching `filter` in random order, without repeats.
    pub fn shuffled<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        filter: &KanjiFilter,
        count: usize,
    ) -> Vec<&Kanji> {
        let mut matches = self.filter(filter);
        matches.shuffle(rng);
        matches.truncate(count);
        matches
    }

    /// Multiple-choice options for `answer`.
    ///
    /// Returns `answer` plus up to `count - 1` other kanji whose `label`
    /// differs from the answer's and from each other, shuffled.
    pub fn choices<'a, R, F>(
        &'a self,
        rng: &mut R,
        answer: &'a Kanji,
        count: usize,
        label: F,
    ) -> Vec<&'a Kanji>
    where
        R: Rng + ?Sized,
        F: Fn(&Kanji) -> &str,
    {
        let mut candidates: Vec<&Kanji> = self
            .kanji
            .iter()
            .filter(|k| k.name() != answer.name() && label(k) != label(answer))
            .collect();
        candidates.shuffle(rng);

        let mut choices = vec![answer];
        for candidate in candidates {
            if choices.len() >= count {
                break;
            }
            if choices.iter().all(|c| label(c) != label(candidate)) {
                choices.push(candidate);
            }
        }
        choices.shuffle(rng);
        choices
    }
}
