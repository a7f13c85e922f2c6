//! Dataset statistics for the `stats` command.

use std::collections::BTreeMap;

use kanji_data::KanjiData;
use serde::Serialize;

/// Counts describing a loaded dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStats {
    pub radicals: usize,
    pub kanji: usize,
    /// Kanji per list.
    pub by_type: BTreeMap<String, usize>,
    /// Jouyou kanji per grade.
    pub by_grade: BTreeMap<String, usize>,
    /// Kanji with a frequency rank.
    pub ranked: usize,
    /// Kanji without a frequency rank.
    pub unranked: usize,
}

impl DataStats {
    pub fn from_data(data: &KanjiData) -> Self {
        let ranked = data
            .kanji()
            .iter()
            .filter(|k| k.frequency().is_some())
            .count();
        Self {
            radicals: data.radicals().len(),
            kanji: data.kanji().len(),
            by_type: data
                .type_counts()
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect(),
            by_grade: data
                .grade_counts()
                .into_iter()
                .map(|(grade, count)| (grade.to_string(), count))
                .collect(),
            ranked,
            unranked: data.kanji().len() - ranked,
        }
    }

    /// Label/value rows for tabular output.
    pub fn rows(&self) -> Vec<(String, usize)> {
        let mut rows = vec![
            ("Radicals".to_string(), self.radicals),
            ("Kanji".to_string(), self.kanji),
        ];
        rows.extend(self.by_type.iter().map(|(kind, count)| (kind.clone(), *count)));
        rows.extend(
            self.by_grade
                .iter()
                .map(|(grade, count)| (format!("Grade {grade}"), *count)),
        );
        rows.push(("Ranked".to_string(), self.ranked));
        rows.push(("Unranked".to_string(), self.unranked));
        rows
    }
}
