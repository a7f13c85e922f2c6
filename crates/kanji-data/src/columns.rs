//! Column names used by the reference tables.

use kanji_table::{Column, ColumnRegistry};

/// Registry and handles for every column the loaders read.
#[derive(Debug)]
pub(crate) struct Columns {
    pub registry: ColumnRegistry,
    pub number: Column,
    pub name: Column,
    pub long_name: Column,
    pub radical: Column,
    pub strokes: Column,
    pub meaning: Column,
    pub reading: Column,
    pub grade: Column,
    pub year: Column,
    pub reason: Column,
    pub rare: Column,
}

impl Columns {
    pub fn new() -> Self {
        let registry = ColumnRegistry::new();
        Self {
            number: registry.register("Number"),
            name: registry.register("Name"),
            long_name: registry.register("LongName"),
            radical: registry.register("Radical"),
            strokes: registry.register("Strokes"),
            meaning: registry.register("Meaning"),
            reading: registry.register("Reading"),
            grade: registry.register("Grade"),
            year: registry.register("Year"),
            reason: registry.register("Reason"),
            rare: registry.register("Rare"),
            registry,
        }
    }
}
