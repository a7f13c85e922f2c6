//! Library components of the `kanji-quiz` binary.

pub mod logging;
pub mod quiz;
pub mod stats;
