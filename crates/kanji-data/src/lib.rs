//! Kanji reference data.
//!
//! Loads the radical table, the Jouyou/Jinmei/Extra kanji tables and the
//! frequency list from a data directory, validates every entry, and answers
//! the lookups and random queries the quiz needs.
//!
//! # Example
//!
//! ```no_run
//! use kanji_data::{KanjiData, KanjiFilter, KanjiType};
//! use rand::SeedableRng;
//!
//! let data = KanjiData::load_default()?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let filter = KanjiFilter::default().with_type(KanjiType::Jouyou);
//! if let Some(kanji) = data.random_kanji(&mut rng, &filter) {
//!     println!("{} means {}", kanji.name(), kanji.meaning());
//! }
//! # Ok::<(), kanji_data::DataError>(())
//! ```

mod columns;
mod data;
mod error;
mod kanji;
mod radical;

// === Error Types ===
pub use error::{DataError, Result};

// === Dataset ===
pub use data::{
    DATA_DIR_ENV_VAR, FREQUENCY_FILE, KanjiData, KanjiFilter, RADICALS_FILE, default_data_root,
};

// === Model Types ===
pub use kanji::{Grade, JinmeiReason, Kanji, KanjiFields, KanjiKind, KanjiType, MAX_STROKES};
pub use radical::{MAX_RADICAL, Radical};
