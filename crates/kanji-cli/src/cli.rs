//! CLI argument definitions for the kanji quiz.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use kanji_data::{Grade, KanjiFilter, KanjiType};
use kanji_cli::quiz::{QuizMode, QuizOptions};

#[derive(Parser)]
#[command(
    name = "kanji-quiz",
    version,
    about = "Kanji quiz - practice meanings and readings",
    long_about = "Multiple-choice kanji quiz.\n\n\
                  Reads radical and kanji tables from a data directory \
                  (--data-dir, KANJI_DATA_DIR, or the bundled data/)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory holding radicals.txt, frequency.txt and the kanji tables.
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a multiple-choice quiz.
    Quiz(QuizArgs),

    /// Show everything known about one kanji.
    Lookup(LookupArgs),

    /// Summarize the loaded data.
    Stats(StatsArgs),
}

#[derive(Parser)]
pub struct QuizArgs {
    /// What to pick for each kanji.
    #[arg(long = "mode", value_enum, default_value = "meaning")]
    pub mode: ModeArg,

    /// Number of questions.
    #[arg(long = "count", default_value_t = 10)]
    pub count: usize,

    /// Choices per question.
    #[arg(
        long = "choices",
        default_value_t = 4,
        value_parser = clap::value_parser!(u8).range(2..=9)
    )]
    pub choices: u8,

    /// Which list to draw kanji from.
    #[arg(long = "kind", value_enum, default_value = "all")]
    pub kind: KindArg,

    /// Only Jouyou kanji taught in this grade (1-6, or S for secondary).
    #[arg(long = "grade", value_parser = parse_grade)]
    pub grade: Option<Grade>,

    /// Seed for a repeatable quiz.
    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

impl QuizArgs {
    pub fn options(&self) -> QuizOptions {
        let mut filter = KanjiFilter::default();
        if let Some(kanji_type) = self.kind.kanji_type() {
            filter = filter.with_type(kanji_type);
        }
        if let Some(grade) = self.grade {
            filter = filter.with_grade(grade);
        }
        QuizOptions {
            mode: match self.mode {
                ModeArg::Meaning => QuizMode::Meaning,
                ModeArg::Reading => QuizMode::Reading,
            },
            count: self.count,
            choices: usize::from(self.choices),
            filter,
        }
    }
}

#[derive(Parser)]
pub struct LookupArgs {
    /// The kanji to look up.
    #[arg(value_name = "KANJI")]
    pub kanji: String,
}

#[derive(Parser)]
pub struct StatsArgs {
    /// Output format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: StatsFormatArg,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Meaning,
    Reading,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Jouyou,
    Jinmei,
    Extra,
    All,
}

impl KindArg {
    fn kanji_type(self) -> Option<KanjiType> {
        match self {
            KindArg::Jouyou => Some(KanjiType::Jouyou),
            KindArg::Jinmei => Some(KanjiType::Jinmei),
            KindArg::Extra => Some(KanjiType::Extra),
            KindArg::All => None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatsFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_grade(value: &str) -> Result<Grade, String> {
    value.parse().map_err(|e: kanji_data::DataError| e.to_string())
}
