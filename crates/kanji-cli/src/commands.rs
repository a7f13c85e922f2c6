use std::io;
use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, info_span};

use kanji_cli::quiz::{build_questions, run_quiz as ask_questions};
use kanji_cli::stats::DataStats;
use kanji_data::{Kanji, KanjiData, KanjiKind};

use crate::cli::{LookupArgs, QuizArgs, StatsArgs, StatsFormatArg};

fn load_data(data_dir: &Path) -> Result<KanjiData> {
    KanjiData::load(data_dir)
        .with_context(|| format!("load kanji data from {}", data_dir.display()))
}

pub fn run_quiz(data_dir: &Path, args: &QuizArgs) -> Result<()> {
    let data = load_data(data_dir)?;
    let options = args.options();
    let span = info_span!("quiz", mode = ?options.mode, count = options.count);
    let _guard = span.enter();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let questions = build_questions(&data, &options, &mut rng);
    if questions.is_empty() {
        bail!("no kanji match the selected kind and grade");
    }
    info!(questions = questions.len(), "starting quiz");

    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    ask_questions(&questions, options.mode, &mut input, &mut output).context("run quiz")?;
    Ok(())
}

pub fn run_lookup(data_dir: &Path, args: &LookupArgs) -> Result<()> {
    let data = load_data(data_dir)?;
    let Some(kanji) = data.find(args.kanji.trim()) else {
        bail!("kanji '{}' not found", args.kanji);
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    for (field, value) in lookup_rows(&data, kanji) {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    println!("{table}");
    Ok(())
}

fn lookup_rows(data: &KanjiData, kanji: &Kanji) -> Vec<(&'static str, String)> {
    let radical = match data.radical(kanji.radical()) {
        Some(radical) => format!(
            "{} {} ({}, {})",
            radical.number, radical.name, radical.long_name, radical.reading
        ),
        None => kanji.radical().to_string(),
    };
    let mut rows = vec![
        ("Kanji", kanji.name().to_string()),
        ("Type", kanji.kanji_type().to_string()),
        ("Number", kanji.fields().number.to_string()),
        ("Radical", radical),
        ("Strokes", kanji.strokes().to_string()),
        ("Meaning", kanji.meaning().to_string()),
        ("Reading", kanji.reading().to_string()),
    ];
    match kanji.kind() {
        KanjiKind::Jouyou { grade, .. } => rows.push(("Grade", grade.to_string())),
        KanjiKind::Jinmei { reason, .. } => rows.push(("Reason", reason.to_string())),
        KanjiKind::Extra { rare } => {
            rows.push(("Rare", if *rare { "yes" } else { "no" }.to_string()));
        }
    }
    if let Some(year) = kanji.year() {
        rows.push(("Year", year.to_string()));
    }
    let frequency = kanji
        .frequency()
        .map_or_else(|| "-".to_string(), |rank| rank.to_string());
    rows.push(("Frequency", frequency));
    rows
}

pub fn run_stats(data_dir: &Path, args: &StatsArgs) -> Result<()> {
    let data = load_data(data_dir)?;
    let stats = DataStats::from_data(&data);
    match args.format {
        StatsFormatArg::Json => {
            let json = serde_json::to_string_pretty(&stats).context("serialize stats")?;
            println!("{json}");
        }
        StatsFormatArg::Table => {
            let mut table = Table::new();
            table.set_header(vec![header_cell("Item"), header_cell("Count")]);
            apply_table_style(&mut table);
            if let Some(column) = table.column_mut(1) {
                column.set_cell_alignment(CellAlignment::Right);
            }
            for (label, count) in stats.rows() {
                table.add_row(vec![Cell::new(label), Cell::new(count)]);
            }
            println!("Data: {}", data.root().display());
            println!("{table}");
        }
    }
    Ok(())
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}
