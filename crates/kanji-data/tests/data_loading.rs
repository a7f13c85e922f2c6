//! Loading the reference tables from a data directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use kanji_data::{DataError, Grade, KanjiData, KanjiFilter, KanjiKind, KanjiType};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

const RADICALS: &str = "Number\tName\tLongName\tReading\tStrokes\n\
1\t一\tone\tいち\t1\n\
2\t丨\tline\tぼう\t1\n\
3\t丶\tdot\tてん\t1\n";

const JOUYOU: &str = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tGrade\tYear\n\
1\t一\t1\t1\tone\tイチ\t1\t\n\
2\t中\t2\t4\tmiddle\tチュウ\t1\t\n\
3\t丸\t3\t3\tround\tガン\t2\t\n\
4\t丼\t3\t5\tbowl\tどんぶり\tS\t2010\n";

const JINMEI: &str = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tReason\tYear\n\
1\t丑\t1\t4\tsign of the ox\tチュウ\tNames\t1951\n";

const EXTRA: &str = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tRare\n\
1\t丫\t2\t3\tfork\tア\tY\n";

const FREQUENCY: &str = "# most frequent first\n中\n一\n丸\n";

/// Create a data directory from the fixtures, replacing any file named in
/// `overrides`.
fn data_dir(overrides: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        ("radicals.txt", RADICALS),
        ("jouyou.txt", JOUYOU),
        ("jinmei.txt", JINMEI),
        ("extra.txt", EXTRA),
        ("frequency.txt", FREQUENCY),
    ];
    for (name, contents) in files {
        let contents = overrides
            .iter()
            .find(|(n, _)| *n == name)
            .map_or(contents, |(_, c)| *c);
        fs::write(dir.path().join(name), contents).unwrap();
    }
    dir
}

fn load_err(overrides: &[(&str, &str)]) -> String {
    let dir = data_dir(overrides);
    KanjiData::load(dir.path()).unwrap_err().to_string()
}

fn bundled_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

#[test]
fn test_load_fixture() {
    let dir = data_dir(&[]);
    let data = KanjiData::load(dir.path()).unwrap();

    assert_eq!(data.root(), dir.path());
    assert_eq!(data.radicals().len(), 3);
    assert_eq!(data.kanji().len(), 6);
    assert_eq!(data.radical(2).unwrap().long_name, "line");
    assert!(data.radical(0).is_none());
    assert!(data.radical(4).is_none());

    let middle = data.find("中").unwrap();
    assert_eq!(middle.meaning(), "middle");
    assert_eq!(middle.grade(), Some(Grade::G1));
    assert_eq!(middle.frequency(), Some(1));
    assert_eq!(data.find("丼").unwrap().frequency(), None);
    assert_eq!(data.find("丼").unwrap().year(), Some(2010));
    assert!(data.find("二").is_none());

    assert_eq!(
        data.find("丫").unwrap().kind(),
        &KanjiKind::Extra { rare: true }
    );
    let counts = data.type_counts();
    assert_eq!(counts["Jouyou"], 4);
    assert_eq!(counts["Jinmei"], 1);
    assert_eq!(counts["Extra"], 1);
    assert_eq!(data.grade_counts()[&Grade::G1], 2);
}

#[test]
fn test_load_bundled_data() {
    let data = KanjiData::load(bundled_data_dir()).unwrap();
    assert_eq!(data.radicals().len(), 214);
    assert_eq!(data.radical(214).unwrap().strokes, 17);
    assert_eq!(data.find("日").unwrap().frequency(), Some(1));
    assert_eq!(data.find("日").unwrap().radical(), 72);

    let names: HashSet<&str> = data.kanji().iter().map(|k| k.name()).collect();
    assert_eq!(names.len(), data.kanji().len());
    for kanji in data.kanji() {
        assert!(data.radical(kanji.radical()).is_some(), "{}", kanji.name());
    }
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let err = KanjiData::load(&missing).unwrap_err();
    assert!(matches!(err, DataError::DirectoryNotFound { .. }));
}

#[test]
fn test_missing_table_is_io_error() {
    let dir = data_dir(&[]);
    fs::remove_file(dir.path().join("jinmei.txt")).unwrap();
    let err = KanjiData::load(dir.path()).unwrap_err();
    let DataError::Table(err) = err else {
        panic!("expected table error, got {err:?}");
    };
    assert_eq!(err.kind(), kanji_table::ErrorKind::Io);
}

#[test]
fn test_missing_column_reported_with_file() {
    let jinmei = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tYear\n";
    assert_eq!(
        load_err(&[("jinmei.txt", jinmei)]),
        "column 'Reason' not found - file: jinmei.txt"
    );
}

#[test]
fn test_duplicate_kanji_across_tables() {
    let extra = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tRare\n\
1\t中\t2\t4\tmiddle\tチュウ\tN\n";
    assert_eq!(
        load_err(&[("extra.txt", extra)]),
        "duplicate kanji '中' in extra.txt (already loaded from jouyou.txt)"
    );
}

#[test]
fn test_out_of_order_numbers() {
    let radicals = "Number\tName\tLongName\tReading\tStrokes\n1\t一\tone\tいち\t1\n3\t丶\tdot\tてん\t1\n";
    assert_eq!(
        load_err(&[("radicals.txt", radicals)]),
        "radical number 3 out of order, expected 2 - file: radicals.txt, line: 2"
    );

    let extra = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tRare\n2\t丫\t2\t3\tfork\tア\tY\n";
    assert_eq!(
        load_err(&[("extra.txt", extra)]),
        "kanji number 2 out of order, expected 1 - file: extra.txt, line: 1"
    );
}

#[test]
fn test_radical_strokes_are_bounded() {
    let radicals = "Number\tName\tLongName\tReading\tStrokes\n1\t一\tone\tいち\t18\n";
    assert_eq!(
        load_err(&[("radicals.txt", radicals)]),
        "exceeded max value 17 - file: radicals.txt, line: 1, column: 'Strokes', value: '18'"
    );

    let radicals = "Number\tName\tLongName\tReading\tStrokes\n1\t一\tone\tいち\t257\n";
    assert_eq!(
        load_err(&[("radicals.txt", radicals)]),
        "exceeded max value 255 - file: radicals.txt, line: 1, column: 'Strokes', value: '257'"
    );
}

#[test]
fn test_invalid_rows() {
    let extra = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tRare\n1\t丫\t9\t3\tfork\tア\tY\n";
    assert_eq!(
        load_err(&[("extra.txt", extra)]),
        "invalid kanji '丫': unknown radical 9 - file: extra.txt, line: 1"
    );

    let extra = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tRare\n1\t丫\t2\t3\tfork\tア\tmaybe\n";
    assert_eq!(
        load_err(&[("extra.txt", extra)]),
        "convert to bool failed - file: extra.txt, line: 1, column: 'Rare', value: 'maybe'"
    );

    let jinmei = "Number\tName\tRadical\tStrokes\tMeaning\tReading\tReason\tYear\n\
1\t丑\t1\t4\tox\tチュウ\tFame\t1951\n";
    assert_eq!(
        load_err(&[("jinmei.txt", jinmei)]),
        "invalid Reason - file: jinmei.txt, line: 1, column: 'Reason', value: 'Fame'"
    );
}

#[test]
fn test_bad_frequency_list() {
    assert_eq!(
        load_err(&[("frequency.txt", "中\n一 丸\n")]),
        "got multiple tokens - file: frequency.txt, line: 2, value: '一 丸'"
    );
}

#[test]
fn test_filter() {
    let dir = data_dir(&[]);
    let data = KanjiData::load(dir.path()).unwrap();

    let all = data.filter(&KanjiFilter::default());
    assert_eq!(all.len(), 6);

    let jouyou = KanjiFilter::default().with_type(KanjiType::Jouyou);
    assert_eq!(data.filter(&jouyou).len(), 4);

    let grade_one = jouyou.with_grade(Grade::G1);
    let names: Vec<&str> = data.filter(&grade_one).iter().map(|k| k.name()).collect();
    assert_eq!(names, vec!["一", "中"]);

    let nothing = KanjiFilter::default()
        .with_type(KanjiType::Extra)
        .with_grade(Grade::G1);
    assert!(data.filter(&nothing).is_empty());
}

#[test]
fn test_random_queries_are_seeded() {
    let dir = data_dir(&[]);
    let data = KanjiData::load(dir.path()).unwrap();
    let filter = KanjiFilter::default();

    let pick = |seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        data.random_kanji(&mut rng, &filter).unwrap().name().to_string()
    };
    assert_eq!(pick(11), pick(11));

    let mut rng = StdRng::seed_from_u64(3);
    let shuffled = data.shuffled(&mut rng, &filter, 4);
    assert_eq!(shuffled.len(), 4);
    let unique: HashSet<&str> = shuffled.iter().map(|k| k.name()).collect();
    assert_eq!(unique.len(), 4);

    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(data.shuffled(&mut rng, &filter, 100).len(), 6);

    let none = KanjiFilter::default()
        .with_type(KanjiType::Extra)
        .with_grade(Grade::G2);
    assert!(data.random_kanji(&mut rng, &none).is_none());
}

#[test]
fn test_choices_have_distinct_labels() {
    let dir = data_dir(&[]);
    let data = KanjiData::load(dir.path()).unwrap();
    let answer = data.find("一").unwrap();

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        // 中 and 丑 share the reading チュウ, so at most one of them appears.
        let choices = data.choices(&mut rng, answer, 4, |k| k.reading());
        assert_eq!(choices.len(), 4);
        assert!(choices.iter().any(|k| k.name() == "一"));
        let readings: HashSet<&str> = choices.iter().map(|k| k.reading()).collect();
        assert_eq!(readings.len(), 4);
    }

    let mut rng = StdRng::seed_from_u64(1);
    let choices = data.choices(&mut rng, answer, 10, |k| k.reading());
    assert_eq!(choices.len(), 5);
}
