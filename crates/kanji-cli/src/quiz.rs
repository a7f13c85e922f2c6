//! Multiple-choice quiz engine.
//!
//! Questions are built up front from a seeded or entropy-backed RNG, then
//! asked over any `BufRead`/`Write` pair.

use std::fmt;
use std::io::{self, BufRead, Write};

use kanji_data::{Kanji, KanjiData, KanjiFilter};
use rand::Rng;
use tracing::{debug, info};

/// What the player must pick for each kanji.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuizMode {
    #[default]
    Meaning,
    Reading,
}

impl QuizMode {
    /// Text shown for `kanji` as a choice.
    pub fn label(self, kanji: &Kanji) -> &str {
        match self {
            QuizMode::Meaning => kanji.meaning(),
            QuizMode::Reading => kanji.reading(),
        }
    }

    fn prompt(self) -> &'static str {
        match self {
            QuizMode::Meaning => "Choose the meaning:",
            QuizMode::Reading => "Choose the reading:",
        }
    }
}

/// Quiz settings.
#[derive(Debug, Clone)]
pub struct QuizOptions {
    pub mode: QuizMode,
    /// Maximum number of questions.
    pub count: usize,
    /// Choices per question, including the answer.
    pub choices: usize,
    pub filter: KanjiFilter,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            mode: QuizMode::default(),
            count: 10,
            choices: 4,
            filter: KanjiFilter::default(),
        }
    }
}

/// One kanji and the options offered for it.
#[derive(Debug, Clone)]
pub struct Question<'a> {
    kanji: &'a Kanji,
    choices: Vec<&'a Kanji>,
}

impl<'a> Question<'a> {
    /// Build a question; `kanji` is added to `choices` if missing.
    pub fn new(kanji: &'a Kanji, mut choices: Vec<&'a Kanji>) -> Self {
        if !choices.iter().any(|c| c.name() == kanji.name()) {
            choices.push(kanji);
        }
        Self { kanji, choices }
    }

    pub fn kanji(&self) -> &'a Kanji {
        self.kanji
    }

    pub fn choices(&self) -> &[&'a Kanji] {
        &self.choices
    }

    /// 1-based number of the correct choice.
    pub fn answer(&self) -> usize {
        self.choices
            .iter()
            .position(|c| c.name() == self.kanji.name())
            .map_or(0, |i| i + 1)
    }

    /// Whether the 1-based `choice` is correct.
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer()
    }
}

/// Pick questions matching `options`, without repeating a kanji.
pub fn build_questions<'a, R: Rng + ?Sized>(
    data: &'a KanjiData,
    options: &QuizOptions,
    rng: &mut R,
) -> Vec<Question<'a>> {
    let mode = options.mode;
    data.shuffled(rng, &options.filter, options.count)
        .into_iter()
        .map(|kanji| {
            let choices = data.choices(rng, kanji, options.choices, |k| mode.label(k));
            Question::new(kanji, choices)
        })
        .collect()
}

/// A question answered incorrectly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    pub kanji: String,
    /// The label of the correct choice.
    pub expected: String,
}

/// Outcome of a quiz run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizSummary {
    /// Questions answered.
    pub asked: usize,
    pub correct: usize,
    pub missed: Vec<Miss>,
    /// The player stopped before the last question.
    pub quit: bool,
}

impl fmt::Display for QuizSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {}/{}", self.correct, self.asked)?;
        if self.quit {
            write!(f, " (stopped early)")?;
        }
        if !self.missed.is_empty() {
            write!(f, "\nMissed:")?;
            for miss in &self.missed {
                write!(f, "\n  {} - {}", miss.kanji, miss.expected)?;
            }
        }
        Ok(())
    }
}

enum Reply {
    Choice(usize),
    Quit,
}

/// Ask every question, reading answers from `input`.
///
/// Answers are choice numbers starting at 1; `q` or end of input stops the
/// quiz. Invalid answers are rejected and the question is asked again.
pub fn run_quiz<R, W>(
    questions: &[Question<'_>],
    mode: QuizMode,
    input: &mut R,
    output: &mut W,
) -> io::Result<QuizSummary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = QuizSummary::default();
    let total = questions.len();
    for (index, question) in questions.iter().enumerate() {
        if index > 0 {
            writeln!(output)?;
        }
        writeln!(output, "Question {}/{total}: {}", index + 1, question.kanji().name())?;
        writeln!(output, "{}", mode.prompt())?;
        for (number, choice) in question.choices().iter().enumerate() {
            writeln!(output, "  {}. {}", number + 1, mode.label(choice))?;
        }

        let choice = match read_reply(question.choices().len(), input, output)? {
            Reply::Choice(choice) => choice,
            Reply::Quit => {
                summary.quit = true;
                break;
            }
        };
        summary.asked += 1;
        let correct = question.is_correct(choice);
        debug!(kanji = question.kanji().name(), choice, correct, "answered");
        if correct {
            summary.correct += 1;
            writeln!(output, "Correct!")?;
        } else {
            let expected = mode.label(question.kanji());
            writeln!(output, "Wrong, the answer is {}. {expected}", question.answer())?;
            summary.missed.push(Miss {
                kanji: question.kanji().name().to_string(),
                expected: expected.to_string(),
            });
        }
    }

    info!(
        asked = summary.asked,
        correct = summary.correct,
        quit = summary.quit,
        "quiz finished"
    );
    writeln!(output)?;
    writeln!(output, "{summary}")?;
    Ok(summary)
}

fn read_reply<R: BufRead, W: Write>(
    choices: usize,
    input: &mut R,
    output: &mut W,
) -> io::Result<Reply> {
    let mut line = String::new();
    loop {
        write!(output, "Answer (1-{choices}, q to quit): ")?;
        output.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(Reply::Quit);
        }
        let reply = line.trim();
        if reply.eq_ignore_ascii_case("q") {
            return Ok(Reply::Quit);
        }
        match reply.parse::<usize>() {
            Ok(choice) if (1..=choices).contains(&choice) => return Ok(Reply::Choice(choice)),
            _ => writeln!(output, "Enter a number from 1 to {choices}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_display() {
        let summary = QuizSummary {
            asked: 3,
            correct: 1,
            missed: vec![
                Miss {
                    kanji: "日".to_string(),
                    expected: "day".to_string(),
                },
                Miss {
                    kanji: "月".to_string(),
                    expected: "moon".to_string(),
                },
            ],
            quit: true,
        };
        assert_eq!(
            summary.to_string(),
            "Score: 1/3 (stopped early)\nMissed:\n  日 - day\n  月 - moon"
        );
        assert_eq!(QuizSummary::default().to_string(), "Score: 0/0");
    }
}
