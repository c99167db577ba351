//! Single-block parsing

use super::OPTIONS_MARKER;
use crate::types::QuestionRecord;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Leading question numbering: `1.`, `12)`, `Q3.`, `Question 4:`
///
/// The punctuation must be followed by whitespace or end the line, so `3.14`
/// is text rather than an ordinal.
#[allow(clippy::expect_used)]
static ORDINAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:q(?:uestion)?\s*)?\d+\s*[.):](?:\s+|$)").expect("ordinal pattern is valid")
});

/// Final answer line: `(Answer: B)`
#[allow(clippy::expect_used)]
static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(\s*Answer\s*:\s*(.*?)\s*\)$").expect("answer pattern is valid")
});

/// Why a block did not produce a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// No `Options:` line
    MissingOptionsMarker,
    /// Nothing before the marker once numbering is removed
    EmptyQuestion,
    /// Not exactly four well-formed option lines
    WrongOptionCount(usize),
    /// Last line is not `(Answer: ...)` or the value is empty
    MissingAnswer,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingOptionsMarker => write!(f, "missing '{OPTIONS_MARKER}' line"),
            DropReason::EmptyQuestion => write!(f, "empty question text"),
            DropReason::WrongOptionCount(n) => {
                write!(f, "expected {} options, found {n}", QuestionRecord::OPTION_COUNT)
            }
            DropReason::MissingAnswer => write!(f, "missing '(Answer: ...)' line"),
        }
    }
}

/// Parse the lines of one block into a question
pub fn parse_block(lines: &[&str]) -> Result<QuestionRecord, DropReason> {
    let lines: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    let marker = lines
        .iter()
        .position(|line| *line == OPTIONS_MARKER)
        .ok_or(DropReason::MissingOptionsMarker)?;

    let question = question_text(&lines[..marker]).ok_or(DropReason::EmptyQuestion)?;

    let after_marker = &lines[marker + 1..];
    let (answer_line, option_lines) = match after_marker.split_last() {
        Some((last, rest)) => (Some(*last), rest),
        None => (None, after_marker),
    };

    let options: Vec<String> = option_lines
        .iter()
        .filter_map(|line| option_text(line))
        .collect();

    let answer = answer_line.and_then(answer_value);

    if options.len() != QuestionRecord::OPTION_COUNT {
        return Err(DropReason::WrongOptionCount(options.len()));
    }
    let answer = answer.ok_or(DropReason::MissingAnswer)?;

    Ok(QuestionRecord {
        question,
        options,
        answer,
    })
}

/// Join the question lines, starting at the first numbered line if any
fn question_text(lines: &[&str]) -> Option<String> {
    let start = lines
        .iter()
        .position(|line| ORDINAL_PREFIX.is_match(line))
        .unwrap_or(0);

    let mut parts = lines[start..].iter().copied();
    let first = parts.next()?;
    let first = ORDINAL_PREFIX.replace(first, "");

    let text = std::iter::once(first.as_ref())
        .chain(parts)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// `"<label>. <text>"` → `<text>`
fn option_text(line: &str) -> Option<String> {
    let (label, text) = line.split_once(". ")?;
    let label = label.trim();
    if label.is_empty() || label.chars().any(char::is_whitespace) {
        return None;
    }
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn answer_value(line: &str) -> Option<String> {
    let captures = ANSWER_LINE.captures(line)?;
    let value = captures.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().collect()
    }

    #[test]
    fn ordinal_prefix_forms() {
        for (input, expected) in [
            ("1. What?", "What?"),
            ("12) What?", "What?"),
            ("Q3. What?", "What?"),
            ("Question 4: What?", "What?"),
            ("What year? 1999.", "What year? 1999."),
            ("3.14 is the value of which constant?", "3.14 is the value of which constant?"),
        ] {
            assert_eq!(
                question_text(&[input]).as_deref(),
                Some(expected),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn question_lines_are_joined_with_spaces() {
        assert_eq!(
            question_text(&["3. The ______ was founded", "in 1998."]).as_deref(),
            Some("The ______ was founded in 1998.")
        );
    }

    #[test]
    fn preamble_before_numbered_line_is_ignored() {
        assert_eq!(
            question_text(&["Multiple-Choice Questions:", "1. Who wrote it?"]).as_deref(),
            Some("Who wrote it?")
        );
    }

    #[test]
    fn numbered_continuation_line_stays_in_question() {
        let block = lines(
            "1. Chapter 3 explains that the ______ stores data, see section\n\
             2.1 for the memory hierarchy.\n\
             Options:\nA. cache\nB. register\nC. disk\nD. bus\n(Answer: A)",
        );
        let record = parse_block(&block).unwrap();
        assert_eq!(
            record.question,
            "Chapter 3 explains that the ______ stores data, see section 2.1 for the memory hierarchy."
        );

        assert_eq!(
            question_text(&["1. Which year did it end?", "1990. or 1991."]).as_deref(),
            Some("Which year did it end? 1990. or 1991.")
        );
    }

    #[test]
    fn bare_ordinal_is_empty_question() {
        assert_eq!(question_text(&["7."]), None);
        assert_eq!(question_text(&[]), None);
    }

    #[test]
    fn option_text_keeps_text_after_first_separator() {
        assert_eq!(option_text("A. 3").as_deref(), Some("3"));
        assert_eq!(option_text("b. Dr. Smith").as_deref(), Some("Dr. Smith"));
        assert_eq!(option_text("A) 3"), None);
        assert_eq!(option_text("Not an option. Really"), None);
        assert_eq!(option_text(". orphan"), None);
    }

    #[test]
    fn answer_line_forms() {
        assert_eq!(answer_value("(Answer: B)").as_deref(), Some("B"));
        assert_eq!(answer_value("( Answer :  New York )").as_deref(), Some("New York"));
        assert_eq!(answer_value("(Answer: )"), None);
        assert_eq!(answer_value("Answer: B"), None);
    }

    #[test]
    fn reports_each_drop_reason() {
        assert_eq!(
            parse_block(&lines("1. Q?\nA. a\nB. b\nC. c\nD. d\n(Answer: A)")),
            Err(DropReason::MissingOptionsMarker)
        );
        assert_eq!(
            parse_block(&lines("1.\nOptions:\nA. a\nB. b\nC. c\nD. d\n(Answer: A)")),
            Err(DropReason::EmptyQuestion)
        );
        assert_eq!(
            parse_block(&lines("1. Q?\nOptions:\nA. a\nB. b\nC. c\n(Answer: A)")),
            Err(DropReason::WrongOptionCount(3))
        );
        assert_eq!(
            parse_block(&lines("1. Q?\nOptions:\nA. a\nB. b\nC. c\nD. d\nE. e\n(Answer: A)")),
            Err(DropReason::WrongOptionCount(5))
        );
        assert_eq!(
            parse_block(&lines("1. Q?\nOptions:\nA. a\nB. b\nC. c\nD. d\nAnswer: A")),
            Err(DropReason::MissingAnswer)
        );
        assert_eq!(
            parse_block(&lines("1. Q?\nOptions:")),
            Err(DropReason::WrongOptionCount(0))
        );
    }

    #[test]
    fn drop_reason_messages() {
        assert_eq!(
            DropReason::WrongOptionCount(3).to_string(),
            "expected 4 options, found 3"
        );
        assert_eq!(
            DropReason::MissingOptionsMarker.to_string(),
            "missing 'Options:' line"
        );
    }
}
