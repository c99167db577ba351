//! Parser for generator output text
//!
//! The generator writes one question per block, blocks separated by a line of
//! dashes:
//!
//! ```text
//! 1. What is 2+2?
//! Options:
//! A. 3
//! B. 4
//! C. 5
//! D. 6
//! (Answer: B)
//! ----------------------------
//! ```
//!
//! Scanning is line-based. Blocks that do not yield a complete question are
//! dropped and counted, never reported as errors.

mod block;

pub use block::{DropReason, parse_block};

use crate::types::{ParseReport, QuestionSet};

/// Separator the generator writes between blocks
pub const DELIMITER: &str = "----------------------------";

/// Marker line that introduces the options section of a block
pub const OPTIONS_MARKER: &str = "Options:";

/// Shortest run of dashes accepted as a delimiter line
const MIN_DELIMITER_LEN: usize = 3;

/// Whether `line` separates two blocks
pub fn is_delimiter(line: &str) -> bool {
    let line = line.trim();
    line.len() >= MIN_DELIMITER_LEN && line.bytes().all(|b| b == b'-')
}

/// Split text into the lines of each non-blank block, in source order
pub fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if is_delimiter(line) {
            push_block(&mut blocks, std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    push_block(&mut blocks, current);

    blocks
}

fn push_block<'a>(blocks: &mut Vec<Vec<&'a str>>, lines: Vec<&'a str>) {
    if lines.iter().any(|line| !line.trim().is_empty()) {
        blocks.push(lines);
    }
}

/// Parse generator output into questions plus drop diagnostics
pub fn parse_report(text: &str) -> ParseReport {
    let blocks = split_blocks(text);
    let blocks_scanned = blocks.len();
    let mut questions = QuestionSet::with_capacity(blocks_scanned);
    let mut dropped_blocks = 0;

    for (index, lines) in blocks.iter().enumerate() {
        match parse_block(lines) {
            Ok(record) => questions.push(record),
            Err(reason) => {
                dropped_blocks += 1;
                tracing::debug!(block = index + 1, reason = %reason, "Dropping malformed question block");
            }
        }
    }

    if dropped_blocks > 0 {
        tracing::info!(
            parsed = questions.len(),
            dropped = dropped_blocks,
            "Parsed generator output with malformed blocks"
        );
    }

    ParseReport {
        questions,
        blocks_scanned,
        dropped_blocks,
    }
}

/// Parse generator output into questions
pub fn parse_questions(text: &str) -> QuestionSet {
    parse_report(text).questions
}
