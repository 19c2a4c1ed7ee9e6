//! Turns the model's free-text reply into a [`CheckResult`].
//!
//! Expected shape, loosely:
//!
//! ```text
//! Similarity: 42%
//! - "copied sentence" - 80
//! - "another passage" - 35% similar
//! ```
//!
//! The overall score is the first number followed by `%` anywhere in the
//! reply. Flagged sections are lines starting with `-`, split on the first
//! `" - "`. Lines that do not fit are skipped rather than failing the reply.

use crate::models::{CheckResult, FlaggedSection, MAX_SIMILARITY};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static PERCENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)(?:\.\d+)?%").expect("valid percent regex"));

const SECTION_MARKER: char = '-';
const SECTION_SEPARATOR: &str = " - ";
/// Width of the `- ` marker in front of each excerpt.
const SECTION_PREFIX_CHARS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("reply contains no percentage")]
    MissingSimilarity,

    #[error("similarity {0} is outside 0-100")]
    SimilarityOutOfRange(String),
}

pub fn parse_reply(reply: &str) -> Result<CheckResult, ParseError> {
    let similarity = overall_similarity(reply)?;
    let flagged_sections = reply.lines().filter_map(parse_section_line).collect();

    Ok(CheckResult {
        similarity,
        flagged_sections,
    })
}

fn overall_similarity(reply: &str) -> Result<u8, ParseError> {
    let digits = PERCENT_RE
        .captures(reply)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(ParseError::MissingSimilarity)?;

    to_similarity(digits).ok_or_else(|| ParseError::SimilarityOutOfRange(digits.to_string()))
}

fn parse_section_line(line: &str) -> Option<FlaggedSection> {
    let line = line.trim_end();
    if !line.starts_with(SECTION_MARKER) {
        return None;
    }

    let (head, tail) = line.split_once(SECTION_SEPARATOR)?;

    let excerpt: String = head.chars().skip(SECTION_PREFIX_CHARS).collect();
    let text = excerpt
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\u{201c}' | '\u{201d}'))
        .trim();
    if text.is_empty() {
        return None;
    }

    let similarity = to_similarity(leading_digits(tail.trim_start()))?;

    Some(FlaggedSection {
        text: text.to_string(),
        similarity,
    })
}

fn leading_digits(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}

fn to_similarity(digits: &str) -> Option<u8> {
    digits
        .parse::<u64>()
        .ok()
        .filter(|v| *v <= u64::from(MAX_SIMILARITY))
        .map(|v| v as u8)
}
