//! Placeholder result used when the completion service is out of quota.
//!
//! The numbers are random. Excerpts are fixed slices of the input so the
//! response keeps the same shape as a real analysis.

use crate::models::{CheckResult, FlaggedSection};
use rand::Rng;

/// `[start, end)` character windows of the input used as flagged excerpts.
const EXCERPT_WINDOWS: [(usize, usize); 2] = [(0, 50), (50, 100)];

pub fn fallback_result<R: Rng + ?Sized>(text: &str, rng: &mut R) -> CheckResult {
    let similarity = rng.gen_range(0..=100);
    let flagged_sections = EXCERPT_WINDOWS
        .iter()
        .map(|&(start, end)| FlaggedSection {
            text: char_window(text, start, end),
            similarity: rng.gen_range(0..=100),
        })
        .collect();

    CheckResult {
        similarity,
        flagged_sections,
    }
}

fn char_window(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}
