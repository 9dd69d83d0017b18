// Psalm citation parsing and verse selection for responsive reading.
//
// A schedule citation like "Psalm 116:1,10-17 responsively" becomes an
// ordered list of (verse, part) specs, then render-ready half-verse units
// looked up in the static psalter. Verses the psalter does not carry are
// skipped silently; citations routinely reference more than was extracted.

use crate::corpus;
use anyhow::{Result, bail};
use log::debug;
use serde::{Deserialize, Serialize};

/// Which part of a verse a citation selects.
///
/// `A` is the first half, `B` the first line of the second half, `C` the
/// remaining second-half lines (or all of them when only one exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersePart {
    Whole,
    A,
    B,
    C,
}

/// A parsed psalm citation: psalm number plus expanded verse specs.
/// An empty spec list means the entire psalm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsalmReference {
    pub number: u32,
    pub verses: Vec<(u32, VersePart)>,
}

/// A single psalm verse in its half-verse structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsalmVerse {
    pub number: u32,
    pub first_half: String,
    pub second_half: Vec<String>,
}

/// The selected verses of one psalm, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsalmSelection {
    pub psalm_number: u32,
    pub latin: String,
    pub verses: Vec<PsalmVerse>,
}

impl PsalmSelection {
    /// One string per verse: the first half, then each second-half line
    /// tab-indented on its own line. Empty verses are dropped.
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for verse in &self.verses {
            let mut parts = Vec::new();
            if !verse.first_half.is_empty() {
                parts.push(verse.first_half.clone());
            }
            for sh_line in &verse.second_half {
                parts.push(format!("\t{}", sh_line));
            }
            if !parts.is_empty() {
                lines.push(parts.join("\n"));
            }
        }
        lines
    }
}

// Trailing rubric phrases appended to citations in the schedule, e.g.
// "Psalm 63:1-8 responsively" or "Psalm 23 (read in unison)".
const RUBRIC_MARKERS: [&str; 4] = ["responsively", "in unison", "read ", "antiphonally"];

/// Drop any trailing rubric clause before parsing the citation proper.
fn strip_rubric(reference: &str) -> &str {
    let lower = reference.to_lowercase();
    let cut = RUBRIC_MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker))
        .min();
    let head = match cut {
        Some(idx) => &reference[..idx],
        None => reference,
    };
    head.trim_end_matches(|c: char| c.is_whitespace() || c == '(')
}

fn split_leading_digits(s: &str) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s.split_at(end)
}

fn split_suffix(s: &str) -> (Option<VersePart>, &str) {
    match s.chars().next() {
        Some('a') => (Some(VersePart::A), &s[1..]),
        Some('b') => (Some(VersePart::B), &s[1..]),
        Some('c') => (Some(VersePart::C), &s[1..]),
        _ => (None, s),
    }
}

impl PsalmReference {
    /// Parse a citation like "Psalm 72:1-7,10-14" or "Psalm 147:1-12, 21c".
    ///
    /// Ranges expand to every verse in between; only the first element of a
    /// range keeps the start suffix and only the last keeps the end suffix.
    pub fn parse(reference: &str) -> Result<Self> {
        let cleaned = strip_rubric(reference).trim();

        let Some(rest) = cleaned.strip_prefix("Psalm") else {
            bail!("Cannot parse psalm reference: {:?}", reference);
        };
        let rest = rest.trim_start();

        let (num_str, rest) = split_leading_digits(rest);
        let number: u32 = match num_str.parse() {
            Ok(n) if (1..=150).contains(&n) => n,
            _ => bail!("Cannot parse psalm reference: {:?}", reference),
        };

        let verse_part = match rest.trim() {
            "" => return Ok(PsalmReference { number, verses: Vec::new() }),
            spec => match spec.strip_prefix(':') {
                Some(v) if !v.trim().is_empty() => v.trim(),
                _ => bail!("Cannot parse psalm reference: {:?}", reference),
            },
        };

        let mut verses = Vec::new();
        for segment in verse_part.split(',') {
            let segment = segment.trim();

            let (start_str, rest) = split_leading_digits(segment);
            if start_str.is_empty() {
                bail!("Cannot parse verse spec {:?} in {:?}", segment, reference);
            }
            let start: u32 = start_str.parse()?;
            let (start_suffix, rest) = split_suffix(rest);

            match rest.strip_prefix('-') {
                None => {
                    verses.push((start, start_suffix.unwrap_or(VersePart::Whole)));
                }
                Some(tail) => {
                    let (end_str, tail) = split_leading_digits(tail);
                    if end_str.is_empty() {
                        bail!("Cannot parse verse spec {:?} in {:?}", segment, reference);
                    }
                    let end: u32 = end_str.parse()?;
                    let (end_suffix, _) = split_suffix(tail);

                    for v in start..=end {
                        let part = if v == start {
                            start_suffix.unwrap_or(VersePart::Whole)
                        } else if v == end {
                            end_suffix.unwrap_or(VersePart::Whole)
                        } else {
                            VersePart::Whole
                        };
                        verses.push((v, part));
                    }
                }
            }
        }

        Ok(PsalmReference { number, verses })
    }
}

/// Resolve a citation against the psalter: parse, look up, select parts.
///
/// Fails when the citation is malformed or the psalm itself is absent from
/// the psalter; individual missing verses are skipped.
pub fn psalm(reference: &str) -> Result<PsalmSelection> {
    let parsed = PsalmReference::parse(reference)?;

    let Some(text) = corpus::corpus().psalm(parsed.number) else {
        bail!("Psalm {} not found in psalter data", parsed.number);
    };

    let verses = if parsed.verses.is_empty() {
        // Entire psalm, in verse order
        text.verses
            .iter()
            .map(|(num, v)| PsalmVerse {
                number: *num,
                first_half: v.first_half.clone(),
                second_half: v.second_half.clone(),
            })
            .collect()
    } else {
        let mut selected = Vec::new();
        for (num, part) in &parsed.verses {
            let Some(v) = text.verses.get(num) else {
                debug!("Psalm {}:{} not in psalter; skipping", parsed.number, num);
                continue;
            };
            let verse = match part {
                VersePart::Whole => PsalmVerse {
                    number: *num,
                    first_half: v.first_half.clone(),
                    second_half: v.second_half.clone(),
                },
                VersePart::A => PsalmVerse {
                    number: *num,
                    first_half: v.first_half.clone(),
                    second_half: Vec::new(),
                },
                VersePart::B => PsalmVerse {
                    number: *num,
                    first_half: String::new(),
                    second_half: v.second_half.iter().take(1).cloned().collect(),
                },
                VersePart::C => {
                    let tail: Vec<String> = v.second_half.iter().skip(1).cloned().collect();
                    PsalmVerse {
                        number: *num,
                        first_half: String::new(),
                        second_half: if tail.is_empty() { v.second_half.clone() } else { tail },
                    }
                }
            };
            selected.push(verse);
        }
        selected
    };

    Ok(PsalmSelection {
        psalm_number: parsed.number,
        latin: text.latin.clone(),
        verses,
    })
}
