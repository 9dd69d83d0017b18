// Song title parsing: planning-sheet titles carry hymnal references,
// verse selections, and settings inline, e.g.
// "All Creatures of Our God and King H400 (V1,3-4)" or "S129 (Powell)".

use serde::{Deserialize, Serialize};

const HYMNAL_NAME: &str = "Hymnal 1982";

/// Structured form of a raw song title from the planning sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongIdentifier {
    pub raw: String,
    pub title: String,
    /// "400" for H400, "S129" for S129
    pub hymnal_number: Option<String>,
    pub hymnal_name: Option<String>,
    /// e.g. "V1,3-4"
    pub verses: Option<String>,
    /// Parenthetical setting or composer, e.g. "Powell"
    pub setting: Option<String>,
}

/// Find the first "(V…)" verse group, where the body after the V is
/// digits, commas, and dashes only. Returns (start, end) byte offsets.
fn find_verse_group(s: &str) -> Option<(usize, usize)> {
    let mut search_from = 0;
    while let Some(rel) = s[search_from..].find('(') {
        let start = search_from + rel;
        let body = &s[start + 1..];
        if let Some(close) = body.find(')') {
            let inner = &body[..close];
            let mut chars = inner.chars();
            let is_verse_group = matches!(chars.next(), Some('V') | Some('v'))
                && inner.len() > 1
                && chars.all(|c| c.is_ascii_digit() || c == ',' || c == '-');
            if is_verse_group {
                return Some((start, start + 1 + close + 1));
            }
            search_from = start + 1;
        } else {
            return None;
        }
    }
    None
}

/// Find the first remaining parenthetical and return (start, end, inner).
fn find_parenthetical(s: &str) -> Option<(usize, usize, String)> {
    let start = s.find('(')?;
    let close = s[start + 1..].find(')')?;
    let inner = s[start + 1..start + 1 + close].trim().to_string();
    Some((start, start + 1 + close + 1, inner))
}

/// Find a hymnal reference H### or S### as a standalone word.
/// Returns (start, end, prefix char, digits).
fn find_hymnal_ref(s: &str) -> Option<(usize, usize, char, String)> {
    let chars: Vec<(usize, char)> = s.char_indices().collect();
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        let word_start = i == 0 || !chars[i - 1].1.is_alphanumeric();
        if word_start && (c == 'H' || c == 'S') {
            let mut j = i + 1;
            while j < chars.len() && chars[j].1.is_ascii_digit() {
                j += 1;
            }
            let has_digits = j > i + 1;
            let word_end = j == chars.len() || !chars[j].1.is_alphanumeric();
            if has_digits && word_end {
                let end = chars.get(j).map(|(p, _)| *p).unwrap_or(s.len());
                let digits = s[chars[i + 1].0..end].to_string();
                return Some((pos, end, c, digits));
            }
        }
        i += 1;
    }
    None
}

fn remove_span(s: &str, start: usize, end: usize) -> String {
    format!("{}{}", &s[..start], &s[end..])
}

impl SongIdentifier {
    /// Parse a raw planning-sheet title into its structured parts.
    pub fn parse(raw_title: &str) -> Self {
        let mut working = raw_title.to_string();
        let mut verses = None;
        let mut setting = None;
        let mut hymnal_number = None;
        let mut hymnal_name = None;

        if let Some((start, end)) = find_verse_group(&working) {
            verses = Some(working[start + 1..end - 1].to_string());
            working = remove_span(&working, start, end);
        }

        if let Some((start, end, inner)) = find_parenthetical(&working) {
            setting = Some(inner);
            working = remove_span(&working, start, end);
        }

        if let Some((start, end, prefix, digits)) = find_hymnal_ref(&working) {
            hymnal_number = Some(if prefix == 'H' {
                digits
            } else {
                format!("S{}", digits)
            });
            hymnal_name = Some(HYMNAL_NAME.to_string());
            working = remove_span(&working, start, end);
        }

        SongIdentifier {
            raw: raw_title.to_string(),
            title: working.trim().trim_end_matches('-').trim().to_string(),
            hymnal_number,
            hymnal_name,
            verses,
            setting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_title() {
        let id = SongIdentifier::parse("Build My Life");
        assert_eq!(id.title, "Build My Life");
        assert!(id.hymnal_number.is_none());
        assert!(id.verses.is_none());
        assert!(id.setting.is_none());
    }

    #[test]
    fn test_hymnal_ref_with_verses() {
        let id = SongIdentifier::parse("All Creatures of Our God and King H400 (V1,3-4)");
        assert_eq!(id.title, "All Creatures of Our God and King");
        assert_eq!(id.hymnal_number.as_deref(), Some("400"));
        assert_eq!(id.hymnal_name.as_deref(), Some("Hymnal 1982"));
        assert_eq!(id.verses.as_deref(), Some("V1,3-4"));
    }

    #[test]
    fn test_service_music_ref_with_setting() {
        let id = SongIdentifier::parse("S129 (Powell)");
        assert_eq!(id.hymnal_number.as_deref(), Some("S129"));
        assert_eq!(id.setting.as_deref(), Some("Powell"));
        assert_eq!(id.title, "");
    }

    #[test]
    fn test_words_starting_with_h_are_not_refs() {
        let id = SongIdentifier::parse("Holy Holy Holy H362");
        assert_eq!(id.title, "Holy Holy Holy");
        assert_eq!(id.hymnal_number.as_deref(), Some("362"));
    }
}
