// Static reference corpus: psalter, proper prefaces, POP forms, collects,
// and fixed prayers.
//
// The data is embedded at compile time and parsed once, on first access,
// behind a Lazy static. Nothing mutates it afterwards, so every resolver
// can read it concurrently without locking.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;

/// One psalm's verses in half-verse structure, keyed by verse number.
/// The psalter is sparse: only the psalms and verses the parish prints
/// are carried, and lookups tolerate the gaps.
#[derive(Debug, Clone, Deserialize)]
pub struct PsalmText {
    /// Traditional Latin incipit, e.g. "Dominus regit me"
    #[serde(default)]
    pub latin: String,
    pub verses: BTreeMap<u32, PsalmVerseText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PsalmVerseText {
    pub first_half: String,
    #[serde(default)]
    pub second_half: Vec<String>,
}

/// A proper preface: either a single text or a list of options the
/// officiant chooses among (Lent, Lord's Day).
#[derive(Debug, Clone, Deserialize)]
pub struct Preface {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<PrefaceOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrefaceOption {
    pub key: String,
    pub label: String,
    pub text: String,
}

/// One Prayers-of-the-People form as an ordered element list.
#[derive(Debug, Clone, Deserialize)]
pub struct PopForm {
    pub label: String,
    pub elements: Vec<PopElement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PopElement {
    /// "leader" or "people"
    pub role: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
    psalter: BTreeMap<u32, PsalmText>,
    prefaces: BTreeMap<String, Preface>,
    pop_forms: BTreeMap<String, PopForm>,
    collects: BTreeMap<String, String>,
    prayers: BTreeMap<String, String>,
}

static CORPUS: Lazy<Corpus> = Lazy::new(|| Corpus {
    psalter: parse_embedded("psalter", include_str!("../data/psalter.json")),
    prefaces: parse_embedded("prefaces", include_str!("../data/prefaces.json")),
    pop_forms: parse_embedded("pop_forms", include_str!("../data/pop_forms.json")),
    collects: parse_embedded("collects", include_str!("../data/collects.json")),
    prayers: parse_embedded("prayers", include_str!("../data/prayers.json")),
});

fn parse_embedded<T: serde::de::DeserializeOwned>(name: &str, json: &str) -> T {
    serde_json::from_str(json)
        .unwrap_or_else(|e| panic!("embedded corpus file '{}' is invalid: {}", name, e))
}

/// The process-wide corpus, loaded on first use.
pub fn corpus() -> &'static Corpus {
    &CORPUS
}

impl Corpus {
    pub fn psalm(&self, number: u32) -> Option<&PsalmText> {
        self.psalter.get(&number)
    }

    /// Collect of the Day for a liturgical title. Matching is fuzzy:
    /// exact key first, then case-insensitive, then bidirectional
    /// substring (so "Pentecost" finds "Day of Pentecost / Whitsunday").
    pub fn collect_for_title(&self, liturgical_title: &str) -> Option<&str> {
        let title = liturgical_title.trim();

        if let Some(text) = self.collects.get(title) {
            return Some(text);
        }

        let title_lower = title.to_lowercase();
        for (key, text) in &self.collects {
            if key.to_lowercase() == title_lower {
                return Some(text);
            }
        }

        for (key, text) in &self.collects {
            let key_lower = key.to_lowercase();
            if key_lower.contains(&title_lower) || title_lower.contains(&key_lower) {
                return Some(text);
            }
        }

        None
    }

    /// Preface text by key, with the option sub-key for multi-option
    /// prefaces (Lent, Lord's Day).
    pub fn preface_text(&self, preface_key: &str, option_key: Option<&str>) -> Option<&str> {
        let entry = self.prefaces.get(preface_key)?;
        match option_key {
            Some(opt) => entry
                .options
                .iter()
                .find(|o| o.key == opt)
                .map(|o| o.text.as_str()),
            None if !entry.text.is_empty() => Some(entry.text.as_str()),
            None => None,
        }
    }

    /// (key, label) pairs for a multi-option preface, in printed order.
    /// Empty for single-text prefaces.
    pub fn preface_option_labels(&self, preface_key: &str) -> Vec<(&str, &str)> {
        self.prefaces
            .get(preface_key)
            .map(|entry| {
                entry
                    .options
                    .iter()
                    .map(|o| (o.key.as_str(), o.label.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn pop_form(&self, form_key: &str) -> Option<&PopForm> {
        self.pop_forms.get(form_key)
    }

    /// Fixed prayer text by stable key, e.g. "collect_for_purity".
    pub fn prayer(&self, key: &str) -> Option<&str> {
        self.prayers.get(key).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_loads() {
        let c = corpus();
        assert!(c.psalm(23).is_some());
        assert!(c.psalm(999).is_none());
        assert!(c.prayer("collect_for_purity").is_some());
    }

    #[test]
    fn test_collect_fuzzy_matching() {
        let c = corpus();
        assert!(c.collect_for_title("First Sunday in Lent").is_some());
        assert!(c.collect_for_title("first sunday in lent").is_some());
        // Substring in either direction
        assert!(c.collect_for_title("Pentecost").is_some());
        assert!(c.collect_for_title("No Such Feast").is_none());
    }

    #[test]
    fn test_preface_lookup() {
        let c = corpus();
        assert!(c.preface_text("easter", None).is_some());
        // Multi-option prefaces require the option key
        assert!(c.preface_text("lords_day", None).is_none());
        assert!(c.preface_text("lords_day", Some("of_god_the_son")).is_some());

        let labels = c.preface_option_labels("lords_day");
        assert_eq!(labels.len(), 3);
        assert_eq!(labels[0].0, "of_god_the_father");
    }
}
