// Seasonal rules engine: everything the service order varies on.
//
// One liturgical day's title, color, notes, and Prayers-of-the-People
// designation fully determine which opening the service uses, which
// acclamation and fraction dialogue apply, whether Alleluias frame the
// dismissal, which POP form is printed, and which proper preface is
// inserted into the Eucharistic prayer. All of it is derived here, in
// one pass, so the precedence stays auditable in a single place.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Advent,
    Christmas,
    Epiphany,
    Lent,
    Easter,
    PentecostDay,
    Ordinary,
}

impl Season {
    /// Stable lowercase key, matching the reference-corpus keys.
    pub fn key(&self) -> &'static str {
        match self {
            Season::Advent => "advent",
            Season::Christmas => "christmas",
            Season::Epiphany => "epiphany",
            Season::Lent => "lent",
            Season::Easter => "easter",
            Season::PentecostDay => "pentecost_day",
            Season::Ordinary => "ordinary",
        }
    }

    /// Easter Day through the Day of Pentecost inclusive.
    pub fn in_easter_season(&self) -> bool {
        matches!(self, Season::Easter | Season::PentecostDay)
    }

    /// Lent, including Holy Week.
    pub fn is_lent(&self) -> bool {
        matches!(self, Season::Lent)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Classify the liturgical season from the day's title and color.
///
/// Keyword tests run in a fixed precedence order; the color fallback only
/// applies when no keyword matches. Total: every input yields a season.
pub fn classify_season(title: &str, color: &str) -> Season {
    let t = title.to_lowercase();

    if t.contains("advent") {
        return Season::Advent;
    }
    if t.contains("christmas") || t.contains("christmastide") {
        return Season::Christmas;
    }
    if t.contains("epiphany") {
        return Season::Epiphany;
    }
    if t.contains("ash wednesday") || t.contains("lent") {
        return Season::Lent;
    }
    // Holy Week is liturgically part of Lent
    if t.contains("palm sunday")
        || t.contains("passion")
        || t.contains("maundy")
        || t.contains("good friday")
        || t.contains("holy saturday")
    {
        return Season::Lent;
    }
    if t.contains("easter") {
        return Season::Easter;
    }
    // Ascension falls within the Easter season
    if t.contains("ascension") {
        return Season::Easter;
    }
    if t.contains("pentecost") && !t.contains("after") {
        return Season::PentecostDay;
    }
    if t.contains("trinity") || t.contains("proper") || t.contains("pentecost") {
        return Season::Ordinary;
    }

    // No keyword matched: fall back on the vestment color
    match color.to_lowercase().as_str() {
        "violet" | "purple" => Season::Lent,
        "red" => Season::PentecostDay,
        _ => Season::Ordinary,
    }
}

// --- OPENING ACCLAMATIONS ---
// The "{cross}" placeholder is substituted with the cross glyph by the
// rendering layer.

const ACCLAMATION_STANDARD: (&str, &str) = (
    "Blessed be God: {cross} Father, Son, and Holy Spirit.",
    "And blessed be his kingdom, now and for ever. Amen.",
);

const ACCLAMATION_LENT: (&str, &str) = (
    "Bless the Lord who forgives all our sins.",
    "His mercy endures forever.",
);

const ACCLAMATION_EASTER: (&str, &str) = (
    "Alleluia. Christ is risen.",
    "The Lord is risen indeed. Alleluia.",
);

// --- BREAKING OF THE BREAD ---

const FRACTION_ALLELUIA: (&str, &str) = (
    "Alleluia. Christ our Passover is sacrificed for us;",
    "Therefore let us keep the feast. Alleluia.",
);

const FRACTION_NO_ALLELUIA: (&str, &str) = (
    "Christ our Passover is sacrificed for us;",
    "Therefore let us keep the feast.",
);

// --- DISMISSALS ---
// Numbered 1-4 in printed order; the schedule's dismissal column maps
// directly onto these.

const DISMISSALS: [(&str, (&str, &str)); 4] = [
    ("1", ("Let us go forth in the name of Christ.", "Thanks be to God.")),
    ("2", ("Go in peace to love and serve the Lord.", "Thanks be to God.")),
    (
        "3",
        (
            "Let us go forth into the world, rejoicing in the power of the Spirit.",
            "Thanks be to God.",
        ),
    ),
    ("4", ("Let us bless the Lord.", "Thanks be to God.")),
];

/// Dismissal text for a schedule dismissal number, with the double
/// Alleluia appended during the Easter season. Unknown numbers fall back
/// to the third form.
pub fn dismissal_text(dismissal_num: &str, has_alleluia: bool) -> (String, String) {
    let base = DISMISSALS
        .iter()
        .find(|(num, _)| *num == dismissal_num.trim())
        .map(|(_, texts)| *texts)
        .unwrap_or(DISMISSALS[2].1);

    if has_alleluia {
        (
            format!("{}. Alleluia, alleluia.", base.0.trim_end_matches('.')),
            format!("{}. Alleluia, alleluia.", base.1.trim_end_matches('.')),
        )
    } else {
        (base.0.to_string(), base.1.to_string())
    }
}

/// All seasonal decisions for one service, derived together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalRules {
    pub season: Season,

    // Structure
    pub use_penitential_order: bool,
    pub use_decalogue: bool,
    pub confession_before_word: bool,
    pub no_confession_after_pop: bool,
    pub include_collect_for_purity: bool,

    // Opening Acclamation
    pub acclamation_celebrant: String,
    pub acclamation_people: String,

    // Song of Praise / Kyrie
    pub song_of_praise_label: String,
    pub is_advent: bool,

    // Breaking of the Bread
    pub use_fraction_anthem: bool,
    pub fraction_celebrant: String,
    pub fraction_people: String,

    // Post-communion
    pub use_prayer_over_people: bool,
    pub blessing_label: String,

    // Dismissal
    pub dismissal_has_alleluia: bool,

    // Prayers of the People
    pub pop_form_key: String,
    pub pop_has_confession: bool,

    // Proper Preface
    pub preface_key: String,
    pub preface_options: Vec<String>,
    pub prompt_preface: bool,
}

impl SeasonalRules {
    /// Derive every seasonal decision from the schedule fields.
    ///
    /// Total and referentially transparent: the same inputs always
    /// produce the same record, and unmatched combinations fall through
    /// to ordinary-time behavior.
    pub fn derive(title: &str, color: &str, notes: &str, pop_form: &str) -> Self {
        let season = classify_season(title, color);
        let is_lent = season.is_lent();
        let is_easter = season.in_easter_season();
        let is_advent = season == Season::Advent;

        // Penitential Order on all Sundays in Lent; Decalogue on Lent 1 only
        let use_penitential = is_lent;
        let use_decalogue = is_lent && is_lent_1(title);

        let (acc_cel, acc_ppl) = if use_penitential {
            ACCLAMATION_LENT
        } else if is_easter {
            ACCLAMATION_EASTER
        } else {
            ACCLAMATION_STANDARD
        };

        let song_of_praise_label = if is_lent {
            "Kyrie"
        } else if is_advent {
            "Song of Praise and Lighting of the Advent Wreath"
        } else {
            "Song of Praise"
        };

        // Lent replaces the fraction dialogue with a sung anthem
        let (use_fraction, frac_cel, frac_ppl) = if is_lent {
            (true, "", "")
        } else if is_easter {
            (false, FRACTION_ALLELUIA.0, FRACTION_ALLELUIA.1)
        } else {
            (false, FRACTION_NO_ALLELUIA.0, FRACTION_NO_ALLELUIA.1)
        };

        let (use_pop_prayer, blessing_label) = if is_lent {
            (true, "Prayer over the People")
        } else {
            (false, "Blessing")
        };

        let pop_confession = pop_has_confession(pop_form, notes);
        let pop_form_key = pop_form_key(title, pop_form, is_advent, pop_confession);

        let (preface_key, preface_options, prompt_preface) = preface_selection(title, season);

        SeasonalRules {
            season,
            use_penitential_order: use_penitential,
            use_decalogue,
            confession_before_word: use_penitential,
            no_confession_after_pop: use_penitential || pop_confession,
            include_collect_for_purity: !use_penitential,
            acclamation_celebrant: acc_cel.to_string(),
            acclamation_people: acc_ppl.to_string(),
            song_of_praise_label: song_of_praise_label.to_string(),
            is_advent,
            use_fraction_anthem: use_fraction,
            fraction_celebrant: frac_cel.to_string(),
            fraction_people: frac_ppl.to_string(),
            use_prayer_over_people: use_pop_prayer,
            blessing_label: blessing_label.to_string(),
            dismissal_has_alleluia: is_easter,
            pop_form_key,
            pop_has_confession: pop_confession,
            preface_key: preface_key.to_string(),
            preface_options: preface_options.iter().map(|s| s.to_string()).collect(),
            prompt_preface,
        }
    }

    /// Dismissal lines for this service given the schedule's number.
    pub fn dismissal(&self, dismissal_num: &str) -> (String, String) {
        dismissal_text(dismissal_num, self.dismissal_has_alleluia)
    }
}

/// First Sunday in Lent, the one day with the Decalogue opening.
/// Tolerates compact titles like "Lent 1".
fn is_lent_1(title: &str) -> bool {
    let t = title.to_lowercase();
    (t.contains("first sunday") && t.contains("lent")) || t.replace(' ', "").contains("lent1")
}

/// The POP form carries its own confession when the schedule marks it
/// "(w/ confession)" in either the form designation or the notes.
fn pop_has_confession(pop_form: &str, notes: &str) -> bool {
    let combined = format!("{} {}", pop_form, notes).to_lowercase();
    combined.contains("w/ confession") || combined.contains("with confession")
}

/// Map the schedule's POP designation to a corpus form key.
fn pop_form_key(title: &str, pop_form: &str, is_advent: bool, pop_confession: bool) -> String {
    // The confession-bearing form overrides everything else
    if pop_confession {
        return "form_VI".to_string();
    }

    // Advent uses week-specific forms keyed off the title ordinal
    if is_advent {
        let t = title.to_lowercase();
        let compact = t.replace(' ', "");
        if t.contains("first") || compact.contains('1') {
            return "advent_I".to_string();
        }
        if t.contains("second") || compact.contains('2') {
            return "advent_II".to_string();
        }
        if t.contains("third") || compact.contains('3') {
            return "advent_III".to_string();
        }
        if t.contains("fourth") || compact.contains('4') {
            return "advent_IV".to_string();
        }
    }

    // Standard forms: Roman or Arabic 1-6, ignoring any parenthetical
    let designation = pop_form.split('(').next().unwrap_or("").trim();
    let key = match designation {
        "I" | "1" => "form_I",
        "II" | "2" => "form_II",
        "III" | "3" => "form_III",
        "IV" | "4" => "form_IV",
        "V" | "5" => "form_V",
        "VI" | "6" => "form_VI",
        _ => "form_I",
    };
    key.to_string()
}

/// Palm Sunday through Holy Saturday.
fn is_holy_week(title: &str) -> bool {
    let t = title.to_lowercase();
    ["palm sunday", "passion", "maundy", "good friday", "holy saturday", "holy week"]
        .iter()
        .any(|kw| t.contains(kw))
}

/// Proper preface selection: (corpus key, option sub-keys, user choice needed).
///
/// Special occasions take precedence over the season; ordinary-time
/// Sundays use the Lord's Day preface with its three options.
fn preface_selection(title: &str, season: Season) -> (&'static str, &'static [&'static str], bool) {
    let t = title.to_lowercase();

    if t.contains("trinity") {
        return ("trinity", &[], false);
    }
    if t.contains("ascension") {
        return ("ascension", &[], false);
    }
    if is_holy_week(title) {
        return ("holy_week", &[], false);
    }

    match season {
        Season::Advent => ("advent", &[], false),
        Season::Christmas => ("incarnation", &[], false),
        Season::Epiphany => ("epiphany", &[], false),
        Season::Lent => ("lent", &["option_1", "option_2"], true),
        Season::Easter => ("easter", &[], false),
        Season::PentecostDay => ("pentecost", &[], false),
        Season::Ordinary => (
            "lords_day",
            &["of_god_the_father", "of_god_the_son", "of_god_the_holy_spirit"],
            true,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_precedence() {
        // Title keywords beat the color fallback
        assert_eq!(classify_season("First Sunday of Advent", "Violet"), Season::Advent);
        assert_eq!(classify_season("Ash Wednesday", "Violet"), Season::Lent);
        assert_eq!(classify_season("Palm Sunday", "Red"), Season::Lent);
        assert_eq!(classify_season("Ascension Day", "White"), Season::Easter);
        // "Pentecost" with "after" is ordinary time, without it the feast day
        assert_eq!(classify_season("Day of Pentecost", "Red"), Season::PentecostDay);
        assert_eq!(
            classify_season("Second Sunday after Pentecost", "Green"),
            Season::Ordinary
        );
        assert_eq!(classify_season("Trinity Sunday", "White"), Season::Ordinary);
    }

    #[test]
    fn test_color_fallback() {
        assert_eq!(classify_season("Some Feast", "Purple"), Season::Lent);
        assert_eq!(classify_season("Some Feast", "red"), Season::PentecostDay);
        assert_eq!(classify_season("Some Feast", "Green"), Season::Ordinary);
        assert_eq!(classify_season("Some Feast", ""), Season::Ordinary);
    }

    #[test]
    fn test_lent_1_detection() {
        assert!(is_lent_1("First Sunday in Lent"));
        assert!(is_lent_1("Lent 1"));
        assert!(!is_lent_1("Third Sunday in Lent"));
    }

    #[test]
    fn test_pop_form_keys() {
        assert_eq!(pop_form_key("Proper 11", "III", false, false), "form_III");
        assert_eq!(pop_form_key("Proper 11", "4", false, false), "form_IV");
        assert_eq!(pop_form_key("Proper 11", "VI (w/ confession)", false, true), "form_VI");
        // Unparseable designations default to Form I
        assert_eq!(pop_form_key("Proper 11", "custom", false, false), "form_I");
        assert_eq!(
            pop_form_key("Second Sunday of Advent", "I", true, false),
            "advent_II"
        );
    }

    #[test]
    fn test_dismissal_alleluia_framing() {
        let (deacon, people) = dismissal_text("1", true);
        assert_eq!(deacon, "Let us go forth in the name of Christ. Alleluia, alleluia.");
        assert_eq!(people, "Thanks be to God. Alleluia, alleluia.");

        let (deacon, _) = dismissal_text("1", false);
        assert_eq!(deacon, "Let us go forth in the name of Christ.");

        // Unknown numbers fall back to the third form
        let (deacon, _) = dismissal_text("9", false);
        assert!(deacon.starts_with("Let us go forth into the world"));
    }

    #[test]
    fn test_preface_special_days_override_season() {
        assert_eq!(preface_selection("Trinity Sunday", Season::Ordinary).0, "trinity");
        assert_eq!(preface_selection("Ascension Day", Season::Easter).0, "ascension");
        assert_eq!(preface_selection("Maundy Thursday", Season::Lent).0, "holy_week");
    }
}
