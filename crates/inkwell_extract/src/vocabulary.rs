//! Word lists consulted by the deterministic rules.

use std::collections::BTreeSet;

const STOP_WORDS: &[&str] = &[
    "INT", "EXT", "INT.", "EXT.", "I/E", "CUT TO", "CUT TO:", "FADE IN", "FADE IN:", "FADE OUT",
    "FADE OUT.", "FADE TO", "FADE TO BLACK", "DISSOLVE TO", "SMASH CUT", "MATCH CUT", "CONTINUED",
    "CONT'D", "MORE", "THE END", "END", "V.O.", "O.S.", "O.C.", "POV", "ANGLE ON", "CLOSE UP",
    "CLOSE ON", "WIDE", "WIDE SHOT", "INSERT", "BACK TO SCENE", "FLASHBACK", "END FLASHBACK",
    "MONTAGE", "END MONTAGE", "INTERCUT", "TITLE", "SUPER", "CAPTION", "SFX", "SETTING", "PAGE",
    "PANEL", "SPLASH", "SPLASH PAGE", "NOTE", "TBD", "OK", "NO", "YES", "HEY", "WHAT", "STOP",
];

const ITEM_VERBS: &[&str] = &[
    "picks up", "grabs", "draws", "hands", "holds", "takes", "pulls out", "lifts", "raises",
    "drops", "pockets", "wields", "carries", "clutches", "unsheathes", "retrieves", "opens",
    "loads", "tosses", "throws", "gives",
];

const ITEM_KEYWORDS: &[&str] = &[
    "sword", "blade", "knife", "dagger", "gun", "pistol", "rifle", "revolver", "bow", "axe",
    "staff", "wand", "key", "keys", "letter", "note", "map", "book", "journal", "diary", "ring",
    "amulet", "necklace", "locket", "pendant", "crown", "phone", "camera", "bag", "box", "case",
    "briefcase", "satchel", "lantern", "torch", "flashlight", "compass", "coin", "coins", "bottle",
    "vial", "potion", "scroll", "photo", "photograph", "envelope", "badge", "watch", "device",
    "orb", "shield",
];

const ARTICLES: &[&str] = &[
    "a", "an", "the", "his", "her", "their", "its", "my", "your", "our", "some", "this", "that",
];

const TIME_WORDS: &[&str] = &[
    "DAY", "NIGHT", "MORNING", "AFTERNOON", "EVENING", "DUSK", "DAWN", "NOON", "MIDNIGHT",
    "SUNSET", "SUNRISE", "LATER", "CONTINUOUS", "MOMENTS LATER", "SAME", "SAME TIME",
];

/// Immutable word lists for the deterministic rules.
///
/// Stop words and time words are compared in uppercase; item verbs, item
/// keywords and articles in lowercase.
///
/// # Examples
///
/// ```
/// use inkwell_extract::Vocabulary;
///
/// let vocabulary = Vocabulary::default();
/// assert!(vocabulary.is_stop_word("Cut to"));
/// assert!(vocabulary.is_item_keyword("Sword"));
///
/// let custom = Vocabulary::default().with_item_keywords(["hammer"]);
/// assert!(custom.is_item_keyword("hammer"));
/// assert!(!custom.is_item_keyword("sword"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct Vocabulary {
    /// Screenplay keywords never treated as names
    stop_words: BTreeSet<String>,
    /// Verbs introducing a held object, in match order
    item_verbs: Vec<String>,
    /// Nouns that end an item phrase
    item_keywords: BTreeSet<String>,
    /// Articles and possessives skipped before an item phrase
    articles: BTreeSet<String>,
    /// Time-of-day words
    time_words: BTreeSet<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            stop_words: upper_set(STOP_WORDS.iter().copied()),
            item_verbs: ITEM_VERBS.iter().map(|v| v.to_lowercase()).collect(),
            item_keywords: lower_set(ITEM_KEYWORDS.iter().copied()),
            articles: lower_set(ARTICLES.iter().copied()),
            time_words: upper_set(TIME_WORDS.iter().copied()),
        }
    }
}

fn upper_set<'a>(words: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    words.into_iter().map(|w| w.trim().to_uppercase()).collect()
}

fn lower_set<'a>(words: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    words.into_iter().map(|w| w.trim().to_lowercase()).collect()
}

impl Vocabulary {
    /// Replace the stop-word list.
    pub fn with_stop_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.stop_words = upper_set(words);
        self
    }

    /// Replace the item verbs.
    pub fn with_item_verbs<'a>(mut self, verbs: impl IntoIterator<Item = &'a str>) -> Self {
        self.item_verbs = verbs.into_iter().map(|v| v.trim().to_lowercase()).collect();
        self
    }

    /// Replace the item keywords.
    pub fn with_item_keywords<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.item_keywords = lower_set(words);
        self
    }

    /// Replace the article list.
    pub fn with_articles<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.articles = lower_set(words);
        self
    }

    /// Replace the time-of-day words.
    pub fn with_time_words<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.time_words = upper_set(words);
        self
    }

    /// Whether `phrase` is a screenplay keyword.
    pub fn is_stop_word(&self, phrase: &str) -> bool {
        let upper = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        self.stop_words.contains(&upper)
            || self
                .stop_words
                .contains(upper.trim_end_matches(|c: char| !c.is_alphanumeric()))
    }

    /// Whether `word` ends an item phrase.
    pub fn is_item_keyword(&self, word: &str) -> bool {
        self.item_keywords.contains(&word.to_lowercase())
    }

    /// Whether `word` is an article or possessive.
    pub fn is_article(&self, word: &str) -> bool {
        self.articles.contains(&word.to_lowercase())
    }

    /// Whether `phrase` names a time of day.
    pub fn is_time_word(&self, phrase: &str) -> bool {
        let upper = phrase.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        self.time_words.contains(&upper)
    }
}
