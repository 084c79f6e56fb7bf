//! Small text helpers shared by the extractors.

/// Byte spans of the whitespace-separated words in `text`.
pub(crate) fn word_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                spans.push((s, i));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, text.len()));
    }
    spans
}

/// The leading `limit` words of `text`, as a slice of the original.
///
/// Leading and trailing whitespace is dropped; inner whitespace is kept
/// verbatim so the result stays a substring of `text`.
///
/// # Examples
///
/// ```
/// use inkwell_extract::clip_words;
///
/// assert_eq!(clip_words("  one  two three ", 2), "one  two");
/// assert_eq!(clip_words("short", 12), "short");
/// ```
pub fn clip_words(text: &str, limit: usize) -> &str {
    let spans = word_spans(text);
    match (spans.first(), spans.get(limit.min(spans.len()).saturating_sub(1))) {
        (Some((start, _)), Some((_, end))) if limit > 0 => &text[*start..*end],
        _ => "",
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// # Examples
///
/// ```
/// use inkwell_extract::title_case;
///
/// assert_eq!(title_case("OLD  LIGHTHOUSE"), "Old Lighthouse");
/// assert_eq!(title_case("o'malley's pub"), "O'malley's Pub");
/// ```
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate to at most `max_chars` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Strip punctuation surrounding a word.
pub(crate) fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Whether every alphabetic character is uppercase and there are at least two.
pub(crate) fn is_shouted(word: &str) -> bool {
    let mut letters = 0;
    for ch in word.chars().filter(|c| c.is_alphabetic()) {
        if !ch.is_uppercase() {
            return false;
        }
        letters += 1;
    }
    letters >= 2
}
