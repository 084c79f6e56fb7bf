//! Utilities for extracting JSON from model responses.
//!
//! Models often wrap JSON in markdown code fences or surround it with
//! explanatory text. These helpers recover the JSON document.

use inkwell_error::{ResponseFormatError, ResponseFormatErrorKind};
use serde::de::DeserializeOwned;

/// Extract JSON from a response that may contain markdown or extra text.
///
/// Tries, in order:
/// 1. Markdown code blocks: ```json ... ``` or bare ``` ... ```
/// 2. Balanced braces or brackets, whichever opens first
///
/// # Errors
///
/// Returns [`ResponseFormatErrorKind::NoJson`] if no JSON is found.
///
/// # Examples
///
/// ```
/// use inkwell_extract::extract_json;
///
/// let response = "Here you go:\n```json\n{\"entities\": []}\n```\n";
/// assert_eq!(extract_json(response).unwrap(), "{\"entities\": []}");
///
/// let bare = "Sure! {\"ink\": [{\"page\": 1}]} Hope that helps.";
/// assert_eq!(extract_json(bare).unwrap(), "{\"ink\": [{\"page\": 1}]}");
/// ```
pub fn extract_json(response: &str) -> Result<String, ResponseFormatError> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');

    let extracted = match (bracket_pos, brace_pos) {
        (Some(b_pos), Some(c_pos)) if b_pos < c_pos => extract_balanced(response, '[', ']')
            .or_else(|| extract_balanced(response, '{', '}')),
        (Some(_), None) => extract_balanced(response, '[', ']'),
        _ => extract_balanced(response, '{', '}').or_else(|| extract_balanced(response, '[', ']')),
    };

    extracted.ok_or_else(|| {
        tracing::error!(response_length = response.len(), "No JSON found in model response");
        ResponseFormatError::new(ResponseFormatErrorKind::NoJson(response.len()))
    })
}

/// Extract JSON from `response` and deserialize it.
///
/// Text that is not JSON is [`ResponseFormatErrorKind::InvalidJson`]; JSON of
/// the wrong shape is [`ResponseFormatErrorKind::Schema`].
///
/// # Examples
///
/// ```
/// use inkwell_extract::parse_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Beat {
///     page: u32,
/// }
///
/// let beat: Beat = parse_json("```\n{\"page\": 3}\n```").unwrap();
/// assert_eq!(beat.page, 3);
/// assert!(parse_json::<Beat>("{\"page\": \"three\"}").is_err());
/// ```
pub fn parse_json<T: DeserializeOwned>(response: &str) -> Result<T, ResponseFormatError> {
    let json = extract_json(response)?;
    let value: serde_json::Value = serde_json::from_str(&json).map_err(|e| {
        tracing::error!(error = %e, "Model response is not valid JSON");
        ResponseFormatError::new(ResponseFormatErrorKind::InvalidJson(e.to_string()))
    })?;
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(error = %e, "Model response does not match the output contract");
        ResponseFormatError::new(ResponseFormatErrorKind::Schema(e.to_string()))
    })
}

/// Content of the first markdown code block, if any.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let content_start = start + 3;
    // Skip the language tag, if present
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    match response[skip_to..].find("```") {
        Some(end) => Some(response[skip_to..skip_to + end].trim().to_string()),
        // Truncated response: take everything after the opening fence
        None => Some(response[skip_to..].trim().to_string()),
    }
}

/// Content between the first `open` and its matching `close`.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_before_object_is_preferred() {
        let json = extract_json("result: [{\"a\": 1}] trailing {\"b\": 2}").unwrap();
        assert_eq!(json, "[{\"a\": 1}]");
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let json = extract_json(r#"{"snippet": "a } brace", "n": 1}"#).unwrap();
        assert_eq!(json, r#"{"snippet": "a } brace", "n": 1}"#);
    }

    #[test]
    fn test_unterminated_fence_takes_the_rest() {
        let json = extract_json("```json\n{\"x\": 1}").unwrap();
        assert_eq!(json, "{\"x\": 1}");
    }

    #[test]
    fn test_prose_only_is_no_json() {
        let err = extract_json("I could not find any entities.").unwrap_err();
        assert_eq!(err.kind, ResponseFormatErrorKind::NoJson(30));
    }

    #[test]
    fn test_malformed_json_is_invalid_json() {
        let err = parse_json::<serde_json::Value>("{\"a\": }").unwrap_err();
        assert!(matches!(err.kind, ResponseFormatErrorKind::InvalidJson(_)));
    }
}
