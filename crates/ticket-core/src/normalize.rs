/// Characters dropped wherever they appear.
const QUOTE_CHARS: &[char] = &['"', '«', '»', '“', '”'];

/// Characters stripped from the end of a field.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Canonicalize a title or description for comparison.
///
/// Lowercases, removes quote characters, collapses whitespace runs to one
/// space and strips any trailing run of punctuation and spaces.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let unquoted: String = lowered.chars().filter(|c| !QUOTE_CHARS.contains(c)).collect();
    let collapsed = unquoted.split_whitespace().collect::<Vec<&str>>().join(" ");
    collapsed
        .trim_end_matches(|c: char| TRAILING_PUNCTUATION.contains(&c) || c == ' ')
        .to_string()
}

/// Normalize an optional field; absent input yields an empty string.
pub fn normalize_field(text: Option<&str>) -> String {
    text.map(normalize_text).unwrap_or_default()
}
