use once_cell::sync::Lazy;
use regex::Regex;

/// `http`, `https` and `www` runs up to the next whitespace, plus one trailing blank.
pub static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:https?|www)\S+\s?").unwrap()
});

/// Strip URLs, then every character outside 7-bit ASCII.
///
/// Emoji and non-Latin scripts disappear along with the URLs, so language
/// detection downstream only ever sees the ASCII remainder of a title.
pub fn clean_title(title: &str) -> String {
    let mut cleaned: String = URL_REGEX
        .replace_all(title, "")
        .chars()
        .filter(char::is_ascii)
        .collect();

    // Removals can splice the surrounding text into a new URL.
    while URL_REGEX.is_match(&cleaned) {
        cleaned = URL_REGEX.replace_all(&cleaned, "").into_owned();
    }

    cleaned
}
