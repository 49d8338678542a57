const IGNORED: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', '-'];

/// Drops everything from the first `(`, folds case and strips the ignored
/// punctuation, so `"Recycle!"` and `"recycle (v)"` compare equal.
pub fn normalize(text: &str) -> String {
    let stem = match text.find('(') {
        Some(at) => &text[..at],
        None => text,
    };

    let folded: String = stem
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !IGNORED.contains(c))
        .collect();

    // punctuation next to a space would otherwise leave it dangling
    folded.trim().to_string()
}

pub fn answers_match(given: &str, expected: &str) -> bool {
    normalize(given) == normalize(expected)
}
