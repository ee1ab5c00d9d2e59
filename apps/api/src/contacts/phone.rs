/// Canonical comparison key for a phone string: drops spaces, `+`, `(`, `)` and `-`.
/// Everything else passes through, so malformed input normalizes to whatever remains.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '+' | '(' | ')' | '-'))
        .collect()
}
