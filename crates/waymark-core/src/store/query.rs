/// Turns free text into an FTS prefix query: every run of word characters
/// (alphanumerics and `_`) becomes a `piece*` term. Returns `None` when the
/// text has no word characters at all.
#[must_use]
pub fn tokenize_query(text: &str) -> Option<String> {
    let terms = text
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|piece| !piece.is_empty())
        .map(|piece| format!("{piece}*"))
        .collect::<Vec<_>>();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}
