/// Normalized request text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestText {
    /// Words joined by single spaces.
    pub text: String,
    /// Exactly one word: look it up in the dictionary instead of translating.
    pub is_dictionary: bool,
}

/// Splits every argument on spaces and joins the non-blank words with single
/// spaces. Returns `None` when there is no word at all.
pub fn build_text<S: AsRef<str>>(params: &[S]) -> Option<RequestText> {
    let words: Vec<&str> = params
        .iter()
        .flat_map(|p| p.as_ref().split(' '))
        .map(|w| w.trim_matches([' ', '\t', '\n', '\r']))
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return None;
    }

    Some(RequestText {
        text: words.join(" "),
        is_dictionary: words.len() == 1,
    })
}

/// Joins trimmed non-empty lines with single spaces.
pub fn join_lines(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
