/// Characters that markdown uses for emphasis, headings and code.
const MARKUP_CHARS: [char; 4] = ['*', '_', '#', '`'];

/// Prepares model output for speech synthesis: drops markup characters,
/// collapses whitespace runs to one space and trims the ends.
pub fn clean(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !MARKUP_CHARS.contains(c)).collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
