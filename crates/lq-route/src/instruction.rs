//! Cleaning of provider instruction text.

/// Instruction used when the provider sends an empty one.
pub const DEFAULT_INSTRUCTION: &str = "Continue straight";

/// Remove markup tags, decode the common HTML entities, and collapse runs
/// of whitespace.
///
/// ```
/// use lq_route::instruction::strip_markup;
///
/// assert_eq!(strip_markup("Turn <b>left</b> onto  <b>EM&nbsp;Bypass</b>"), "Turn left onto EM Bypass");
/// ```
pub fn strip_markup(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_tag = false;
    for ch in raw.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // Tags such as <br/> separate words.
                text.push(' ');
            }
            _ if in_tag => {}
            _ => text.push(ch),
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [`strip_markup`], then substitute [`DEFAULT_INSTRUCTION`] for blank text.
pub fn normalize(raw: &str) -> String {
    let text = strip_markup(raw);
    if text.is_empty() { DEFAULT_INSTRUCTION.to_string() } else { text }
}
