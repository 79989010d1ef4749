//! Stop-token trimming.

/// Truncate `text` at the earliest occurrence of any stop sequence.
///
/// Returns `text` unchanged when the list is empty or nothing matches.
/// Matching is literal, not pattern-based, and empty stop sequences are
/// ignored. Idempotent: trimming already-trimmed text is a no-op.
pub fn enforce_stop_tokens<'a>(text: &'a str, stop: &[String]) -> &'a str {
    let cut = stop
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min();

    match cut {
        Some(index) => &text[..index],
        None => text,
    }
}
