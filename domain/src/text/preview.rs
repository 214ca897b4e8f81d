//! Single-line previews of user text for log output.

use std::borrow::Cow;

/// Collapse `text` onto one line and cap it at `max_chars` characters.
///
/// Newlines become `⏎`; truncated previews end with `...` and stay within
/// `max_chars` overall.
pub fn preview(text: &str, max_chars: usize) -> Cow<'_, str> {
    let needs_collapse = text.contains(|c: char| c == '\n' || c == '\r');
    let char_count = text.chars().count();
    if !needs_collapse && char_count <= max_chars {
        return Cow::Borrowed(text);
    }

    let collapsed = text.chars().filter(|c| *c != '\r').map(|c| if c == '\n' { '⏎' } else { c });
    if char_count <= max_chars {
        return Cow::Owned(collapsed.collect());
    }

    let keep = max_chars.saturating_sub(3);
    let mut out: String = collapsed.take(keep).collect();
    out.push_str("...");
    Cow::Owned(out)
}
