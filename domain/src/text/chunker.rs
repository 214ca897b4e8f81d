//! Line-preserving text chunker.
//!
//! Splits an outbound text block into segments that fit a remote
//! platform's message-size limit without ever cutting a line.
//!
//! Lengths are measured in characters (`char`s), matching how chat
//! platforms count their limits.
//!
//! ```text
//! "line1\nline2\nline3\n", limit 12
//!   -> rstrip -> "line1\nline2\nline3"
//!   -> ["line1\nline2\n", "line3"]
//! ```
//!
//! A single line longer than the limit is emitted as its own oversized
//! chunk.

/// Split `text` into chunks of at most `limit` characters, breaking only
/// at line boundaries.
///
/// The input is right-trimmed first. Concatenating the returned chunks
/// reproduces the trimmed input exactly. Returns an empty vector when the
/// trimmed input is empty, which includes non-empty input made only of
/// whitespace such as `" \n"`: there is nothing to send.
pub fn chunk(text: &str, limit: usize) -> Vec<String> {
    let trimmed = text.trim_end();
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in trimmed.split_inclusive('\n') {
        let line_len = line.chars().count();
        if !current.is_empty() && current_len + line_len > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_boundary_packing() {
        let chunks = chunk("line1\nline2\nline3\n", 12);
        assert_eq!(chunks, vec!["line1\nline2\n", "line3"]);
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        assert_eq!(chunk("hello", 500), vec!["hello"]);
    }

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        assert_eq!(chunk("a\nb \n\n\t ", 100), vec!["a\nb"]);
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert!(chunk("", 10).is_empty());
        assert!(chunk(" \n\t\n", 10).is_empty());
        assert!(chunk(" \n", 10).is_empty());
    }

    #[test]
    fn test_oversized_line_is_not_split() {
        let long = "x".repeat(30);
        let text = format!("short\n{}\ntail", long);
        let chunks = chunk(&text, 10);
        assert_eq!(chunks, vec!["short\n".to_string(), format!("{}\n", long), "tail".to_string()]);
    }

    #[test]
    fn test_concatenation_reproduces_trimmed_input() {
        let text = "====== Player list ======\nsteve\nalex\nherobrine\nnotch\njeb_\n\n";
        for limit in [1, 5, 10, 26, 40, 1000] {
            let chunks = chunk(text, limit);
            assert_eq!(chunks.concat(), text.trim_end(), "limit {}", limit);
            for c in &chunks {
                let single_line = c.trim_end_matches('\n').lines().count() <= 1;
                assert!(
                    c.chars().count() <= limit || single_line,
                    "chunk {:?} exceeds limit {}",
                    c,
                    limit
                );
            }
        }
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        // 3 characters + newline each, 9 bytes + newline each
        let chunks = chunk("日本語\n日本語\n", 8);
        assert_eq!(chunks, vec!["日本語\n日本語"]);
    }

    #[test]
    fn test_deterministic() {
        let text = "a\nbb\nccc\ndddd\n";
        assert_eq!(chunk(text, 5), chunk(text, 5));
    }

    #[test]
    fn test_zero_limit_puts_each_line_alone() {
        assert_eq!(chunk("a\nb\nc", 0), vec!["a\n", "b\n", "c"]);
    }
}
