//! Recursive separator-based text chunker.
//!
//! Splits normalized document text into chunks of at most `max_chars`
//! characters, with consecutive chunks sharing `overlap` characters of
//! context where possible. Splitting tries separators in priority order —
//! paragraph break, line break, Bengali sentence stop (।), space — and
//! recurses into any piece that still exceeds the limit.
//!
//! Limits are counted in characters, not bytes: the corpus is Bengali and
//! almost every character is multi-byte in UTF-8.

/// Separator priority list for textbook prose.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", "।", " "];

/// Split `text` into chunks of at most `max_chars` characters.
///
/// Each separator occurrence stays attached to the piece it terminates, so
/// concatenating the chunks' non-overlapping portions reproduces `text`
/// exactly. A separator-free token longer than `max_chars` is emitted as its
/// own oversized chunk rather than being cut mid-token.
pub fn split_text(text: &str, max_chars: usize, overlap: usize, separators: &[&str]) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let pieces = split_pieces(text, max_chars, separators);
    merge_pieces(pieces, max_chars, overlap)
}

/// Recursively cut `text` into pieces of at most `max_chars` characters,
/// trying each separator in order. Pieces keep their trailing separator.
fn split_pieces(text: &str, max_chars: usize, separators: &[&str]) -> Vec<String> {
    if char_len(text) <= max_chars {
        return vec![text.to_string()];
    }
    let Some(sep_idx) = separators.iter().position(|sep| text.contains(sep)) else {
        // No separator applies: emit the oversized token as-is.
        return vec![text.to_string()];
    };
    let sep = separators[sep_idx];
    let rest = &separators[sep_idx + 1..];

    let mut pieces = Vec::new();
    for part in split_keep_separator(text, sep) {
        if char_len(&part) <= max_chars {
            pieces.push(part);
        } else {
            pieces.extend(split_pieces(&part, max_chars, rest));
        }
    }
    pieces
}

/// Split on `sep`, re-attaching each occurrence to the piece it ends.
fn split_keep_separator(text: &str, sep: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (idx, matched) in text.match_indices(sep) {
        let end = idx + matched.len();
        parts.push(text[start..end].to_string());
        start = end;
    }
    if start < text.len() {
        parts.push(text[start..].to_string());
    }
    parts
}

/// Greedily pack pieces into chunks, seeding each new chunk with the tail of
/// the previous one.
fn merge_pieces(pieces: Vec<String>, max_chars: usize, overlap: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for piece in pieces {
        let piece_len = char_len(&piece);
        if current_len > 0 && current_len + piece_len > max_chars {
            // Carry as much trailing context into the next chunk as the
            // size limit allows; `overlap` in the common case.
            let keep = overlap.min(max_chars.saturating_sub(piece_len));
            let tail = char_suffix(&current, keep).to_string();
            chunks.push(current);
            current = tail;
            current_len = keep;
        }
        current.push_str(&piece);
        current_len += piece_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of `text` (all of it if shorter).
fn char_suffix(text: &str, n: usize) -> &str {
    if n == 0 {
        return "";
    }
    match text.char_indices().rev().nth(n - 1) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str, max: usize, overlap: usize) -> Vec<String> {
        split_text(text, max, overlap, DEFAULT_SEPARATORS)
    }

    #[test]
    fn short_text_single_chunk() {
        let chunks = split("ছোট লেখা", 100, 10);
        assert_eq!(chunks, vec!["ছোট লেখা".to_string()]);
    }

    #[test]
    fn empty_text_no_chunks() {
        assert!(split("", 100, 10).is_empty());
    }

    #[test]
    fn overlap_scenario_250_chars() {
        // 50 five-char words -> 250 characters, single paragraph.
        let text = "abcd ".repeat(50);
        let chunks = split(&text, 100, 10);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100, "chunk too long: {chunk:?}");
        }
        for pair in chunks.windows(2) {
            let tail: String = pair[0]
                .chars()
                .rev()
                .take(10)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            let head: String = pair[1].chars().take(10).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn coverage_reconstructs_source() {
        let text = "কর ".repeat(80);
        let overlap = 10;
        let chunks = split(&text, 50, overlap);

        let mut rebuilt = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn chunk_bound_respected_with_bengali_text() {
        let sentence = "আমি বাংলায় গান গাই।";
        let text = sentence.repeat(20);
        for chunk in split(&text, 60, 5) {
            assert!(chunk.chars().count() <= 60);
        }
    }

    #[test]
    fn paragraph_breaks_preferred() {
        let text = "প্রথম অনুচ্ছেদ।\n\nদ্বিতীয় অনুচ্ছেদ।";
        let chunks = split(&text, 20, 0);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "প্রথম অনুচ্ছেদ।\n\n");
        assert_eq!(chunks[1], "দ্বিতীয় অনুচ্ছেদ।");
    }

    #[test]
    fn sentence_stop_separator_used() {
        let text = "এক কথা। দুই কথা। তিন কথা।";
        let chunks = split_text(text, 10, 0, &["।"]);
        assert!(chunks.len() > 1);
        let rebuilt: String = chunks.concat();
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn oversized_token_emitted_whole() {
        let token = "ক".repeat(120);
        let text = format!("ছোট {token} শেষ");
        let chunks = split(&text, 50, 5);
        assert!(chunks.iter().any(|c| c.chars().count() > 50));
        assert!(chunks.iter().any(|c| c.contains(&token)));
    }

    #[test]
    fn order_preserved() {
        let text = "প্রথম।\nদ্বিতীয়।\nতৃতীয়।\nচতুর্থ।";
        let chunks = split(&text, 12, 0);
        let joined = chunks.concat();
        assert_eq!(joined, text);
    }

    #[test]
    fn zero_overlap_partitions_exactly() {
        let text = "শব্দ ".repeat(30);
        let chunks = split(&text, 25, 0);
        assert_eq!(chunks.concat(), text);
    }
}
