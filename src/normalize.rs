//! OCR noise cleanup for extracted document text.
//!
//! The source material is Bengali textbook PDFs, many of them scanned and
//! OCR'd. Extraction leaves behind synthetic page markers, zero-width
//! characters, stray Latin/digit runs, promotional boilerplate, and
//! punctuation-only lines. [`Normalizer::normalize`] removes all of that,
//! line by line, and is idempotent — the same transforms are applied to
//! queries at retrieval time so index-time and query-time text match.
//!
//! [`strip_structured_noise`] is a heavier pre-pass used only by the offline
//! `clean` command: it removes enumerated exercise questions, MCQ option
//! lines, bracketed board references, and answer lines before the regular
//! normalization runs.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use unicode_normalization::{is_nfc_quick, IsNormalized, UnicodeNormalization};

static ZERO_WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[\u{200B}-\u{200D}\u{FEFF}]").unwrap());
static PAGE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--- Page \d+ ---").unwrap());
static ASCII_ALNUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new("[a-zA-Z0-9]").unwrap());
static SYMBOLS_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\W_]+$").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Enumerated question lines, MCQ option lines (ক/খ/গ/ঘ), bracketed board
/// references, and উত্তর: answer lines.
static STRUCTURED_NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[০-৯0-9]+[।.)]\s.*$|^\s*\(?[কখগঘ]\)?[)।]?\s*.*$|\[.*?\d+.*?\]|^.*উত্তর:.*$",
    )
    .unwrap()
});
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Boilerplate phrases observed across the source textbooks: answer-key
/// headers, exercise headers, and coaching-center promotions. A line
/// containing any of these anywhere is dropped entirely.
const DEFAULT_BOILERPLATE: &[&str] = &[
    "শব্দার্থ ও টীকা",
    "সৃজনশীল প্রশ্ন",
    "অনলাইন ব্যাচ",
    "পাঠ্যপুস্তকের প্রশ্ন",
    "হুনির্বাচনী",
    "শব্দের অর্থ ও ব্যাখ্যা",
    "নিচের কোনটি সঠিক",
    "নিচের উদ্দীপকটি পড়ে",
];

/// Normalize to NFC. Fast path returns the input unchanged when it is
/// already in composed form.
pub fn nfc(text: &str) -> String {
    if is_nfc_quick(text.chars()) == IsNormalized::Yes {
        text.to_string()
    } else {
        text.nfc().collect()
    }
}

/// Line-oriented text cleaner parameterized by a boilerplate phrase list.
#[derive(Debug, Clone)]
pub struct Normalizer {
    boilerplate: Vec<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Normalizer with the built-in Bengali boilerplate set.
    pub fn new() -> Self {
        Self::from_phrases(DEFAULT_BOILERPLATE.iter().map(|s| s.to_string()).collect())
    }

    pub fn from_phrases(phrases: Vec<String>) -> Self {
        Self {
            boilerplate: phrases.iter().map(|p| nfc(p)).collect(),
        }
    }

    /// Load the boilerplate phrase list from a JSON array file
    /// (one file per language, editable without code changes).
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read boilerplate list: {}", path.display()))?;
        let phrases: Vec<String> = serde_json::from_str(&data)
            .with_context(|| format!("Boilerplate list is not a JSON array: {}", path.display()))?;
        Ok(Self::from_phrases(phrases))
    }

    /// Clean raw extracted text. Pure and idempotent:
    /// `normalize(normalize(x)) == normalize(x)`.
    ///
    /// Surviving lines are rejoined with `\n` in their original order.
    pub fn normalize(&self, raw: &str) -> String {
        let mut lines = Vec::new();
        for line in raw.lines() {
            if let Some(clean) = self.clean_line(line) {
                lines.push(clean);
            }
        }
        lines.join("\n")
    }

    fn clean_line(&self, line: &str) -> Option<String> {
        let line = nfc(line);
        let line = ZERO_WIDTH_RE.replace_all(&line, " ");
        let line = PAGE_MARKER_RE.replace_all(&line, " ");
        // The target language is non-Latin; embedded ASCII runs are OCR noise.
        let line = ASCII_ALNUM_RE.replace_all(&line, " ");
        if self
            .boilerplate
            .iter()
            .any(|phrase| line.contains(phrase.as_str()))
        {
            return None;
        }
        let line = SYMBOLS_ONLY_RE.replace(&line, " ");
        let line = WHITESPACE_RE.replace_all(&line, " ");
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some(line.to_string())
        }
    }
}

/// Remove enumerated questions, MCQ options, board references, and answer
/// lines, then collapse runs of blank lines to a single blank line.
///
/// Used by the offline `clean` command; the ingestion pipeline itself only
/// runs [`Normalizer::normalize`].
pub fn strip_structured_noise(text: &str) -> String {
    let cleaned = STRUCTURED_NOISE_RE.replace_all(text, "");
    BLANK_RUN_RE.replace_all(&cleaned, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_marker_ascii_and_whitespace() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.normalize("--- Page 4 ---  hello123 বাংলা  "),
            "বাংলা"
        );
    }

    #[test]
    fn idempotent_on_noisy_input() {
        let normalizer = Normalizer::new();
        let samples = [
            "--- Page 1 ---\nabc বাংলা xyz\n***\n\u{200B}ভাষা\n",
            "সে বাড়ি   যায়।\n\n\n।।।\n",
            "",
            "   \n \n",
        ];
        for sample in samples {
            let once = normalizer.normalize(sample);
            assert_eq!(normalizer.normalize(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn boilerplate_line_dropped_entirely() {
        let normalizer = Normalizer::new();
        let text = "প্রথম লাইন\nকিছু কথা সৃজনশীল প্রশ্ন আরো কথা\nশেষ লাইন";
        assert_eq!(normalizer.normalize(text), "প্রথম লাইন\nশেষ লাইন");
    }

    #[test]
    fn punctuation_only_lines_dropped() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("---***---\nবাংলা\n॥॥"), "বাংলা");
    }

    #[test]
    fn zero_width_characters_stripped() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("বাং\u{200B}লা"), "বাং লা");
    }

    #[test]
    fn empty_input_stays_empty() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn custom_phrase_list_overrides_defaults() {
        let normalizer = Normalizer::from_phrases(vec!["বিশেষ দ্রষ্টব্য".to_string()]);
        let text = "বিশেষ দ্রষ্টব্য এখানে\nসৃজনশীল প্রশ্ন থাকে";
        // Only the custom phrase is active.
        assert_eq!(normalizer.normalize(text), "সৃজনশীল প্রশ্ন থাকে");
    }

    #[test]
    fn structured_noise_removes_questions_and_answers() {
        let text = "১। এটি একটি প্রশ্ন\nক) প্রথম বিকল্প\nসাধারণ অনুচ্ছেদ\nউত্তর: খ\n";
        let cleaned = strip_structured_noise(text);
        assert!(!cleaned.contains("প্রশ্ন"));
        assert!(!cleaned.contains("বিকল্প"));
        assert!(!cleaned.contains("উত্তর"));
        assert!(cleaned.contains("সাধারণ অনুচ্ছেদ"));
    }

    #[test]
    fn structured_noise_removes_board_references() {
        let text = "মূল বাক্য [ঢাকা বোর্ড ২০১৯] বাকি অংশ";
        let cleaned = strip_structured_noise(text);
        assert_eq!(cleaned, "মূল বাক্য  বাকি অংশ");
    }

    #[test]
    fn structured_noise_collapses_blank_runs() {
        let text = "প্রথম\n\n\n\nদ্বিতীয়";
        assert_eq!(strip_structured_noise(text), "প্রথম\n\nদ্বিতীয়");
    }

    #[test]
    fn nfc_fast_path() {
        assert_eq!(nfc("plain"), "plain");
        // Decomposed e + combining acute composes to é.
        assert_eq!(nfc("e\u{0301}"), "\u{00E9}");
    }
}
