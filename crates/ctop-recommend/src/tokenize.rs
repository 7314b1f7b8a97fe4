//! Text normalization shared by the catalog and the query side.

use std::sync::LazyLock;

use regex::Regex;

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]+").expect("Invalid punctuation regex"));

/// Words that carry no topic on their own. Matching on them would relate
/// every question to every other one.
static STOP_WORDS: &[&str] = &[
    "a", "about", "all", "am", "an", "and", "any", "are", "as", "at", "be", "been", "but", "by",
    "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "hello", "hey",
    "hi", "how", "i", "if", "in", "is", "it", "its", "me", "my", "of", "on", "or", "our",
    "please", "should", "so", "that", "the", "their", "them", "there", "these", "this", "to",
    "up", "us", "was", "we", "were", "what", "when", "where", "which", "who", "why", "will",
    "with", "would", "you", "your",
];

/// Lower-case, replace punctuation with spaces and collapse whitespace.
///
/// Keeps every word, so the result can be used for phrase containment.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = PUNCTUATION_RE.replace_all(&lowered, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinctive tokens of `text`, in order of first appearance, without
/// duplicates.
pub fn tokens(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for word in normalize(text).split_whitespace() {
        if is_stop_word(word) {
            continue;
        }
        let token = fold_plural(word);
        if !out.iter().any(|t| t == token) {
            out.push(token.to_string());
        }
    }
    out
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Strip a trailing plural `s` so "nodes" and "node" meet.
fn fold_plural(word: &str) -> &str {
    let keep = word.chars().count() <= 3
        || !word.ends_with('s')
        || word.ends_with("ss")
        || word.ends_with("us")
        || word.ends_with("is");
    if keep {
        word
    } else {
        &word[..word.len() - 1]
    }
}

/// Whether `needle` occurs in `haystack` on word boundaries. Both sides
/// must already be normalized.
pub fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    format!(" {} ", haystack).contains(&format!(" {} ", needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(
            normalize("  How do I RESET my password?! "),
            "how do i reset my password"
        );
        assert_eq!(normalize("node-01, sensor_02"), "node 01 sensor_02");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_tokens_drop_stop_words() {
        assert_eq!(tokens("I forgot my password"), vec!["forgot", "password"]);
        assert_eq!(
            tokens("How do I add a new sensor node?"),
            vec!["add", "new", "sensor", "node"]
        );
    }

    #[test]
    fn test_tokens_fold_plurals() {
        assert_eq!(tokens("sensors nodes"), vec!["sensor", "node"]);
        // Short words and "ss"/"us"/"is" endings are left alone.
        assert_eq!(tokens("gas access status analysis"), vec!["gas", "access", "status", "analysis"]);
    }

    #[test]
    fn test_tokens_deduplicate() {
        assert_eq!(tokens("alarm alarms ALARM"), vec!["alarm"]);
    }

    #[test]
    fn test_tokens_only_stop_words() {
        assert!(tokens("how do I do it?").is_empty());
    }

    #[test]
    fn test_contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("how do i reset my password", "reset my password"));
        assert!(contains_phrase("reset password", "reset password"));
        assert!(!contains_phrase("how do i reset my password", "set my"));
        assert!(!contains_phrase("anything", ""));
    }
}
