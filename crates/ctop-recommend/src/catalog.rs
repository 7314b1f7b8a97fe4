//! FAQ catalog model and loader.
//!
//! The catalog is a YAML or JSON document holding either a bare list of
//! records or a mapping with a `faqs` list. Each record needs `text` and
//! `intent`; `keywords` and `answer` are optional.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{CatalogError, MalformedEntry};
use crate::tokenize;

/// Lower-cased matching keys derived from an entry at construction time.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MatchKeys {
    /// Distinctive tokens of the text and keywords.
    pub(crate) tokens: HashSet<String>,
    /// Tokens contributed by keywords only.
    pub(crate) keyword_tokens: HashSet<String>,
    /// Normalized display text.
    pub(crate) phrase: String,
    /// Normalized multi-word keywords.
    pub(crate) keyword_phrases: Vec<String>,
}

impl MatchKeys {
    fn build(text: &str, keywords: &[String]) -> Self {
        let mut tokens: HashSet<String> = tokenize::tokens(text).into_iter().collect();
        let mut keyword_tokens = HashSet::new();
        let mut keyword_phrases = Vec::new();

        for keyword in keywords {
            let phrase = tokenize::normalize(keyword);
            if phrase.split_whitespace().count() > 1 {
                keyword_phrases.push(phrase);
            }
            for token in tokenize::tokens(keyword) {
                keyword_tokens.insert(token.clone());
                tokens.insert(token);
            }
        }

        Self {
            tokens,
            keyword_tokens,
            phrase: tokenize::normalize(text),
            keyword_phrases,
        }
    }
}

/// A question the bot can suggest as a follow-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    /// Display question, trimmed but otherwise untouched.
    pub text: String,
    /// Intent the follow-up button routes back into the dialogue system.
    pub intent: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Passed through for display, never scored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip)]
    pub(crate) keys: MatchKeys,
}

impl CatalogEntry {
    pub fn new(text: impl Into<String>, intent: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let intent = intent.into().trim().to_string();
        let keys = MatchKeys::build(&text, &[]);
        Self {
            text,
            intent,
            keywords: Vec::new(),
            answer: None,
            keys,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords
            .into_iter()
            .map(|k| k.into().trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        self.keys = MatchKeys::build(&self.text, &self.keywords);
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into().trim().to_string());
        self
    }
}

/// Serialization format of a catalog resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Yaml,
    Json,
}

impl CatalogFormat {
    /// Pick the format from the file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => CatalogFormat::Json,
            _ => CatalogFormat::Yaml,
        }
    }
}

/// Parses catalog resources into validated entries.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Read and parse the catalog at `path`.
    ///
    /// A missing, unreadable, unparseable or empty resource is a
    /// [`CatalogError::Configuration`]; invalid records are reported together
    /// in one [`CatalogError::MalformedEntries`].
    pub fn load(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;

        let entries =
            Self::parse(&source, CatalogFormat::from_path(path)).map_err(|err| match err {
                CatalogError::Configuration(msg) => {
                    CatalogError::Configuration(format!("{}: {}", path.display(), msg))
                }
                other => other,
            })?;

        info!(
            path = %path.display(),
            entries = entries.len(),
            "FAQ catalog loaded"
        );
        Ok(entries)
    }

    /// Parse a catalog document held in memory.
    pub fn parse(source: &str, format: CatalogFormat) -> Result<Vec<CatalogEntry>, CatalogError> {
        if source.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "catalog contains no entries".to_string(),
            ));
        }

        let document: Value = match format {
            CatalogFormat::Yaml => serde_yaml::from_str(source)
                .map_err(|e| CatalogError::Configuration(format!("invalid YAML: {}", e)))?,
            CatalogFormat::Json => serde_json::from_str(source)
                .map_err(|e| CatalogError::Configuration(format!("invalid JSON: {}", e)))?,
        };

        let records = match document {
            Value::Array(records) => records,
            Value::Object(mut map) => match map.remove("faqs") {
                Some(Value::Array(records)) => records,
                _ => {
                    return Err(CatalogError::Configuration(
                        "expected a list of records or a `faqs` list".to_string(),
                    ))
                }
            },
            Value::Null => Vec::new(),
            _ => {
                return Err(CatalogError::Configuration(
                    "expected a list of records or a `faqs` list".to_string(),
                ))
            }
        };

        if records.is_empty() {
            return Err(CatalogError::Configuration(
                "catalog contains no entries".to_string(),
            ));
        }

        let mut entries = Vec::with_capacity(records.len());
        let mut malformed = Vec::new();
        for (index, record) in records.iter().enumerate() {
            match parse_record(record) {
                Ok(entry) => entries.push(entry),
                Err(reasons) => malformed.push(MalformedEntry {
                    index,
                    reason: reasons.join("; "),
                }),
            }
        }

        if !malformed.is_empty() {
            return Err(CatalogError::MalformedEntries(malformed));
        }

        warn_duplicate_intents(&entries);
        Ok(entries)
    }
}

fn parse_record(record: &Value) -> Result<CatalogEntry, Vec<String>> {
    let Some(map) = record.as_object() else {
        return Err(vec!["record is not a mapping".to_string()]);
    };

    let mut reasons = Vec::new();
    let text = required_string(map.get("text"), "text", &mut reasons);
    let intent = required_string(map.get("intent"), "intent", &mut reasons);

    let keywords = match map.get("keywords") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(k) => out.push(k.to_string()),
                    None => {
                        reasons.push("`keywords` must be a list of strings".to_string());
                        break;
                    }
                }
            }
            out
        }
        Some(_) => {
            reasons.push("`keywords` must be a list of strings".to_string());
            Vec::new()
        }
    };

    let answer = match map.get("answer") {
        None | Some(Value::Null) => None,
        Some(Value::String(a)) => Some(a.clone()),
        Some(_) => {
            reasons.push("`answer` must be a string".to_string());
            None
        }
    };

    match (text, intent) {
        (Some(text), Some(intent)) if reasons.is_empty() => {
            let mut entry = CatalogEntry::new(text, intent).with_keywords(keywords);
            if let Some(answer) = answer {
                entry = entry.with_answer(answer);
            }
            Ok(entry)
        }
        _ => Err(reasons),
    }
}

fn required_string(value: Option<&Value>, field: &str, reasons: &mut Vec<String>) -> Option<String> {
    match value {
        None | Some(Value::Null) => {
            reasons.push(format!("missing `{}`", field));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            reasons.push(format!("`{}` is empty", field));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            reasons.push(format!("`{}` must be a string", field));
            None
        }
    }
}

fn warn_duplicate_intents(entries: &[CatalogEntry]) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        match seen.get(entry.intent.as_str()) {
            Some(&first) => warn!(
                intent = %entry.intent,
                first_index = first,
                index,
                "Duplicate intent in FAQ catalog"
            ),
            None => {
                seen.insert(entry.intent.as_str(), index);
            }
        }
    }
}
