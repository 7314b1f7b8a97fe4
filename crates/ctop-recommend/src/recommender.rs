//! Content-based ranking of catalog entries against a user turn.
//!
//! The score of an entry is the IDF-weighted share of the query's
//! distinctive tokens that the entry also contains, plus small bonuses for
//! keyword hits and phrase containment. Bonuses only apply on top of a
//! non-zero overlap, so an entry sharing no token with the query always
//! scores zero and is never recommended.
//!
//! Growing the shared token set never lowers an entry's score, but scores
//! are not comparable by raw token counts across entries: one shared rare
//! token can outweigh two shared common ones.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::catalog::CatalogEntry;
use crate::error::RecommendError;
use crate::tokenize;

pub const DEFAULT_TOP_K: usize = 3;

/// Leading marker of a synthetic turn (a button click) rather than free text.
pub const CONTROL_PREFIX: char = '/';

/// Added per shared token that comes from the entry's keywords, scaled by
/// the query length.
const KEYWORD_WEIGHT: f64 = 0.5;
/// Added when the whole query appears verbatim in the question, or a
/// multi-word keyword appears verbatim in the query.
const PHRASE_BONUS: f64 = 0.25;

/// A ranked catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub entry: CatalogEntry,
    pub score: f64,
}

/// Validated arguments of a recommendation call arriving from an untyped
/// boundary (a JSON body or a tracker event).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendRequest {
    pub text: String,
    pub intent: String,
    pub top_k: Option<usize>,
}

impl RecommendRequest {
    /// Build a request from raw JSON fields. `null` or missing text and
    /// intent read as empty; any other non-string is a contract violation.
    pub fn from_parts(text: Option<&Value>, intent: Option<&Value>) -> Result<Self, RecommendError> {
        Ok(Self {
            text: string_arg(text, "text")?,
            intent: string_arg(intent, "intent")?,
            top_k: None,
        })
    }
}

impl TryFrom<&Value> for RecommendRequest {
    type Error = RecommendError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let map = value.as_object().ok_or_else(|| {
            RecommendError::InvalidArgument("request must be a JSON object".to_string())
        })?;

        let mut request = Self::from_parts(map.get("text"), map.get("intent"))?;
        request.top_k = match map.get("top_k") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let k = v.as_u64().ok_or_else(|| {
                    RecommendError::InvalidArgument(
                        "`top_k` must be a non-negative integer".to_string(),
                    )
                })?;
                Some(usize::try_from(k).map_err(|_| {
                    RecommendError::InvalidArgument("`top_k` is out of range".to_string())
                })?)
            }
        };
        Ok(request)
    }
}

fn string_arg(value: Option<&Value>, field: &str) -> Result<String, RecommendError> {
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RecommendError::InvalidArgument(format!(
            "`{}` must be a string, got {}",
            field,
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// The query side of a scoring pass.
struct PreparedQuery {
    tokens: Vec<String>,
    phrase: String,
    weight: f64,
}

/// Ranks an immutable catalog. Safe to share across threads without
/// locking; every call is a pure read.
#[derive(Debug, Clone)]
pub struct Recommender {
    entries: Vec<CatalogEntry>,
    /// Number of entries containing each token.
    doc_freq: HashMap<String, usize>,
}

impl Recommender {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for entry in &entries {
            for token in &entry.keys.tokens {
                *doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }
        Self { entries, doc_freq }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank catalog entries against one user turn.
    ///
    /// Returns at most `top_k` recommendations ordered by descending score,
    /// ties in catalog order. The entry for `current_intent` is never
    /// returned, nor two entries with the same intent. Empty text and
    /// control-prefixed turns yield nothing.
    pub fn recommend(
        &self,
        query_text: &str,
        current_intent: &str,
        top_k: usize,
    ) -> Vec<Recommendation> {
        let text = query_text.trim();
        if text.is_empty() || text.starts_with(CONTROL_PREFIX) {
            return Vec::new();
        }
        if self.entries.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let query = self.prepare(text);
        if query.tokens.is_empty() {
            debug!(query = %text, "Query has no distinctive tokens");
            return Vec::new();
        }

        let current_intent = current_intent.trim();
        let mut scored: Vec<Recommendation> = self
            .entries
            .iter()
            .filter(|entry| entry.intent != current_intent)
            .filter_map(|entry| {
                let score = self.score(&query, entry);
                (score > 0.0).then(|| Recommendation {
                    entry: entry.clone(),
                    score,
                })
            })
            .collect();

        // Stable sort keeps catalog order among equal scores.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut seen: HashSet<&str> = HashSet::new();
        let mut ranked: Vec<Recommendation> = Vec::with_capacity(top_k);
        for rec in &scored {
            if ranked.len() == top_k {
                break;
            }
            if seen.insert(rec.entry.intent.as_str()) {
                ranked.push(rec.clone());
            }
        }

        debug!(
            query = %text,
            candidates = scored.len(),
            returned = ranked.len(),
            "Recommendations ranked"
        );
        ranked
    }

    /// [`Recommender::recommend`] for a validated boundary request.
    pub fn recommend_request(
        &self,
        request: &RecommendRequest,
        default_top_k: usize,
    ) -> Vec<Recommendation> {
        self.recommend(
            &request.text,
            &request.intent,
            request.top_k.unwrap_or(default_top_k),
        )
    }

    fn prepare(&self, text: &str) -> PreparedQuery {
        let tokens = tokenize::tokens(text);
        let weight = tokens.iter().map(|t| self.idf(t)).sum();
        PreparedQuery {
            tokens,
            phrase: tokenize::normalize(text),
            weight,
        }
    }

    /// Inverse document frequency, always >= 1 so every shared token adds
    /// weight.
    fn idf(&self, token: &str) -> f64 {
        let n = self.entries.len() as f64;
        let df = self.doc_freq.get(token).copied().unwrap_or(0) as f64;
        1.0 + ((n + 1.0) / (df + 1.0)).ln()
    }

    fn score(&self, query: &PreparedQuery, entry: &CatalogEntry) -> f64 {
        let keys = &entry.keys;
        let mut shared_weight = 0.0;
        let mut keyword_hits = 0usize;
        for token in &query.tokens {
            if keys.tokens.contains(token) {
                shared_weight += self.idf(token);
                if keys.keyword_tokens.contains(token) {
                    keyword_hits += 1;
                }
            }
        }
        if shared_weight == 0.0 {
            return 0.0;
        }

        let mut score = shared_weight / query.weight;
        score += KEYWORD_WEIGHT * keyword_hits as f64 / query.tokens.len() as f64;

        let whole_query_in_text =
            query.tokens.len() > 1 && tokenize::contains_phrase(&keys.phrase, &query.phrase);
        let keyword_phrase_in_query = keys
            .keyword_phrases
            .iter()
            .any(|p| tokenize::contains_phrase(&query.phrase, p));
        if whole_query_in_text || keyword_phrase_in_query {
            score += PHRASE_BONUS;
        }
        score
    }
}
