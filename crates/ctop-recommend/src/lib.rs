//! FAQ recommendation engine.
//!
//! Loads a static question catalog once at startup and ranks follow-up
//! questions against the user's latest utterance and recognized intent.

pub mod catalog;
pub mod error;
pub mod handle;
pub mod recommender;
pub mod tokenize;

pub use catalog::{CatalogEntry, CatalogFormat, CatalogLoader};
pub use error::{CatalogError, MalformedEntry, RecommendError};
pub use handle::RecommenderHandle;
pub use recommender::{
    Recommendation, RecommendRequest, Recommender, CONTROL_PREFIX, DEFAULT_TOP_K,
};
