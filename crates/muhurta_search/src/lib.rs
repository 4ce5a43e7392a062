//! Transit scoring and advisory window search.
//!
//! This crate provides:
//! - The ephemeris feed trait plus tabulated and linear-motion feeds
//! - Topic profiles (body weights, houses, recommendation text)
//! - Same-body transit-to-natal scoring with a Mercury-retrograde penalty
//! - The advisory search: day split into windows, ranked, best window explained
//! - The cache key and TTL for advisory results

pub mod advisory;
pub mod advisory_types;
pub mod cache;
pub mod error;
pub mod feed;
pub mod scorer;
pub mod topic;
pub mod verdict;

pub use advisory::{AdviceSettings, GENERATED_BY, HOUSE_THEMES, advise, advise_at, ranked_factors};
pub use advisory_types::{
    AdviceRequest, AdviceResult, HouseRelevance, MAX_CUSTOM_NOTE_CHARS, ScoredWindow, SearchConfig,
};
pub use cache::{AdviceKey, DEFAULT_CACHE_TTL};
pub use error::{AdviceError, FeedError};
pub use feed::{BodyPositions, EphemerisFeed, LinearMotionFeed, TabulatedFeed, require_classical};
pub use scorer::{
    Factor, MERCURY_RETROGRADE_PENALTY, TransitAspect, TransitScore, TransitScorer,
    aspect_base_weight, clamp_score,
};
pub use topic::{
    ALL_TOPICS, Priority, Recommendation, RecommendationBank, Topic, TopicCatalog, TopicOverride,
    TopicProfile,
};
pub use verdict::{ALL_VERDICTS, GOOD_THRESHOLD, NEUTRAL_THRESHOLD, Verdict};
