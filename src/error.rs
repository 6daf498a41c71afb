//! Error types for the conversation dynamics engine

use thiserror::Error;

/// Errors that can occur while normalizing timelines or computing metrics
#[derive(Debug, Error)]
pub enum DynamicsError {
    /// A metric name did not resolve against the registry. Registration must
    /// fail loudly: silently skipping a metric would make feature records
    /// incomparable across conversations.
    #[error("Metric '{name}' not recognized. Available metrics: {available:?}")]
    UnknownMetric {
        name: String,
        available: Vec<&'static str>,
    },

    /// Fewer than two distinct speakers remained after noise filtering.
    /// Dyadic metrics are undefined for a monologue.
    #[error("Conversation '{conversation_id}': {found} speaker(s) after noise filtering, need exactly 2")]
    InsufficientSpeakers {
        conversation_id: String,
        found: usize,
    },

    /// More than two distinct speakers remained after applying the configured
    /// noise-removal policy.
    #[error("Conversation '{conversation_id}': {found} speakers remain after noise filtering, need exactly 2")]
    ExcessSpeakers {
        conversation_id: String,
        found: usize,
    },

    /// A metric needs per-turn input the timeline does not carry (e.g.
    /// speaker_rate on a diarized timeline without transcripts). Fatal for
    /// that metric only, not for its siblings.
    #[error("Metric '{metric}' requires '{field}' which is absent from the timeline")]
    MissingAuxiliaryInput {
        metric: &'static str,
        field: &'static str,
    },

    /// A raw segment violated basic interval invariants.
    #[error("Conversation '{conversation_id}': invalid segment: {detail}")]
    InvalidSegment {
        conversation_id: String,
        detail: String,
    },

    /// A conversation carried neither diarized segments nor utterances.
    #[error("Conversation '{conversation_id}' has no diarized segments and no utterances")]
    NoTimelineSource { conversation_id: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
