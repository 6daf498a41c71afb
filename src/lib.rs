//! Convo Dynamics - feature engine for dyadic conversational dynamics
//!
//! Computes quantitative measures of turn-taking balance, timing,
//! predictability, mutual adaptation, backchanneling, and response latency
//! from either speaker-diarized audio segments or transcript utterances,
//! through a deterministic pipeline: timeline normalization → metric
//! extraction → result formatting.
//!
//! Diarization itself, corpus import, and result persistence are external
//! collaborators; this crate takes one conversation's who-spoke-when
//! timeline and returns a flat record of named numeric features.

pub mod error;
pub mod formatter;
pub mod metrics;
pub mod normalizer;
pub mod pipeline;
pub mod stats;
pub mod types;

pub use error::DynamicsError;
pub use metrics::{Metric, MetricKind};
pub use normalizer::{NoisePolicy, TimelineNormalizer};
pub use pipeline::{conversation_to_features, DynamicsProcessor};
pub use types::{
    Conversation, FeatureRecord, FeatureReport, Segment, SpeakerPair, Timeline, Turn, Utterance,
};

/// Engine version embedded in CLI output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
