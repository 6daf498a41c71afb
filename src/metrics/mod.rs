//! Metric registry and implementations
//!
//! Each metric consumes an immutable normalized `Timeline` and produces a
//! partial `MetricOutput` (per-speaker values and/or conversation-level
//! scalars). Metrics are independent of each other; run order never affects
//! results.
//!
//! The registry is a closed enum rather than open string dispatch: the six
//! metric identifiers are validated at registration time, and the
//! string-to-identifier parser exists only for CLI/config ergonomics.

mod backchannels;
mod pauses;
mod response_time;
mod speaker_rate;
mod speaking_time;
mod turn_length;

pub use backchannels::Backchannels;
pub use pauses::Pauses;
pub use response_time::ResponseTime;
pub use speaker_rate::SpeakerRate;
pub use speaking_time::SpeakingTime;
pub use turn_length::TurnLength;

use std::str::FromStr;

use crate::error::DynamicsError;
use crate::types::{MetricOutput, Timeline};

/// A conversation dynamics metric
pub trait Metric: Send + Sync {
    /// Canonical snake_case name, used as the result key prefix
    fn name(&self) -> &'static str;

    /// Compute this metric's partial result for one conversation.
    ///
    /// The timeline is shared and read-only; derived per-turn columns live in
    /// metric-local vectors.
    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError>;
}

/// The closed set of registered metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    SpeakingTime,
    TurnLength,
    Pauses,
    SpeakerRate,
    Backchannels,
    ResponseTime,
}

impl MetricKind {
    pub const ALL: [MetricKind; 6] = [
        MetricKind::SpeakingTime,
        MetricKind::TurnLength,
        MetricKind::Pauses,
        MetricKind::SpeakerRate,
        MetricKind::Backchannels,
        MetricKind::ResponseTime,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::SpeakingTime => "speaking_time",
            MetricKind::TurnLength => "turn_length",
            MetricKind::Pauses => "pauses",
            MetricKind::SpeakerRate => "speaker_rate",
            MetricKind::Backchannels => "backchannels",
            MetricKind::ResponseTime => "response_time",
        }
    }

    /// All canonical names, for error messages and `--help` output
    pub fn available_names() -> Vec<&'static str> {
        Self::ALL.iter().map(|k| k.name()).collect()
    }

    pub fn instantiate(self) -> Box<dyn Metric> {
        match self {
            MetricKind::SpeakingTime => Box::new(SpeakingTime),
            MetricKind::TurnLength => Box::new(TurnLength),
            MetricKind::Pauses => Box::new(Pauses),
            MetricKind::SpeakerRate => Box::new(SpeakerRate),
            MetricKind::Backchannels => Box::new(Backchannels),
            MetricKind::ResponseTime => Box::new(ResponseTime),
        }
    }
}

impl FromStr for MetricKind {
    type Err = DynamicsError;

    /// Resolve a user-supplied metric name, tolerating case and surrounding
    /// whitespace. Unknown names fail with the full list of valid names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == normalized)
            .ok_or_else(|| DynamicsError::UnknownMetric {
                name: s.trim().to_string(),
                available: Self::available_names(),
            })
    }
}
