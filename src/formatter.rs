//! Result formatting
//!
//! Merges the partial outputs of all metrics into one flat feature record
//! per conversation.

use tracing::debug;

use crate::types::{FeatureRecord, MetricOutput, SpeakerPair};

/// Merge metric outputs into a flat record.
///
/// Speaker-scoped values are keyed `"{normalized_speaker_id}_{metric_key}"`
/// with the speaker id lowercased and whitespace-trimmed; conversation-scoped
/// values keep their metric key as-is. A speaker missing from a metric's
/// output stays missing: the formatter never fabricates a value, since
/// absence is how metrics signal "undefined".
pub fn format_record(outputs: &[MetricOutput], speakers: &SpeakerPair) -> FeatureRecord {
    let mut record = FeatureRecord::new();

    for output in outputs {
        for (metric_key, scores) in &output.speaker_values {
            for expected in [&speakers.a, &speakers.b] {
                if !scores.contains_key(expected) {
                    debug!(metric_key = %metric_key, speaker = %expected, "no value for speaker");
                }
            }
            for (speaker, value) in scores {
                record.insert(speaker_key(speaker, metric_key), *value);
            }
        }
        for (metric_key, value) in &output.conversation_values {
            record.insert(metric_key.clone(), *value);
        }
    }

    record
}

fn speaker_key(speaker: &str, metric_key: &str) -> String {
    format!("{}_{}", speaker.trim().to_lowercase(), metric_key)
}
