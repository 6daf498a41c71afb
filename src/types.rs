//! Data model for conversation timelines and feature records
//!
//! This module defines the types that flow through the dynamics pipeline:
//! raw diarized segments and transcript utterances on the way in, the
//! canonical two-speaker `Timeline` in the middle, and the flat
//! `FeatureRecord` on the way out.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous span of speech attributed to a single speaker, as produced
/// by an external diarization pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Span start in seconds from the beginning of the recording
    pub start: f64,
    /// Span end in seconds
    pub end: f64,
    /// Diarization speaker label (e.g. "SPEAKER_00")
    pub speaker: String,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One transcript row. This is the alternative input representation used when
/// no diarized timeline exists, and the only representation carrying lexical
/// content for speech-rate estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    /// Ordinal position of the turn within the conversation
    pub turn_id: u32,
    /// Speaker identifier
    pub speaker: String,
    /// Turn onset in seconds
    pub start: f64,
    /// Turn offset in seconds. Some transcript exports carry only onsets;
    /// normalization falls back to the next row's start when absent.
    #[serde(default)]
    pub end: Option<f64>,
    /// Transcribed text of the turn
    pub text: String,
    /// Elapsed time since the previous turn ended, in seconds
    #[serde(default)]
    pub delta: Option<f64>,
    /// Turn this one replies to, when the source records reply structure
    #[serde(default)]
    pub reply_to: Option<u32>,
}

/// Canonical timeline element. Diarized segments map to turns without text;
/// utterances keep their text and inter-turn delta for the speech-rate
/// metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl Turn {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// The two substantive speakers of a conversation, ordered by first
/// appearance in the sorted timeline. The ordering is stable and explicit:
/// pairwise metrics that distinguish "A" from "B" always mean first-appearing
/// and second-appearing speaker, never an alphabetical or positional
/// accident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerPair {
    pub a: String,
    pub b: String,
}

impl SpeakerPair {
    /// The other member of the pair, or `None` for an unknown speaker
    pub fn other(&self, speaker: &str) -> Option<&str> {
        if speaker == self.a {
            Some(&self.b)
        } else if speaker == self.b {
            Some(&self.a)
        } else {
            None
        }
    }

    pub fn contains(&self, speaker: &str) -> bool {
        speaker == self.a || speaker == self.b
    }
}

/// Ordered-by-start sequence of turns for one conversation, reduced to
/// exactly two speakers.
///
/// Metrics receive a shared reference and must never mutate the timeline;
/// any derived per-turn column (pause, backchannel flag, speech rate) is a
/// metric-local vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub conversation_id: String,
    /// Turns sorted by `start` ascending
    pub turns: Vec<Turn>,
    /// Conversation-level duration used as a normalizing denominator
    pub total_duration: f64,
    /// The two substantive speakers, by first appearance
    pub speakers: SpeakerPair,
}

impl Timeline {
    /// Durations of one speaker's turns in chronological order
    pub fn durations_for(&self, speaker: &str) -> Vec<f64> {
        self.turns
            .iter()
            .filter(|t| t.speaker == speaker)
            .map(Turn::duration)
            .collect()
    }

    /// Number of turns taken by one speaker
    pub fn turn_count(&self, speaker: &str) -> usize {
        self.turns.iter().filter(|t| t.speaker == speaker).count()
    }
}

/// Partial result produced by a single metric before merging.
///
/// Absence of a key signals "undefined" (too few turns, zero denominator);
/// values are never coerced to zero and NaN is never inserted, so callers
/// can distinguish "no data" from "measured zero".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricOutput {
    /// metric key -> speaker id -> value
    pub speaker_values: BTreeMap<String, BTreeMap<String, f64>>,
    /// metric key -> value (single conversation-level scalar)
    pub conversation_values: BTreeMap<String, f64>,
}

impl MetricOutput {
    /// Record a speaker-scoped value, skipping undefined ones
    pub fn push_speaker(&mut self, key: &str, speaker: &str, value: Option<f64>) {
        if let Some(v) = value {
            if v.is_finite() {
                self.speaker_values
                    .entry(key.to_string())
                    .or_default()
                    .insert(speaker.to_string(), v);
            }
        }
    }

    /// Record a conversation-scoped value, skipping undefined ones
    pub fn push_conversation(&mut self, key: &str, value: Option<f64>) {
        if let Some(v) = value {
            if v.is_finite() {
                self.conversation_values.insert(key.to_string(), v);
            }
        }
    }
}

/// Final flat mapping of feature name to value for one conversation.
/// Speaker-scoped keys follow `"{normalized_speaker_id}_{metric_key}"`.
pub type FeatureRecord = BTreeMap<String, f64>;

/// Feature record plus provenance, attached to a conversation after
/// processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    pub conversation_id: String,
    /// When the features were computed
    pub computed_at: DateTime<Utc>,
    pub features: FeatureRecord,
}

/// One conversation in a batch. Exactly one of `segments` or `utterances`
/// drives the timeline: diarized segments take precedence when present, the
/// transcript is the fallback. This is a two-state selection, never a merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    /// Diarized speech intervals, when an audio timeline exists
    #[serde(default)]
    pub segments: Option<Vec<Segment>>,
    /// Known audio duration in seconds; required alongside `segments`,
    /// optional (derived from the utterance span) for transcripts
    #[serde(default)]
    pub total_duration: Option<f64>,
    /// Transcript rows, when no diarized timeline exists
    #[serde(default)]
    pub utterances: Option<Vec<Utterance>>,
    /// Computed dynamics features, attached by the processor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamics: Option<FeatureReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_duration() {
        let seg = Segment {
            start: 1.5,
            end: 4.0,
            speaker: "A".to_string(),
        };
        assert!((seg.duration() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_speaker_pair_other() {
        let pair = SpeakerPair {
            a: "SPEAKER_00".to_string(),
            b: "SPEAKER_01".to_string(),
        };
        assert_eq!(pair.other("SPEAKER_00"), Some("SPEAKER_01"));
        assert_eq!(pair.other("SPEAKER_01"), Some("SPEAKER_00"));
        assert_eq!(pair.other("SPEAKER_02"), None);
        assert!(pair.contains("SPEAKER_00"));
        assert!(!pair.contains("SPEAKER_02"));
    }

    #[test]
    fn test_metric_output_skips_undefined() {
        let mut out = MetricOutput::default();
        out.push_speaker("speaking_time", "A", Some(40.0));
        out.push_speaker("speaking_time", "B", None);
        out.push_speaker("speaking_time", "C", Some(f64::NAN));
        out.push_conversation("adaptability", Some(f64::INFINITY));

        let scores = &out.speaker_values["speaking_time"];
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["A"], 40.0);
        assert!(out.conversation_values.is_empty());
    }

    #[test]
    fn test_conversation_deserialization() {
        let json = r#"{
            "id": "convo-1",
            "segments": [
                {"start": 0.0, "end": 2.0, "speaker": "SPEAKER_00"},
                {"start": 2.0, "end": 3.0, "speaker": "SPEAKER_01"}
            ],
            "total_duration": 6.0
        }"#;

        let convo: Conversation = serde_json::from_str(json).unwrap();
        assert_eq!(convo.id, "convo-1");
        assert_eq!(convo.segments.as_ref().unwrap().len(), 2);
        assert_eq!(convo.total_duration, Some(6.0));
        assert!(convo.utterances.is_none());
        assert!(convo.dynamics.is_none());
    }

    #[test]
    fn test_utterance_optional_fields() {
        let json = r#"{
            "turn_id": 3,
            "speaker": "L",
            "start": 12.5,
            "text": "mm-hm"
        }"#;

        let utt: Utterance = serde_json::from_str(json).unwrap();
        assert_eq!(utt.turn_id, 3);
        assert!(utt.end.is_none());
        assert!(utt.delta.is_none());
        assert!(utt.reply_to.is_none());
    }
}
