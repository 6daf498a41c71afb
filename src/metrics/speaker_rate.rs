//! Speaker rate: words per minute estimated from transcript text
//!
//! Word boundaries are non-trivial to recover from audio, so this metric
//! only runs on transcript-backed timelines that carry text and inter-turn
//! deltas.

use crate::error::DynamicsError;
use crate::metrics::Metric;
use crate::stats;
use crate::types::{MetricOutput, Timeline, Turn};

/// Per speaker over the chronological words-per-minute sequence
/// (`word_count * 60 / delta`, whitespace tokenization): median, coefficient
/// of variation, and predictability (lag-1 autocorrelation).
/// Conversation-scoped: adaptability (Spearman correlation of the two rate
/// sequences by turn index).
pub struct SpeakerRate;

impl Metric for SpeakerRate {
    fn name(&self) -> &'static str {
        "speaker_rate"
    }

    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError> {
        if timeline.turns.iter().all(|t| t.text.is_none()) {
            return Err(DynamicsError::MissingAuxiliaryInput {
                metric: "speaker_rate",
                field: "text",
            });
        }
        if timeline.turns.iter().all(|t| t.delta.is_none()) {
            return Err(DynamicsError::MissingAuxiliaryInput {
                metric: "speaker_rate",
                field: "delta",
            });
        }

        let rates_a = rate_sequence(timeline, &timeline.speakers.a);
        let rates_b = rate_sequence(timeline, &timeline.speakers.b);

        let mut out = MetricOutput::default();
        for (speaker, rates) in [
            (&timeline.speakers.a, &rates_a),
            (&timeline.speakers.b, &rates_b),
        ] {
            out.push_speaker("speaker_rate_median", speaker, stats::median(rates));
            out.push_speaker(
                "speaker_rate_cv",
                speaker,
                stats::coefficient_of_variation(rates),
            );
            out.push_speaker(
                "speaker_rate_predictability",
                speaker,
                stats::predictability(rates),
            );
        }

        out.push_conversation(
            "speaker_rate_adaptability",
            stats::adaptability(&rates_a, &rates_b),
        );
        Ok(out)
    }
}

/// Words-per-minute for one speaker's turns in chronological order. Turns
/// without text or without a positive delta are skipped rather than scored
/// as zero.
fn rate_sequence(timeline: &Timeline, speaker: &str) -> Vec<f64> {
    timeline
        .turns
        .iter()
        .filter(|t| t.speaker == speaker)
        .filter_map(words_per_minute)
        .collect()
}

fn words_per_minute(turn: &Turn) -> Option<f64> {
    let text = turn.text.as_deref()?;
    let delta = turn.delta.filter(|d| *d > 0.0)?;
    let words = text.split_whitespace().count();
    Some(words as f64 * 60.0 / delta)
}
