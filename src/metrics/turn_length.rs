//! Turn length: central tendency, variability, and temporal structure of
//! each speaker's turn durations

use crate::error::DynamicsError;
use crate::metrics::Metric;
use crate::stats;
use crate::types::{MetricOutput, Timeline};

/// Per speaker: median, mean, and coefficient of variation of turn
/// durations, plus predictability (lag-1 autocorrelation of the duration
/// sequence in chronological order). Conversation-scoped: adaptability
/// (Spearman correlation between the two speakers' duration sequences,
/// aligned by turn index).
pub struct TurnLength;

impl Metric for TurnLength {
    fn name(&self) -> &'static str {
        "turn_length"
    }

    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError> {
        let durations_a = timeline.durations_for(&timeline.speakers.a);
        let durations_b = timeline.durations_for(&timeline.speakers.b);

        let mut out = MetricOutput::default();
        for (speaker, durations) in [
            (&timeline.speakers.a, &durations_a),
            (&timeline.speakers.b, &durations_b),
        ] {
            out.push_speaker("turn_length_median", speaker, stats::median(durations));
            out.push_speaker("turn_length_mean", speaker, stats::mean(durations));
            out.push_speaker(
                "turn_length_cv",
                speaker,
                stats::coefficient_of_variation(durations),
            );
            out.push_speaker(
                "turn_length_predictability",
                speaker,
                stats::predictability(durations),
            );
        }

        out.push_conversation(
            "turn_length_adaptability",
            stats::adaptability(&durations_a, &durations_b),
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SpeakerPair, Turn};

    fn turn(start: f64, end: f64, speaker: &str) -> Turn {
        Turn {
            start,
            end,
            speaker: speaker.to_string(),
            text: None,
            delta: None,
        }
    }

    fn timeline(turns: Vec<Turn>) -> Timeline {
        Timeline {
            conversation_id: "c1".to_string(),
            turns,
            total_duration: 100.0,
            speakers: SpeakerPair {
                a: "A".to_string(),
                b: "B".to_string(),
            },
        }
    }

    #[test]
    fn test_median_mean_cv() {
        // A's durations: 2.0, 4.0, 6.0
        let tl = timeline(vec![
            turn(0.0, 2.0, "A"),
            turn(2.0, 3.0, "B"),
            turn(3.0, 7.0, "A"),
            turn(7.0, 9.0, "B"),
            turn(9.0, 15.0, "A"),
            turn(15.0, 18.0, "B"),
        ]);
        let out = TurnLength.extract(&tl).unwrap();

        assert!((out.speaker_values["turn_length_median"]["A"] - 4.0).abs() < 1e-9);
        assert!((out.speaker_values["turn_length_mean"]["A"] - 4.0).abs() < 1e-9);
        // sample std of [2, 4, 6] is 2.0, cv = 0.5
        assert!((out.speaker_values["turn_length_cv"]["A"] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_predictability_alternating_durations() {
        // A alternates 1s and 5s turns
        let mut turns = Vec::new();
        let mut t = 0.0;
        for i in 0..6 {
            let dur = if i % 2 == 0 { 1.0 } else { 5.0 };
            turns.push(turn(t, t + dur, "A"));
            t += dur;
            turns.push(turn(t, t + 2.0, "B"));
            t += 2.0;
        }
        let out = TurnLength.extract(&timeline(turns)).unwrap();
        let p = out.speaker_values["turn_length_predictability"]["A"];
        assert!(p < -0.9, "alternating sequence should be strongly negative, got {p}");
        // B's turns are constant, zero variance, undefined
        assert!(!out.speaker_values["turn_length_predictability"].contains_key("B"));
    }

    #[test]
    fn test_predictability_needs_three_turns() {
        let tl = timeline(vec![
            turn(0.0, 1.0, "A"),
            turn(1.0, 2.0, "B"),
            turn(2.0, 5.0, "A"),
            turn(5.0, 6.5, "B"),
        ]);
        let out = TurnLength.extract(&tl).unwrap();
        assert!(out
            .speaker_values
            .get("turn_length_predictability")
            .map_or(true, |m| !m.contains_key("A")));
    }

    #[test]
    fn test_adaptability_is_symmetric() {
        let turns = vec![
            turn(0.0, 1.0, "A"),
            turn(1.0, 4.0, "B"),
            turn(4.0, 6.0, "A"),
            turn(6.0, 7.5, "B"),
            turn(7.5, 10.5, "A"),
            turn(10.5, 11.0, "B"),
        ];
        let forward = TurnLength.extract(&timeline(turns.clone())).unwrap();

        // same turns with the pair reversed
        let mut reversed_tl = timeline(turns);
        reversed_tl.speakers = SpeakerPair {
            a: "B".to_string(),
            b: "A".to_string(),
        };
        let backward = TurnLength.extract(&reversed_tl).unwrap();

        let fwd = forward.conversation_values["turn_length_adaptability"];
        let bwd = backward.conversation_values["turn_length_adaptability"];
        assert!((fwd - bwd).abs() < 1e-12);
    }
}
