//! Pauses: how long each speaker leaves the floor open after finishing

use std::collections::BTreeMap;

use crate::error::DynamicsError;
use crate::metrics::Metric;
use crate::stats;
use crate::types::{MetricOutput, Timeline};

/// For each adjacent pair of turns in the sorted timeline, the pause is
/// `next.start - current.end` (negative when the turns overlap) and is
/// attributed to the speaker of the *current* turn. Per-speaker mean pause
/// is reported as a percentage of total duration (`avg_pause_pct`). The
/// trailing turn has no successor and contributes no pause.
pub struct Pauses;

impl Metric for Pauses {
    fn name(&self) -> &'static str {
        "pauses"
    }

    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError> {
        let mut out = MetricOutput::default();
        if timeline.total_duration <= 0.0 {
            return Ok(out);
        }

        let mut pauses_by_speaker: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for window in timeline.turns.windows(2) {
            let gap = window[1].start - window[0].end;
            pauses_by_speaker
                .entry(&window[0].speaker)
                .or_default()
                .push(gap);
        }

        for (speaker, pauses) in pauses_by_speaker {
            out.push_speaker(
                "avg_pause_pct",
                speaker,
                stats::mean(&pauses).map(|m| m * 100.0 / timeline.total_duration),
            );
        }
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

    fn timeline(turns: Vec<Turn>, total_duration: f64) -> Timeline {
        Timeline {
            conversation_id: "c1".to_string(),
            turns,
            total_duration,
            speakers: SpeakerPair {
                a: "A".to_string(),
                b: "B".to_string(),
            },
        }
    }

    #[test]
    fn test_worked_example() {
        // gaps: after turn 1 (A) = 0, after turn 2 (B) = 0,
        // after turn 3 (A) = 0.6; trailing turn contributes nothing.
        // A's mean pause = 0.3s, as a percentage of 6s = 5.0
        let tl = timeline(
            vec![
                turn(0.0, 2.0, "A"),
                turn(2.0, 3.0, "B"),
                turn(3.0, 3.4, "A"),
                turn(4.0, 6.0, "B"),
            ],
            6.0,
        );
        let out = Pauses.extract(&tl).unwrap();
        let scores = &out.speaker_values["avg_pause_pct"];
        assert!((scores["A"] - 5.0).abs() < 1e-9);
        assert!((scores["B"] - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_yields_negative_pause() {
        // B starts 0.5s before A finishes
        let tl = timeline(vec![turn(0.0, 2.0, "A"), turn(1.5, 3.0, "B")], 10.0);
        let out = Pauses.extract(&tl).unwrap();
        let scores = &out.speaker_values["avg_pause_pct"];
        assert!((scores["A"] - (-5.0)).abs() < 1e-9);
        // B has no successor, so B contributes no pause at all
        assert!(!scores.contains_key("B"));
    }

    #[test]
    fn test_zero_duration_yields_no_values() {
        let tl = timeline(vec![turn(0.0, 1.0, "A"), turn(1.0, 2.0, "B")], 0.0);
        let out = Pauses.extract(&tl).unwrap();
        assert!(out.speaker_values.is_empty());
    }
}
