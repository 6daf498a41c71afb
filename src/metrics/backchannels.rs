//! Backchannels: short acknowledgments produced while the other speaker
//! holds the floor

use crate::error::DynamicsError;
use crate::metrics::Metric;
use crate::types::{MetricOutput, Timeline, Turn};

/// A turn at most this long can qualify as a backchannel
const MAX_BACKCHANNEL_SEC: f64 = 1.0;

/// A turn is a backchannel iff it is temporally nested inside at least one
/// other turn (`other.start <= turn.start && other.end >= turn.end`, self
/// excluded) and lasts at most one second.
///
/// The rate for speaker A is A's backchannel count as a percentage of *B's*
/// total turn count: "how often does A backchannel while B is holding the
/// floor", normalized by B's turn volume. The asymmetry is deliberate; a
/// symmetric proportion would change the metric's meaning.
pub struct Backchannels;

impl Metric for Backchannels {
    fn name(&self) -> &'static str {
        "backchannels"
    }

    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError> {
        let a = &timeline.speakers.a;
        let b = &timeline.speakers.b;

        let mut count_a = 0u32;
        let mut count_b = 0u32;
        for (i, turn) in timeline.turns.iter().enumerate() {
            if is_backchannel(i, turn, &timeline.turns) {
                if turn.speaker == *a {
                    count_a += 1;
                } else {
                    count_b += 1;
                }
            }
        }

        let turns_a = timeline.turn_count(a) as f64;
        let turns_b = timeline.turn_count(b) as f64;

        let mut out = MetricOutput::default();
        // the pair is derived from the timeline, so both counts are >= 1
        out.push_speaker(
            "backchannels",
            a,
            Some(f64::from(count_a) * 100.0 / turns_b),
        );
        out.push_speaker(
            "backchannels",
            b,
            Some(f64::from(count_b) * 100.0 / turns_a),
        );
        Ok(out)
    }
}

fn is_backchannel(index: usize, turn: &Turn, turns: &[Turn]) -> bool {
    if turn.duration() > MAX_BACKCHANNEL_SEC {
        return false;
    }
    turns
        .iter()
        .enumerate()
        .any(|(j, other)| j != index && other.start <= turn.start && other.end >= turn.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpeakerPair;

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
            total_duration: 60.0,
            speakers: SpeakerPair {
                a: "A".to_string(),
                b: "B".to_string(),
            },
        }
    }

    #[test]
    fn test_short_nested_turn_is_backchannel() {
        let turns = vec![
            turn(0.0, 10.0, "A"),
            turn(2.0, 2.9, "B"), // 0.9s, nested in A's turn
            turn(10.0, 12.0, "B"),
        ];
        assert!(is_backchannel(1, &turns[1], &turns));
    }

    #[test]
    fn test_long_nested_turn_is_not_backchannel() {
        let turns = vec![
            turn(0.0, 10.0, "A"),
            turn(2.0, 3.5, "B"), // nested, but 1.5s
        ];
        assert!(!is_backchannel(1, &turns[1], &turns));
    }

    #[test]
    fn test_short_unnested_turn_is_not_backchannel() {
        let turns = vec![turn(0.0, 2.0, "A"), turn(3.0, 3.5, "B")];
        assert!(!is_backchannel(1, &turns[1], &turns));
    }

    #[test]
    fn test_turn_is_not_nested_in_itself() {
        let turns = vec![turn(0.0, 0.5, "A"), turn(5.0, 6.0, "B")];
        assert!(!is_backchannel(0, &turns[0], &turns));
    }

    #[test]
    fn test_rate_normalized_by_other_speakers_turn_count() {
        // B backchannels twice during A's long turns; A has 4 turns, B has 3
        let tl = timeline(vec![
            turn(0.0, 10.0, "A"),
            turn(3.0, 3.5, "B"),
            turn(6.0, 6.4, "B"),
            turn(10.0, 15.0, "A"),
            turn(15.0, 20.0, "B"),
            turn(20.0, 24.0, "A"),
            turn(24.0, 30.0, "A"),
        ]);
        let out = Backchannels.extract(&tl).unwrap();
        let scores = &out.speaker_values["backchannels"];
        // B: 2 backchannels / A's 4 turns = 50%
        assert!((scores["B"] - 50.0).abs() < 1e-9);
        // A: 0 backchannels / B's 3 turns = 0%
        assert!((scores["A"] - 0.0).abs() < 1e-9);
    }
}
