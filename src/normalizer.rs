//! Timeline normalization
//!
//! Turns raw diarized segments or transcript utterances into the canonical
//! two-speaker `Timeline`: validates intervals, removes noise speakers,
//! sorts by start, and derives the stable speaker pair by first appearance.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::DynamicsError;
use crate::types::{Segment, SpeakerPair, Timeline, Turn, Utterance};

/// The dyadic metrics are defined for exactly this many speakers.
const DYAD_SIZE: usize = 2;

/// How to handle more than two diarized speakers.
///
/// Diarization tends to produce one spurious low-duration "speaker" from
/// noise or cross-talk rather than a legitimate third participant. Whether
/// that assumption justifies removing more than one speaker is left to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoisePolicy {
    /// Remove the single speaker with the smallest summed duration, then
    /// fail with `ExcessSpeakers` if more than two still remain. This is the
    /// conservative default: under-filtered input is surfaced, not guessed
    /// at.
    #[default]
    RemoveOnce,
    /// Repeat smallest-speaker removal until at most two remain.
    Iterative,
}

/// Normalizer producing canonical timelines from raw per-conversation input
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineNormalizer {
    policy: NoisePolicy,
}

impl TimelineNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: NoisePolicy) -> Self {
        Self { policy }
    }

    /// Normalize diarized segments. `total_duration` is the audio's known
    /// length in seconds, supplied by the diarization collaborator.
    pub fn normalize_segments(
        &self,
        conversation_id: &str,
        segments: &[Segment],
        total_duration: f64,
    ) -> Result<Timeline, DynamicsError> {
        for seg in segments {
            validate_interval(conversation_id, seg.start, seg.end, &seg.speaker)?;
        }

        let turns = segments
            .iter()
            .map(|s| Turn {
                start: s.start,
                end: s.end,
                speaker: s.speaker.clone(),
                text: None,
                delta: None,
            })
            .collect();

        self.finish(conversation_id, turns, total_duration)
    }

    /// Normalize transcript utterances. Transcripts carry no intrinsic
    /// recording length, so `total_duration` must either be supplied by the
    /// caller or is derived as the span from the first turn's start to the
    /// last turn's end.
    pub fn normalize_utterances(
        &self,
        conversation_id: &str,
        utterances: &[Utterance],
        total_duration: Option<f64>,
    ) -> Result<Timeline, DynamicsError> {
        let mut rows: Vec<&Utterance> = utterances.iter().collect();
        rows.sort_by(|x, y| x.start.total_cmp(&y.start));

        let mut turns = Vec::with_capacity(rows.len());
        for (i, utt) in rows.iter().enumerate() {
            // fall back to the next row's onset when the export has no
            // explicit offsets; the trailing row degrades to a point turn
            let end = utt
                .end
                .or_else(|| rows.get(i + 1).map(|next| next.start))
                .unwrap_or(utt.start);
            validate_interval(conversation_id, utt.start, end, &utt.speaker)?;
            turns.push(Turn {
                start: utt.start,
                end,
                speaker: utt.speaker.clone(),
                text: Some(utt.text.clone()),
                delta: utt.delta,
            });
        }

        let total = total_duration.unwrap_or_else(|| match (turns.first(), turns.last()) {
            (Some(first), Some(last)) => last.end - first.start,
            _ => 0.0,
        });

        self.finish(conversation_id, turns, total)
    }

    fn finish(
        &self,
        conversation_id: &str,
        mut turns: Vec<Turn>,
        total_duration: f64,
    ) -> Result<Timeline, DynamicsError> {
        turns = self.remove_noise_speakers(conversation_id, turns)?;
        turns.sort_by(|x, y| x.start.total_cmp(&y.start));

        let speakers = speaker_pair_by_appearance(conversation_id, &turns)?;

        Ok(Timeline {
            conversation_id: conversation_id.to_string(),
            turns,
            total_duration,
            speakers,
        })
    }

    /// Remove the speaker(s) with the smallest total speaking time while
    /// more than two are present, per the configured policy.
    fn remove_noise_speakers(
        &self,
        conversation_id: &str,
        mut turns: Vec<Turn>,
    ) -> Result<Vec<Turn>, DynamicsError> {
        loop {
            let totals = speaker_totals(&turns);
            if totals.len() <= DYAD_SIZE {
                return Ok(turns);
            }

            let Some((noise_speaker, noise_total)) = totals
                .iter()
                .min_by(|(sx, dx), (sy, dy)| dx.total_cmp(dy).then_with(|| sx.cmp(sy)))
                .map(|(s, d)| (s.clone(), *d))
            else {
                return Ok(turns);
            };

            debug!(
                conversation_id,
                speaker = %noise_speaker,
                total_duration = noise_total,
                "removing shortest speaker as noise"
            );
            turns.retain(|t| t.speaker != noise_speaker);

            if self.policy == NoisePolicy::RemoveOnce {
                let remaining = speaker_totals(&turns).len();
                if remaining > DYAD_SIZE {
                    return Err(DynamicsError::ExcessSpeakers {
                        conversation_id: conversation_id.to_string(),
                        found: remaining,
                    });
                }
                return Ok(turns);
            }
        }
    }
}

fn validate_interval(
    conversation_id: &str,
    start: f64,
    end: f64,
    speaker: &str,
) -> Result<(), DynamicsError> {
    if !start.is_finite() || !end.is_finite() {
        return Err(DynamicsError::InvalidSegment {
            conversation_id: conversation_id.to_string(),
            detail: format!("non-finite bounds [{start}, {end}] for speaker '{speaker}'"),
        });
    }
    if end < start {
        return Err(DynamicsError::InvalidSegment {
            conversation_id: conversation_id.to_string(),
            detail: format!("end {end} precedes start {start} for speaker '{speaker}'"),
        });
    }
    Ok(())
}

/// Total summed duration per speaker
fn speaker_totals(turns: &[Turn]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for turn in turns {
        *totals.entry(turn.speaker.clone()).or_insert(0.0) += turn.duration();
    }
    totals
}

/// The two speakers in order of first appearance in the sorted timeline
fn speaker_pair_by_appearance(
    conversation_id: &str,
    turns: &[Turn],
) -> Result<SpeakerPair, DynamicsError> {
    let mut first: Option<&str> = None;
    for turn in turns {
        match first {
            None => first = Some(&turn.speaker),
            Some(a) if turn.speaker != a => {
                return Ok(SpeakerPair {
                    a: a.to_string(),
                    b: turn.speaker.clone(),
                });
            }
            Some(_) => {}
        }
    }
    Err(DynamicsError::InsufficientSpeakers {
        conversation_id: conversation_id.to_string(),
        found: usize::from(first.is_some()),
    })
}
