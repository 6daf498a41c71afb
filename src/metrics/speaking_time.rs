//! Speaking time: share of the conversation each participant holds the floor

use crate::error::DynamicsError;
use crate::metrics::Metric;
use crate::types::{MetricOutput, Timeline};

/// Per speaker, summed turn duration as a percentage of the conversation's
/// total duration. Speaker-scoped only.
pub struct SpeakingTime;

impl Metric for SpeakingTime {
    fn name(&self) -> &'static str {
        "speaking_time"
    }

    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError> {
        let mut out = MetricOutput::default();
        if timeline.total_duration <= 0.0 {
            // no denominator, every value is undefined
            return Ok(out);
        }

        for speaker in [&timeline.speakers.a, &timeline.speakers.b] {
            let total: f64 = timeline.durations_for(speaker).iter().sum();
            out.push_speaker(
                "speaking_time",
                speaker,
                Some(total * 100.0 / timeline.total_duration),
            );
        }
        Ok(out)
    }
}
