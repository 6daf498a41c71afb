//! Response time: latency before a speaker takes the floor

use std::collections::BTreeMap;

use crate::error::DynamicsError;
use crate::metrics::Metric;
use crate::stats;
use crate::types::{MetricOutput, Timeline};

/// For each adjacent pair of turns in the sorted timeline, the gap
/// `next.start - current.end` is attributed to the speaker of the *next*
/// turn: how long they waited after the previous turn ended before speaking.
/// Reported as a per-speaker mean in raw seconds (`avg_response_time`),
/// unlike `Pauses` which normalizes by total duration.
///
/// The gap arithmetic is identical to `Pauses`; only the attribution
/// differs.
pub struct ResponseTime;

impl Metric for ResponseTime {
    fn name(&self) -> &'static str {
        "response_time"
    }

    fn extract(&self, timeline: &Timeline) -> Result<MetricOutput, DynamicsError> {
        let mut gaps_by_speaker: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for window in timeline.turns.windows(2) {
            let gap = window[1].start - window[0].end;
            gaps_by_speaker
                .entry(&window[1].speaker)
                .or_default()
                .push(gap);
        }

        let mut out = MetricOutput::default();
        for (speaker, gaps) in gaps_by_speaker {
            out.push_speaker("avg_response_time", speaker, stats::mean(&gaps));
        }
        Ok(out)
    }
}
