//! Pipeline orchestration
//!
//! The public API for conversation dynamics processing: select the timeline
//! source (diarized segments or transcript utterances), normalize it, run
//! every registered metric against the immutable timeline, and merge the
//! partial outputs into one flat feature record per conversation.

use chrono::Utc;
use tracing::{debug, warn};

use crate::error::DynamicsError;
use crate::formatter::format_record;
use crate::metrics::{Metric, MetricKind};
use crate::normalizer::{NoisePolicy, TimelineNormalizer};
use crate::types::{Conversation, FeatureReport, MetricOutput, Timeline};

/// Orchestrator holding the registered metrics and the normalization policy.
///
/// Metrics run independently; no metric reads another's output, so their
/// order only affects log ordering.
pub struct DynamicsProcessor {
    normalizer: TimelineNormalizer,
    metrics: Vec<Box<dyn Metric>>,
}

impl Default for DynamicsProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicsProcessor {
    /// New processor with no metrics registered and the default noise policy
    pub fn new() -> Self {
        Self {
            normalizer: TimelineNormalizer::new(),
            metrics: Vec::new(),
        }
    }

    /// New processor with an explicit noise-removal policy
    pub fn with_noise_policy(policy: NoisePolicy) -> Self {
        Self {
            normalizer: TimelineNormalizer::with_policy(policy),
            metrics: Vec::new(),
        }
    }

    /// Register metrics by name. All names are resolved before any metric is
    /// added, so an unknown name leaves the processor unchanged rather than
    /// partially registered.
    pub fn register_metrics<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), DynamicsError> {
        let kinds = names
            .iter()
            .map(|name| name.as_ref().parse::<MetricKind>())
            .collect::<Result<Vec<_>, _>>()?;
        self.metrics.extend(kinds.into_iter().map(MetricKind::instantiate));
        Ok(())
    }

    /// Register every metric in the registry
    pub fn register_all_metrics(&mut self) {
        self.metrics
            .extend(MetricKind::ALL.into_iter().map(MetricKind::instantiate));
    }

    /// Register a pre-instantiated metric
    pub fn register_metric(&mut self, metric: Box<dyn Metric>) {
        self.metrics.push(metric);
    }

    /// Names of the currently registered metrics, in run order
    pub fn metric_names(&self) -> Vec<&'static str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Compute the feature record for one conversation.
    ///
    /// Diarized segments drive the timeline when present; otherwise the
    /// transcript does. A metric failing with `MissingAuxiliaryInput` is
    /// skipped without aborting its siblings; any other metric error fails
    /// the conversation.
    pub fn process(&self, conversation: &Conversation) -> Result<FeatureReport, DynamicsError> {
        let timeline = self.build_timeline(conversation)?;

        let mut outputs: Vec<MetricOutput> = Vec::with_capacity(self.metrics.len());
        for metric in &self.metrics {
            debug!(
                conversation_id = %timeline.conversation_id,
                metric = metric.name(),
                "extracting metric"
            );
            match metric.extract(&timeline) {
                Ok(output) => outputs.push(output),
                Err(err @ DynamicsError::MissingAuxiliaryInput { .. }) => {
                    warn!(
                        conversation_id = %timeline.conversation_id,
                        metric = metric.name(),
                        %err,
                        "skipping metric"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        Ok(FeatureReport {
            conversation_id: conversation.id.clone(),
            computed_at: Utc::now(),
            features: format_record(&outputs, &timeline.speakers),
        })
    }

    /// Process a batch, attaching each conversation's feature report to its
    /// metadata. A failing conversation is recorded and the batch continues.
    pub fn process_batch(
        &self,
        conversations: &mut [Conversation],
    ) -> Vec<(String, DynamicsError)> {
        let mut failures = Vec::new();
        for conversation in conversations.iter_mut() {
            match self.process(conversation) {
                Ok(report) => conversation.dynamics = Some(report),
                Err(err) => {
                    warn!(conversation_id = %conversation.id, %err, "conversation failed");
                    failures.push((conversation.id.clone(), err));
                }
            }
        }
        failures
    }

    fn build_timeline(&self, conversation: &Conversation) -> Result<Timeline, DynamicsError> {
        if let Some(segments) = &conversation.segments {
            // the diarization collaborator normally supplies the audio
            // length; fall back to the segment span when it did not
            let total_duration = conversation.total_duration.unwrap_or_else(|| {
                segments.iter().map(|s| s.end).fold(0.0, f64::max)
            });
            return self
                .normalizer
                .normalize_segments(&conversation.id, segments, total_duration);
        }
        if let Some(utterances) = &conversation.utterances {
            return self.normalizer.normalize_utterances(
                &conversation.id,
                utterances,
                conversation.total_duration,
            );
        }
        Err(DynamicsError::NoTimelineSource {
            conversation_id: conversation.id.clone(),
        })
    }
}

/// One-shot convenience entry: conversation JSON in, feature-report JSON out,
/// with all six metrics unless an explicit list is given.
pub fn conversation_to_features(
    conversation_json: &str,
    metric_names: &[&str],
) -> Result<String, DynamicsError> {
    let conversation: Conversation = serde_json::from_str(conversation_json)?;

    let mut processor = DynamicsProcessor::new();
    if metric_names.is_empty() {
        processor.register_all_metrics();
    } else {
        processor.register_metrics(metric_names)?;
    }

    let report = processor.process(&conversation)?;
    Ok(serde_json::to_string(&report)?)
}
