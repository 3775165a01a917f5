use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use worldpreview_core::{LayerSampler, PreviewGrid, PreviewSettings};

use crate::buffer::PixelBuffer;
use crate::coordinator::{TaskCoordinator, TaskHandle, TaskOutcome};
use crate::error::PipelineError;

/// When a change to one input field should reach the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitTrigger {
    /// Submit as soon as the change is observed.
    Immediate,
    /// Mark the session dirty and wait for an explicit `apply`.
    Deferred,
}

/// Per-field debounce policy for observed input changes.
///
/// Preview recomputation is expensive, so the default defers every
/// change after the first render behind an explicit apply. Hosts that
/// want, say, layer switches to re-render immediately while zoom stays
/// debounced can configure that per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebouncePolicy {
    pub layer: SubmitTrigger,
    pub zoom: SubmitTrigger,
    pub seed: SubmitTrigger,
}

impl DebouncePolicy {
    /// Every change submits without waiting for apply.
    pub const IMMEDIATE: Self = Self {
        layer: SubmitTrigger::Immediate,
        zoom: SubmitTrigger::Immediate,
        seed: SubmitTrigger::Immediate,
    };

    fn wants_immediate(&self, prev: &PreviewSettings, next: &PreviewSettings) -> bool {
        (prev.layer != next.layer && self.layer == SubmitTrigger::Immediate)
            || (prev.zoom != next.zoom && self.zoom == SubmitTrigger::Immediate)
            || (prev.seed != next.seed && self.seed == SubmitTrigger::Immediate)
    }
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self {
            layer: SubmitTrigger::Deferred,
            zoom: SubmitTrigger::Deferred,
            seed: SubmitTrigger::Deferred,
        }
    }
}

/// What a control-loop tick did with the observed inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Inputs equal the last observed state; nothing to do.
    Unchanged,
    /// A task was started for the observed state.
    Submitted(TaskHandle),
    /// The change was recorded; an explicit `apply` will submit it.
    MarkedDirty,
}

/// A current, terminal outcome surfaced to the presentation layer.
///
/// Cancellations are consumed inside the session and never appear here.
#[derive(Debug)]
pub enum PreviewUpdate {
    /// The finished buffer, ownership transferred to the caller.
    Ready(PixelBuffer),
    /// Generation failed; degrade to an error-display state.
    Failed(PipelineError),
}

/// Control-loop policy layer over the coordinator: structural-equality
/// deduplication of observed inputs, first-observation auto-submit, and
/// the dirty/apply debounce for later changes.
pub struct PreviewSession {
    coordinator: TaskCoordinator,
    grid: PreviewGrid,
    policy: DebouncePolicy,
    layers: Vec<String>,
    observed: Option<PreviewSettings>,
    pending: Option<PreviewSettings>,
}

impl PreviewSession {
    pub fn new<S>(sampler: Arc<S>, grid: PreviewGrid, policy: DebouncePolicy) -> Self
    where
        S: LayerSampler + Send + Sync + 'static,
    {
        let layers = sampler.layers();
        Self {
            coordinator: TaskCoordinator::spawn(sampler),
            grid,
            policy,
            layers,
            observed: None,
            pending: None,
        }
    }

    /// Feed the inputs sampled on this control-loop tick.
    ///
    /// Equal back-to-back states are deduplicated and start no task. The
    /// first observed state submits immediately; later changes follow
    /// the debounce policy.
    pub fn observe(&mut self, settings: PreviewSettings) -> TickAction {
        if self.observed.as_ref() == Some(&settings) {
            return TickAction::Unchanged;
        }

        let immediate = match &self.observed {
            None => true,
            Some(prev) => self.policy.wants_immediate(prev, &settings),
        };
        self.observed = Some(settings.clone());

        if immediate {
            TickAction::Submitted(self.submit(settings))
        } else {
            debug!(
                layer = %settings.layer,
                zoom = settings.zoom,
                "Preview inputs changed; awaiting apply"
            );
            self.pending = Some(settings);
            TickAction::MarkedDirty
        }
    }

    /// Explicit trigger: submit the pending dirty state, if any.
    pub fn apply(&mut self) -> Option<TaskHandle> {
        let settings = self.pending.take()?;
        Some(self.submit(settings))
    }

    /// Whether a change is waiting for `apply`.
    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Surface the current task's terminal outcome, if one has arrived.
    ///
    /// Stale outcomes were already dropped by the coordinator;
    /// cancellations are swallowed here, so callers only ever see a
    /// ready buffer or a failure.
    pub fn poll(&mut self) -> Option<PreviewUpdate> {
        while let Some((_, outcome)) = self.coordinator.poll() {
            match outcome {
                TaskOutcome::Success(buffer) => return Some(PreviewUpdate::Ready(buffer)),
                TaskOutcome::Failure(e) => {
                    warn!(error = %e, "Preview generation failed");
                    return Some(PreviewUpdate::Failed(e));
                }
                TaskOutcome::Cancelled => continue,
            }
        }
        None
    }

    /// Cancel the in-flight task, keeping any pending dirty state.
    pub fn cancel(&mut self) {
        self.coordinator.cancel_current();
    }

    /// Ordered layer names offered by the sampler.
    pub fn layers(&self) -> &[String] {
        &self.layers
    }

    /// Default layer selection: the first one in the list.
    pub fn default_layer(&self) -> Option<&str> {
        self.layers.first().map(String::as_str)
    }

    /// Row progress of the running scan, for host display.
    pub fn progress(&self) -> (usize, usize) {
        self.coordinator.progress()
    }

    fn submit(&mut self, settings: PreviewSettings) -> TaskHandle {
        self.pending = None;
        self.coordinator.submit(self.grid, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::{Duration, Instant};

    use worldpreview_core::{Color, SampleError, SampleRect};

    /// Two-layer stub: "height" renders gray, "biome" renders green.
    struct TerrainStub;

    impl LayerSampler for TerrainStub {
        fn layers(&self) -> Vec<String> {
            vec!["height".into(), "biome".into()]
        }

        fn set_seed(&self, _seed: &str) {}

        fn sample(&self, layer: &str, area: SampleRect) -> Result<Color, SampleError> {
            // Blue channel carries the cell size (zoom) for assertions.
            match layer {
                "height" => Ok(Color::rgb(128, 128, area.width as u8)),
                "biome" => Ok(Color::rgb(0, 200, area.width as u8)),
                other => Err(SampleError::new(format!("unknown layer: {other}"))),
            }
        }
    }

    fn settings(layer: &str, zoom: u32) -> PreviewSettings {
        PreviewSettings::new(layer, zoom, "seed").unwrap()
    }

    fn poll_until(session: &mut PreviewSession, timeout: Duration) -> Option<PreviewUpdate> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(update) = session.poll() {
                return Some(update);
            }
            thread::sleep(Duration::from_millis(1));
        }
        None
    }

    fn ready_buffer(session: &mut PreviewSession) -> PixelBuffer {
        match poll_until(session, Duration::from_secs(5)) {
            Some(PreviewUpdate::Ready(buf)) => buf,
            other => panic!("expected a ready buffer, got {other:?}"),
        }
    }

    fn test_session(policy: DebouncePolicy) -> PreviewSession {
        PreviewSession::new(
            Arc::new(TerrainStub),
            PreviewGrid::square(8).unwrap(),
            policy,
        )
    }

    #[test]
    fn default_layer_is_first_in_list() {
        let session = test_session(DebouncePolicy::default());
        assert_eq!(session.layers(), ["height", "biome"]);
        assert_eq!(session.default_layer(), Some("height"));
    }

    #[test]
    fn first_observation_submits_and_equal_states_deduplicate() {
        let mut session = test_session(DebouncePolicy::default());

        let action = session.observe(settings("height", 10));
        assert!(matches!(action, TickAction::Submitted(_)));

        // Same state on the next ticks: no new task, no dirty flag.
        assert_eq!(session.observe(settings("height", 10)), TickAction::Unchanged);
        assert_eq!(session.observe(settings("height", 10)), TickAction::Unchanged);
        assert!(!session.is_dirty());

        let buf = ready_buffer(&mut session);
        assert_eq!(buf.pixel_at(0, 0), [128, 128, 10, 255]);
    }

    #[test]
    fn later_changes_wait_for_apply() {
        let mut session = test_session(DebouncePolicy::default());
        session.observe(settings("height", 10));
        let _ = ready_buffer(&mut session);

        // Select "biome", then bump zoom 10 → 20: dirty, nothing submitted.
        assert_eq!(session.observe(settings("biome", 10)), TickAction::MarkedDirty);
        assert_eq!(session.observe(settings("biome", 20)), TickAction::MarkedDirty);
        assert_eq!(session.observe(settings("biome", 20)), TickAction::Unchanged);
        assert!(session.is_dirty());
        assert!(
            poll_until(&mut session, Duration::from_millis(100)).is_none(),
            "no task may start before apply"
        );

        // Apply submits exactly one task for the newest pending state.
        assert!(session.apply().is_some());
        assert!(!session.is_dirty());
        assert!(session.apply().is_none(), "apply is one-shot");

        let buf = ready_buffer(&mut session);
        assert_eq!(buf.pixel_at(0, 0), [0, 200, 20, 255]);
    }

    #[test]
    fn immediate_policy_resubmits_per_field() {
        let policy = DebouncePolicy {
            layer: SubmitTrigger::Immediate,
            ..DebouncePolicy::default()
        };
        let mut session = test_session(policy);
        session.observe(settings("height", 10));
        let _ = ready_buffer(&mut session);

        // Layer changes bypass the debounce; zoom changes do not.
        assert!(matches!(
            session.observe(settings("biome", 10)),
            TickAction::Submitted(_)
        ));
        let _ = ready_buffer(&mut session);
        assert_eq!(session.observe(settings("biome", 20)), TickAction::MarkedDirty);
    }

    #[test]
    fn failure_surfaces_without_killing_the_session() {
        let mut session = test_session(DebouncePolicy::IMMEDIATE);

        session.observe(settings("height", 10));
        let _ = ready_buffer(&mut session);

        // An unknown layer makes the stub sampler fail.
        let bogus = PreviewSettings::new("lava", 10, "seed").unwrap();
        session.observe(bogus);
        match poll_until(&mut session, Duration::from_secs(5)) {
            Some(PreviewUpdate::Failed(PipelineError::Sampling(_))) => {}
            other => panic!("expected a sampling failure, got {other:?}"),
        }

        // The session keeps working afterwards.
        session.observe(settings("biome", 10));
        let buf = ready_buffer(&mut session);
        assert_eq!(buf.pixel_at(0, 0), [0, 200, 10, 255]);
    }
}
