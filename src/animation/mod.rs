//! Count-up animation engine.
//!
//! `CounterAnimation`은 시계를 직접 읽지 않는다. 호출자가 프레임마다
//! `Instant`를 넘겨주고, 엔진은 그 시각에 맞는 값을 계산한다.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

pub mod easing;
pub mod format;
pub mod spec;

pub use easing::Easing;
pub use format::{classify, format_value, ValueColor};
pub use spec::{AnimationSpec, TriggerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationStatus {
    Idle,
    Running,
    Complete,
}

/// Mutable per-execution state.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRun {
    pub raw_value: f64,
    pub status: AnimationStatus,
    /// Stamped by the first frame after a trigger.
    pub start_timestamp: Option<Instant>,
    progress: f64,
}

impl AnimationRun {
    fn idle(start_value: f64) -> Self {
        Self {
            raw_value: start_value,
            status: AnimationStatus::Idle,
            start_timestamp: None,
            progress: 0.0,
        }
    }
}

/// Rendered state of one counter, published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterFrame {
    pub display_value: String,
    pub raw_value: f64,
    pub status: AnimationStatus,
    pub color: ValueColor,
}

#[derive(Debug, Clone)]
pub struct CounterAnimation {
    spec: AnimationSpec,
    run: AnimationRun,
    /// Fire-once latch for visibility triggering.
    has_triggered: bool,
}

impl CounterAnimation {
    pub fn new(spec: AnimationSpec) -> Self {
        let run = AnimationRun::idle(spec.start_value);
        Self {
            spec,
            run,
            has_triggered: false,
        }
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    pub fn run(&self) -> &AnimationRun {
        &self.run
    }

    pub fn raw_value(&self) -> f64 {
        self.run.raw_value
    }

    pub fn status(&self) -> AnimationStatus {
        self.run.status
    }

    pub fn is_animating(&self) -> bool {
        self.run.status == AnimationStatus::Running
    }

    pub fn is_complete(&self) -> bool {
        self.run.status == AnimationStatus::Complete
    }

    pub fn has_triggered(&self) -> bool {
        self.has_triggered
    }

    /// Called once when the host mounts the card. Immediate specs start here.
    pub fn mount(&mut self) -> bool {
        match self.spec.trigger_mode {
            TriggerMode::Immediate if !self.has_triggered => self.trigger(),
            _ => false,
        }
    }

    /// Starts a fresh run from `start_value`.
    ///
    /// Returns `false` when a run is already in flight. A degenerate spec
    /// (non-positive duration, non-finite bounds) completes immediately.
    pub fn trigger(&mut self) -> bool {
        if self.is_animating() {
            return false;
        }

        self.has_triggered = true;
        self.run = AnimationRun::idle(self.spec.start_value);

        if self.spec.is_instant() {
            debug!(
                duration_ms = self.spec.duration_ms,
                "degenerate animation spec, completing immediately"
            );
            self.complete();
        } else {
            self.run.status = AnimationStatus::Running;
        }
        true
    }

    /// Visibility callback from the host. `ratio` is the visible fraction of
    /// the card. Triggers at most once until `reset`.
    pub fn observe_intersection(&mut self, ratio: f64) -> bool {
        if self.spec.trigger_mode != TriggerMode::OnVisible || self.has_triggered {
            return false;
        }
        if ratio.is_nan() || ratio < self.spec.threshold() || ratio <= 0.0 {
            return false;
        }
        self.trigger()
    }

    /// Per-frame update. Returns the status after applying the frame.
    pub fn advance(&mut self, now: Instant) -> AnimationStatus {
        if self.run.status != AnimationStatus::Running {
            return self.run.status;
        }

        let start = *self.run.start_timestamp.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        let progress = self.progress_at(elapsed).max(self.run.progress);
        self.run.progress = progress;

        if progress >= 1.0 {
            self.complete();
        } else {
            let eased = self.spec.easing.apply(progress);
            self.run.raw_value =
                self.spec.start_value + (self.spec.end_value - self.spec.start_value) * eased;
        }
        self.run.status
    }

    /// Cancels the run and clears the fire-once latch.
    pub fn reset(&mut self) {
        self.run = AnimationRun::idle(self.spec.start_value);
        self.has_triggered = false;
    }

    pub fn display_value(&self) -> String {
        format_value(
            self.run.raw_value,
            self.spec.decimal_places,
            &self.spec.prefix,
            &self.spec.suffix,
        )
    }

    pub fn color(&self) -> ValueColor {
        classify(self.run.raw_value)
    }

    pub fn frame(&self) -> CounterFrame {
        CounterFrame {
            display_value: self.display_value(),
            raw_value: self.run.raw_value,
            status: self.run.status,
            color: self.color(),
        }
    }

    fn progress_at(&self, elapsed: Duration) -> f64 {
        let duration_ms = self.spec.duration_ms as f64;
        if duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed.as_secs_f64() * 1000.0 / duration_ms).clamp(0.0, 1.0)
    }

    fn complete(&mut self) {
        // 부동소수점 잔차 없이 정확히 end_value로 맞춘다
        self.run.raw_value = self.spec.end_value;
        self.run.progress = 1.0;
        self.run.status = AnimationStatus::Complete;
    }
}
