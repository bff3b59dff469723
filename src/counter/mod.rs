use std::time::Duration;

use actix::{Actor, AsyncContext, Context, Running, SpawnHandle};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::animation::{AnimationSpec, AnimationStatus, CounterAnimation, CounterFrame};

pub mod handlers;
pub mod messages;

/// Render loop for one counter card.
///
/// The frame interval only runs while the animation is `Running`; every
/// change is published through the watch channel returned by `new`.
pub struct CounterCard {
    pub(crate) card_id: String,
    pub(crate) animation: CounterAnimation,
    pub(crate) frame_interval: Duration,
    pub(crate) frame_handle: Option<SpawnHandle>,
    pub(crate) publisher: watch::Sender<CounterFrame>,
}

impl CounterCard {
    pub fn new(
        card_id: impl Into<String>,
        spec: AnimationSpec,
        frame_interval: Duration,
    ) -> (Self, watch::Receiver<CounterFrame>) {
        let animation = CounterAnimation::new(spec);
        let (publisher, receiver) = watch::channel(animation.frame());
        let card = Self {
            card_id: card_id.into(),
            animation,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            frame_handle: None,
            publisher,
        };
        (card, receiver)
    }

    pub(crate) fn publish(&self) {
        let frame = self.animation.frame();
        self.publisher.send_if_modified(|current| {
            if *current != frame {
                *current = frame;
                true
            } else {
                false
            }
        });
    }

    /// Schedules frames after a successful trigger, or publishes the
    /// already-complete value for degenerate specs.
    pub(crate) fn after_trigger(&mut self, ctx: &mut Context<Self>) {
        if self.animation.is_animating() {
            self.schedule_frames(ctx);
        }
        self.publish();
    }

    /// 첫 프레임은 트리거 시점에 바로 그려서 시작 시각을 찍는다.
    fn schedule_frames(&mut self, ctx: &mut Context<Self>) {
        self.cancel_frames(ctx);
        if self.render_frame() != AnimationStatus::Running {
            return;
        }
        let handle = ctx.run_interval(self.frame_interval, |act, ctx| {
            if act.render_frame() != AnimationStatus::Running {
                act.cancel_frames(ctx);
            }
        });
        self.frame_handle = Some(handle);
    }

    fn render_frame(&mut self) -> AnimationStatus {
        let now = tokio::time::Instant::now().into_std();
        let status = self.animation.advance(now);
        self.publish();
        if status != AnimationStatus::Running {
            debug!(card_id = %self.card_id, "counter reached its end value");
        }
        status
    }

    pub(crate) fn cancel_frames(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.frame_handle.take() {
            ctx.cancel_future(handle);
        }
    }
}

impl Actor for CounterCard {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(card_id = %self.card_id, "CounterCard started");
        if self.animation.mount() {
            self.after_trigger(ctx);
        }
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        self.cancel_frames(ctx);
        Running::Stop
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(card_id = %self.card_id, "CounterCard stopped");
    }
}
