use std::{sync::Arc, time::Duration};

use actix::{
    Actor, ActorFutureExt, Addr, AsyncContext, Context, Running, SpawnHandle, WrapFuture,
};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

pub mod config;
pub mod handlers;
pub mod messages;
pub mod source;
pub mod state;
pub mod status;

use self::{
    config::SyncConfig,
    source::{fetch_update, StatusSource},
    state::{SyncSnapshot, SyncState, Transition},
};

/// Live submission-bonus widget.
///
/// 로컬 틱(공격 이름 스크램블)과 서버 폴링을 하나의 액터 컨텍스트에서
/// 돌리기 때문에 둘은 절대 중간에 끼어들지 않는다.
pub struct LiveSync {
    pub(crate) widget_id: Uuid,
    pub(crate) config: SyncConfig,
    pub(crate) state: SyncState,
    source: Arc<dyn StatusSource>,
    publisher: watch::Sender<SyncSnapshot>,

    tick_handle: Option<SpawnHandle>,
    poll_handle: Option<SpawnHandle>,
    deadline_handle: Option<SpawnHandle>,

    /// Single-flight guard for the reconciliation poll.
    poll_in_flight: bool,
    /// Bumped on the ended transition; polls started before it are stale.
    end_epoch: u64,
}

impl LiveSync {
    pub fn new(
        config: SyncConfig,
        source: Arc<dyn StatusSource>,
    ) -> (Self, watch::Receiver<SyncSnapshot>) {
        let state = SyncState::new(&config, Utc::now());
        Self::with_state(config, state, source)
    }

    pub fn with_state(
        config: SyncConfig,
        state: SyncState,
        source: Arc<dyn StatusSource>,
    ) -> (Self, watch::Receiver<SyncSnapshot>) {
        let (publisher, receiver) = watch::channel(state.snapshot());
        let widget = Self {
            widget_id: Uuid::new_v4(),
            config,
            state,
            source,
            publisher,
            tick_handle: None,
            poll_handle: None,
            deadline_handle: None,
            poll_in_flight: false,
            end_epoch: 0,
        };
        (widget, receiver)
    }

    /// Starts the actor and returns its address with the snapshot receiver.
    pub fn launch(
        config: SyncConfig,
        source: Arc<dyn StatusSource>,
    ) -> (Addr<Self>, watch::Receiver<SyncSnapshot>) {
        let (widget, receiver) = Self::new(config, source);
        (widget.start(), receiver)
    }

    pub(crate) fn poll(&mut self, ctx: &mut Context<Self>) {
        if self.poll_in_flight {
            debug!(widget_id = %self.widget_id, "poll already in flight, skipping");
            return;
        }
        self.poll_in_flight = true;

        let source = self.source.clone();
        let epoch = self.end_epoch;

        let fut = async move { fetch_update(source.as_ref()).await }
            .into_actor(self)
            .map(move |update, act, ctx| {
                act.poll_in_flight = false;

                if act.end_epoch != epoch {
                    debug!(
                        widget_id = %act.widget_id,
                        "discarding poll result that resolved after the widget ended"
                    );
                    return;
                }

                match update {
                    Some(update) => {
                        let transition = act.state.apply_update(update);
                        act.on_transition(transition, ctx);
                    }
                    None => act.state.mark_disconnected(),
                }
                act.publish();
            });
        ctx.spawn(fut);
    }

    fn on_transition(&mut self, transition: Transition, ctx: &mut Context<Self>) {
        match transition {
            Transition::EnteredFixed => self.stop_tick(ctx),
            Transition::EnteredLooping => self.start_tick(ctx),
            Transition::Unchanged | Transition::Ignored => {}
        }
    }

    fn start_tick(&mut self, ctx: &mut Context<Self>) {
        if self.tick_handle.is_some() {
            return;
        }
        let handle = ctx.run_interval(self.config.local_tick_interval(), |act, _ctx| {
            if act.state.tick() {
                act.publish();
            }
        });
        self.tick_handle = Some(handle);
    }

    fn stop_tick(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.tick_handle.take() {
            ctx.cancel_future(handle);
        }
    }

    fn schedule_deadline(&mut self, ctx: &mut Context<Self>) {
        let Some(deadline) = self.config.event_deadline else {
            return;
        };
        let remaining = (deadline - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        info!(
            widget_id = %self.widget_id,
            %deadline,
            "widget ends in {:?}",
            remaining
        );
        let handle = ctx.run_later(remaining, |act, ctx| {
            act.deadline_handle = None;
            act.finish(ctx);
        });
        self.deadline_handle = Some(handle);
    }

    fn finish(&mut self, ctx: &mut Context<Self>) {
        if !self.state.end() {
            return;
        }
        self.end_epoch += 1;
        self.stop_tick(ctx);
        self.publish();
    }

    fn publish(&self) {
        let snapshot = self.state.snapshot();
        self.publisher.send_if_modified(|current| {
            if *current != snapshot {
                *current = snapshot;
                true
            } else {
                false
            }
        });
    }

    fn cancel_all(&mut self, ctx: &mut Context<Self>) {
        self.stop_tick(ctx);
        for handle in [self.poll_handle.take(), self.deadline_handle.take()]
            .into_iter()
            .flatten()
        {
            ctx.cancel_future(handle);
        }
    }
}

impl Actor for LiveSync {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(
            widget_id = %self.widget_id,
            mode = ?self.state.mode(),
            status_endpoint = %self.config.status_endpoint,
            "LiveSync actor started"
        );
        self.publish();

        if self.state.is_ended() {
            info!(widget_id = %self.widget_id, "widget already ended, local tick not started");
        } else {
            if self.state.mode() == state::SyncMode::Looping {
                self.start_tick(ctx);
            }
            self.schedule_deadline(ctx);
        }

        // 폴링은 모드와 무관하게 계속 돈다
        let handle = ctx.run_interval(self.config.poll_interval(), |act, ctx| {
            act.poll(ctx);
        });
        self.poll_handle = Some(handle);
        self.poll(ctx);
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        info!(widget_id = %self.widget_id, "LiveSync stopping, cancelling timers");
        self.cancel_all(ctx);
        Running::Stop
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(widget_id = %self.widget_id, "LiveSync stopped");
    }
}
