use actix::{ActorContext, Context, Handler, MessageResult};
use tracing::debug;

use crate::counter::{
    messages::{Dispose, GetFrame, Intersection, Reset, Trigger},
    CounterCard,
};

impl Handler<Trigger> for CounterCard {
    type Result = bool;

    fn handle(&mut self, _msg: Trigger, ctx: &mut Context<Self>) -> Self::Result {
        if !self.animation.trigger() {
            debug!(card_id = %self.card_id, "trigger ignored, animation already running");
            return false;
        }
        self.after_trigger(ctx);
        true
    }
}

impl Handler<Intersection> for CounterCard {
    type Result = bool;

    fn handle(&mut self, msg: Intersection, ctx: &mut Context<Self>) -> Self::Result {
        if !self.animation.observe_intersection(msg.ratio) {
            return false;
        }
        debug!(card_id = %self.card_id, ratio = msg.ratio, "card became visible");
        self.after_trigger(ctx);
        true
    }
}

impl Handler<Reset> for CounterCard {
    type Result = ();

    fn handle(&mut self, _msg: Reset, ctx: &mut Context<Self>) -> Self::Result {
        self.cancel_frames(ctx);
        self.animation.reset();
        // immediate 카드는 마운트 때처럼 곧바로 다시 시작한다
        if self.animation.mount() {
            debug!(card_id = %self.card_id, "immediate card restarted after reset");
            self.after_trigger(ctx);
        } else {
            self.publish();
        }
    }
}

impl Handler<GetFrame> for CounterCard {
    type Result = MessageResult<GetFrame>;

    fn handle(&mut self, _msg: GetFrame, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.animation.frame())
    }
}

impl Handler<Dispose> for CounterCard {
    type Result = ();

    fn handle(&mut self, _msg: Dispose, ctx: &mut Context<Self>) -> Self::Result {
        ctx.stop();
    }
}
