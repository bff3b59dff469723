use actix::{ActorContext, Context, Handler, MessageResult};
use tracing::debug;

use crate::live::{
    messages::{Dispose, GetSnapshot, PollNow, VisibilityChanged},
    LiveSync,
};

impl Handler<PollNow> for LiveSync {
    type Result = ();

    fn handle(&mut self, _msg: PollNow, ctx: &mut Context<Self>) -> Self::Result {
        self.poll(ctx);
    }
}

impl Handler<VisibilityChanged> for LiveSync {
    type Result = ();

    fn handle(&mut self, msg: VisibilityChanged, ctx: &mut Context<Self>) -> Self::Result {
        if msg.visible {
            debug!(widget_id = %self.widget_id, "page visible again, polling now");
            self.poll(ctx);
        }
    }
}

impl Handler<GetSnapshot> for LiveSync {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _msg: GetSnapshot, _ctx: &mut Context<Self>) -> Self::Result {
        MessageResult(self.state.snapshot())
    }
}

impl Handler<Dispose> for LiveSync {
    type Result = ();

    fn handle(&mut self, _msg: Dispose, ctx: &mut Context<Self>) -> Self::Result {
        ctx.stop();
    }
}
