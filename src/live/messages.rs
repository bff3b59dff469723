use actix::Message;

use super::state::SyncSnapshot;

/// Requests an immediate reconciliation poll (subject to single-flight).
#[derive(Message)]
#[rtype(result = "()")]
pub struct PollNow;

/// Page visibility change reported by the host.
#[derive(Message)]
#[rtype(result = "()")]
pub struct VisibilityChanged {
    pub visible: bool,
}

#[derive(Message)]
#[rtype(result = "SyncSnapshot")]
pub struct GetSnapshot;

/// Tears the widget down: local tick, poll interval and deadline timer are
/// cancelled and the snapshot channel is closed.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Dispose;
