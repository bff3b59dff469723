use actix::Message;

use crate::animation::CounterFrame;

/// Starts a fresh sweep unless one is already running.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Trigger;

/// Visibility report from the host's viewport observer.
#[derive(Message)]
#[rtype(result = "bool")]
pub struct Intersection {
    pub ratio: f64,
}

/// Back to `start_value` with the fire-once latch cleared. Immediate cards
/// start over right away; visibility-triggered cards wait for the next
/// qualifying `Intersection`.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Reset;

#[derive(Message)]
#[rtype(result = "CounterFrame")]
pub struct GetFrame;

/// Tears the card down, cancelling any scheduled frame.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Dispose;
