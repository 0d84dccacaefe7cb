//! Progress reporting
//!
//! The engine pushes a `DrcEvent` to its observer at every checkpoint. Any
//! `FnMut(&DrcEvent)` closure is an observer.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DrcEvent {
    Started,
    /// Cumulative percentage, never decreasing within a run
    Progress { percent: u8 },
    Status { text: String },
    /// Description of a message just emitted
    Message { text: String },
    Finished { message_count: usize },
}

pub trait DrcObserver {
    fn on_event(&mut self, event: &DrcEvent);
}

impl<F> DrcObserver for F
where
    F: FnMut(&DrcEvent),
{
    fn on_event(&mut self, event: &DrcEvent) {
        self(event)
    }
}
