//! Redraw scheduling.
//!
//! The scene is not redrawn on a timer.  A frame is rendered only when
//! something asks for one: the first load, a camera frame with a hand in it,
//! or a user reset.  Requests that arrive before the next render coalesce
//! into a single pending frame.

use crate::gesture::HandFrame;

/// Why a frame is being drawn.  Ordered by precedence when coalescing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum RedrawTrigger {
    InitialLoad,
    Gesture,
    Reset,
}

#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pending: Option<RedrawTrigger>,
    latest: Option<HandFrame>,
}

impl RedrawScheduler {
    /// A scheduler with the initial-load frame already queued.
    pub fn new() -> Self {
        RedrawScheduler { pending: Some(RedrawTrigger::InitialLoad), latest: None }
    }

    pub fn request(&mut self, trigger: RedrawTrigger) {
        self.pending = Some(self.pending.map_or(trigger, |p| p.max(trigger)));
    }

    /// Store the detector's newest frame, replacing any older one.  Only a
    /// frame with a hand in it asks for a redraw.
    pub fn offer_hands(&mut self, frame: HandFrame) {
        let has_hand = frame.has_hand();
        self.latest = Some(frame);
        if has_hand {
            self.request(RedrawTrigger::Gesture);
        }
    }

    /// The newest detector frame, if any has arrived.
    pub fn latest_hands(&self) -> Option<&HandFrame> {
        self.latest.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.pending.is_some()
    }

    /// Claim the pending frame, clearing the request.
    pub fn take(&mut self) -> Option<RedrawTrigger> {
        self.pending.take()
    }
}
