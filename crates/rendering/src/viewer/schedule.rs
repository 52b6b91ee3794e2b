//! Cancellable frame scheduling.
//!
//! The viewer never recurses into itself to get the next frame. It owns a
//! [`FrameLoop`] that holds at most one pending request with a
//! [`FrameScheduler`]; cancelling drops that request and refuses every
//! frame delivered afterwards.

use std::collections::VecDeque;

/// Handle for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

/// Something that can deliver "draw now" callbacks once per display refresh.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameId;
    fn cancel_frame(&mut self, id: FrameId);
}

/// Queue of requested frames, drained once per app update.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: VecDeque<FrameId>,
}

impl FrameQueue {
    /// Remove and return every frame requested since the last call.
    pub fn take_due(&mut self) -> Vec<FrameId> {
        self.pending.drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameId {
        self.next_id += 1;
        let id = FrameId(self.next_id);
        self.pending.push_back(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.pending.retain(|pending| *pending != id);
    }
}

/// Request/cancel bookkeeping for a continuously redrawn view.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameId>,
    running: bool,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            running: false,
        }
    }

    /// Start the loop by requesting the first frame. No-op when running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Accept the delivered frame `id`. False when the loop is stopped or
    /// `id` is not the outstanding request.
    pub fn begin_frame(&mut self, id: FrameId) -> bool {
        if !self.running || self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Request the following frame.
    pub fn schedule_next(&mut self) {
        if self.running && self.pending.is_none() {
            self.pending = Some(self.scheduler.request_frame());
        }
    }

    /// Stop the loop and drop the outstanding request.
    pub fn cancel(&mut self) {
        self.running = false;
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_hands_out_unique_ids() {
        let mut queue = FrameQueue::default();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.take_due(), vec![a, b]);
        assert!(queue.take_due().is_empty());
    }

    #[test]
    fn test_queue_cancel_removes_request() {
        let mut queue = FrameQueue::default();
        let a = queue.request_frame();
        let b = queue.request_frame();
        queue.cancel_frame(a);
        assert_eq!(queue.take_due(), vec![b]);
    }

    #[test]
    fn test_loop_accepts_only_outstanding_frame() {
        let mut frames = FrameLoop::new(FrameQueue::default());
        frames.start();
        let id = frames.pending().expect("first frame requested");
        assert!(!frames.begin_frame(FrameId(id.0 + 100)));
        assert!(frames.begin_frame(id));
        assert!(!frames.begin_frame(id), "same frame delivered twice");
        frames.schedule_next();
        assert!(frames.pending().is_some());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut frames = FrameLoop::new(FrameQueue::default());
        frames.start();
        frames.start();
        assert_eq!(frames.scheduler_mut().take_due().len(), 1);
    }

    #[test]
    fn test_cancel_withdraws_request_and_refuses_frames() {
        let mut frames = FrameLoop::new(FrameQueue::default());
        frames.start();
        let id = frames.pending().expect("requested");
        frames.cancel();
        assert!(!frames.is_running());
        assert_eq!(frames.scheduler().pending(), 0);
        assert!(!frames.begin_frame(id));
        frames.schedule_next();
        assert_eq!(frames.scheduler().pending(), 0);
    }
}
