//! Queue module - the pending-piece queue and the hold-swap state machine.
//!
//! Pieces flow through a double-ended queue of configured capacity. A
//! hold-returned kind is pushed to the front and may leave the queue one
//! element over capacity until the next dequeue drains it again; that dequeue
//! consumes the front without drawing a replacement.

use std::collections::VecDeque;

use blox_types::KindId;

use crate::rng::SimpleRng;

/// One dequeue outcome. `queued` carries the freshly drawn kind that entered
/// the pending queue during this dequeue, when one did: the over-capacity
/// path and capacity-zero feeds draw nothing into the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub kind: KindId,
    pub queued: Option<KindId>,
}

/// Supplies the session with pieces: random draws, the preview queue, and the
/// held piece.
#[derive(Debug, Clone)]
pub struct PieceFeed {
    queue: VecDeque<KindId>,
    capacity: usize,
    held: Option<KindId>,
    hold_available: bool,
    rng: SimpleRng,
    kind_count: usize,
}

impl PieceFeed {
    /// `kind_count` is the catalog size draws are sampled from, uniformly.
    pub fn new(kind_count: usize, capacity: usize, seed: u32) -> Self {
        debug_assert!(kind_count > 0);
        Self {
            queue: VecDeque::with_capacity(capacity + 1),
            capacity,
            held: None,
            hold_available: true,
            rng: SimpleRng::new(seed),
            kind_count,
        }
    }

    fn draw_random(&mut self) -> KindId {
        KindId(self.rng.next_range(self.kind_count as u32) as u8)
    }

    /// Fill the queue up to capacity with random draws, returning them in
    /// order so the session can report each as queued.
    pub fn prefill(&mut self) -> Vec<KindId> {
        let mut drawn = Vec::with_capacity(self.capacity);
        for _ in 0..self.capacity {
            let kind = self.draw_random();
            self.queue.push_back(kind);
            drawn.push(kind);
        }
        drawn
    }

    /// Produce the next piece kind to spawn.
    ///
    /// When the queue is over capacity (a held piece was pushed back), the
    /// front element is consumed directly: no new kind is drawn and `queued`
    /// stays None, so preview collaborators see no phantom draw. Otherwise a
    /// fresh kind is drawn; with a positive capacity it enters the back of
    /// the queue and the front is returned, keeping the preview one draw
    /// ahead, and with capacity zero the draw is returned directly.
    pub fn dequeue(&mut self) -> Draw {
        if self.queue.len() > self.capacity {
            let kind = self.queue.pop_front().expect("over-capacity queue is non-empty");
            return Draw { kind, queued: None };
        }

        let fresh = self.draw_random();
        if self.capacity > 0 {
            self.queue.push_back(fresh);
            let kind = self.queue.pop_front().expect("queue was just pushed");
            Draw {
                kind,
                queued: Some(fresh),
            }
        } else {
            Draw {
                kind: fresh,
                queued: None,
            }
        }
    }

    /// Stash `current` as the held piece. If another piece was already held
    /// it returns to play through the front of the queue, so the next
    /// dequeue consumes it before any fresh draw. Returns false (and does
    /// nothing) when the hold ability is spent for this piece cycle.
    pub fn hold(&mut self, current: KindId) -> bool {
        if !self.hold_available {
            return false;
        }
        self.hold_available = false;

        if let Some(previous) = self.held.replace(current) {
            self.queue.push_front(previous);
        }
        true
    }

    /// Re-arm the hold ability; called after every successful lock.
    pub fn rearm_hold(&mut self) {
        self.hold_available = true;
    }

    pub fn hold_available(&self) -> bool {
        self.hold_available
    }

    pub fn held(&self) -> Option<KindId> {
        self.held
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Pending kinds in dequeue order, front first.
    pub fn pending(&self) -> impl Iterator<Item = KindId> + '_ {
        self.queue.iter().copied()
    }
}
