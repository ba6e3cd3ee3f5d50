//! Instruction tags and the retirement queue.
//!
//! Every instruction is assigned a small tag at dispatch. Tags serve two
//! jobs: they name in-flight results for the bypass network, and their
//! allocation order is the commit order. A cracked instruction's two halves
//! share one tag; the tag retires when the last half commits.

use std::collections::VecDeque;

/// Number of tags, which bounds the instructions in flight past dispatch.
pub const TAG_COUNT: usize = 4;

/// A dispatch tag. Values are recycled, so a tag only names a unique
/// instruction while that instruction is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsnTag(u8);

impl InsnTag {
    pub fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Tag allocator and in-order retirement queue.
#[derive(Debug, Default)]
pub struct TagFile {
    next: u8,
    in_flight: [bool; TAG_COUNT],
    order: VecDeque<InsnTag>,
}

impl TagFile {
    /// Allocates the next tag in round-robin order, or `None` when all
    /// tags are in flight (dispatch must stall).
    pub fn allocate(&mut self) -> Option<InsnTag> {
        let candidate = self.next as usize;
        if self.in_flight[candidate] {
            return None;
        }
        let tag = InsnTag(self.next);
        self.in_flight[candidate] = true;
        self.order.push_back(tag);
        self.next = (self.next + 1) % TAG_COUNT as u8;
        Some(tag)
    }

    /// The oldest in-flight tag. Only the packet carrying this tag may
    /// commit.
    pub fn head(&self) -> Option<InsnTag> {
        self.order.front().copied()
    }

    /// Retires the head tag. The caller must pass the tag it committed.
    pub fn retire(&mut self, tag: InsnTag) {
        debug_assert_eq!(self.head(), Some(tag));
        self.order.pop_front();
        self.in_flight[tag.index()] = false;
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.order.len()
    }

    /// Drops every in-flight tag. Used when a flush discards all
    /// uncommitted work.
    pub fn flush(&mut self) {
        self.in_flight = [false; TAG_COUNT];
        self.order.clear();
        // Allocation restarts from tag 0 so post-flush traces are stable.
        self.next = 0;
    }
}
