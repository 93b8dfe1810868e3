// src/app/slot.rs: last-assignment-wins protection for reusable display slots
use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::error::{MediaError, MediaResult};

/// Generation stamp handed out by a [`StaleGuard`]. Only the most recently
/// minted token of a guard is current.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotToken(u64);

/// Generation counter owned by one slot (row, grid cell, carousel page).
///
/// Background work captures the token from `begin_assignment` when it is
/// launched and checks `is_current` right before touching the slot. There is
/// no cancellation; stale results are simply dropped.
#[derive(Debug, Default)]
pub struct StaleGuard {
    generation: AtomicU64,
}

impl StaleGuard {
    pub const fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
        }
    }

    /// Mint a fresh token, implicitly invalidating every earlier one.
    pub fn begin_assignment(&self) -> SlotToken {
        SlotToken(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: SlotToken) -> bool {
        self.generation.load(Ordering::Acquire) == token.0
    }

    pub fn check(&self, token: SlotToken) -> MediaResult<()> {
        if self.is_current(token) {
            Ok(())
        } else {
            Err(MediaError::Stale)
        }
    }
}

/// A display slot: its visible content plus the guard that protects it.
///
/// Lives on the UI thread; the only way background results get in is
/// [`Slot::publish`], which re-validates the captured token.
#[derive(Debug)]
pub struct Slot<T> {
    guard: StaleGuard,
    key: Option<String>,
    content: Option<T>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            guard: StaleGuard::new(),
            key: None,
            content: None,
        }
    }
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the slot at new content. Clears whatever was showing and returns
    /// the token the load for `key` has to present when it finishes.
    pub fn assign(&mut self, key: impl Into<String>) -> SlotToken {
        self.key = Some(key.into());
        self.content = None;
        self.guard.begin_assignment()
    }

    /// Empty the slot (e.g. on reuse) and invalidate anything in flight.
    pub fn reset(&mut self) -> SlotToken {
        self.key = None;
        self.content = None;
        self.guard.begin_assignment()
    }

    /// Apply a background result. Returns `Err(Stale)` and leaves the slot
    /// untouched when the slot has been reassigned since `token` was minted.
    pub fn publish(&mut self, token: SlotToken, value: T) -> MediaResult<()> {
        self.guard.check(token)?;
        self.content = Some(value);
        Ok(())
    }

    pub fn is_current(&self, token: SlotToken) -> bool {
        self.guard.is_current(token)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::{Slot, StaleGuard};
    use crate::app::error::MediaError;

    #[test]
    fn second_assignment_invalidates_first() {
        let guard = StaleGuard::new();
        let first = guard.begin_assignment();
        assert!(guard.is_current(first));
        let second = guard.begin_assignment();
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn tokens_from_different_guards_do_not_leak() {
        let a = StaleGuard::new();
        let b = StaleGuard::new();
        let ta = a.begin_assignment();
        let tb = b.begin_assignment();
        b.begin_assignment();
        assert!(a.is_current(ta));
        assert!(!b.is_current(tb));
    }

    #[test]
    fn late_result_for_old_content_is_dropped() {
        let mut slot: Slot<&str> = Slot::new();
        let old = slot.assign("movie:1");
        let new = slot.assign("movie:2");

        // newer load finishes first, older one lands afterwards
        assert!(slot.publish(new, "poster 2").is_ok());
        assert_eq!(slot.publish(old, "poster 1"), Err(MediaError::Stale));

        assert_eq!(slot.content(), Some(&"poster 2"));
        assert_eq!(slot.key(), Some("movie:2"));
    }

    #[test]
    fn reset_blocks_everything_in_flight() {
        let mut slot: Slot<u32> = Slot::new();
        let token = slot.assign("cell");
        slot.reset();
        assert!(slot.publish(token, 7).unwrap_err().is_stale());
        assert!(slot.content().is_none());
        assert!(slot.key().is_none());
    }

    #[test]
    fn reassignment_clears_visible_content() {
        let mut slot: Slot<u32> = Slot::new();
        let token = slot.assign("a");
        slot.publish(token, 1).unwrap();
        let next = slot.assign("b");
        assert!(slot.content().is_none());
        assert!(slot.is_current(next));
    }
}
