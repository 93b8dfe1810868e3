// src/app/carousel.rs: wrap-around paging over a finite list, pure index math
//
// With wrapping on (N >= 2) the physical strip is N + 2 pages long:
//   physical 0       clone of logical N-1
//   physical 1..=N   logical physical-1
//   physical N+1     clone of logical 0
// Landing on a clone re-homes to the real page without animation.

/// What the view should do once scrolling comes to rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settle {
    /// Page to report in the page indicator.
    pub logical: usize,
    /// Physical position to jump to, unanimated, when the view rests on a clone.
    pub rehome: Option<usize>,
}

/// Stateless mapping for a carousel of `count` items.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CircularIndexer {
    count: usize,
}

impl CircularIndexer {
    pub const fn new(count: usize) -> Self {
        Self { count }
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    /// Zero items: nothing to show, nothing to page.
    pub const fn is_disabled(&self) -> bool {
        self.count == 0
    }

    /// Wrapping a single item onto itself would just oscillate, so it needs two.
    pub const fn wraps(&self) -> bool {
        self.count > 1
    }

    /// Number of physical pages the view should lay out.
    pub const fn physical_len(&self) -> usize {
        if self.wraps() {
            self.count + 2
        } else {
            self.count
        }
    }

    /// Where the view starts: the first real item.
    pub const fn initial_physical(&self) -> usize {
        if self.wraps() {
            1
        } else {
            0
        }
    }

    pub const fn is_clone(&self, physical: usize) -> bool {
        self.wraps() && (physical == 0 || physical == self.count + 1)
    }

    /// Logical item rendered at `physical`. `physical` must be below `physical_len()`.
    pub fn logical_for_physical(&self, physical: usize) -> usize {
        debug_assert!(physical < self.physical_len(), "physical index out of range");
        if !self.wraps() {
            return physical;
        }
        if physical == 0 {
            self.count - 1
        } else if physical == self.count + 1 {
            0
        } else {
            physical - 1
        }
    }

    /// Physical page that shows logical `page` without going through a clone.
    pub fn physical_for_logical(&self, page: usize) -> usize {
        debug_assert!(page < self.count.max(1), "logical index out of range");
        if self.wraps() {
            page + 1
        } else {
            page
        }
    }

    /// Resolve a resting position: report the page, re-home off a clone.
    pub fn settle(&self, physical: usize) -> Settle {
        let logical = self.logical_for_physical(physical);
        let rehome = if !self.wraps() {
            None
        } else if physical == 0 {
            Some(self.count)
        } else if physical == self.count + 1 {
            Some(1)
        } else {
            None
        };
        Settle { logical, rehome }
    }

    /// Animated target for the "next" arrow; `None` when paging is a no-op.
    pub const fn next_physical(&self, current: usize) -> Option<usize> {
        if self.wraps() && current <= self.count {
            Some(current + 1)
        } else {
            None
        }
    }

    /// Animated target for the "previous" arrow.
    pub const fn prev_physical(&self, current: usize) -> Option<usize> {
        if self.wraps() && current >= 1 {
            Some(current - 1)
        } else {
            None
        }
    }
}

/// Carousel model owned by the view: item count plus current page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CarouselState {
    item_count: usize,
    current_logical: usize,
    physical: usize,
}

impl CarouselState {
    pub fn new(item_count: usize) -> Self {
        let mut state = Self::default();
        state.configure(item_count);
        state
    }

    /// Load a new item list; resets to the first real page.
    pub fn configure(&mut self, item_count: usize) {
        let indexer = CircularIndexer::new(item_count);
        self.item_count = item_count;
        self.current_logical = 0;
        self.physical = indexer.initial_physical();
    }

    pub const fn indexer(&self) -> CircularIndexer {
        CircularIndexer::new(self.item_count)
    }

    pub const fn item_count(&self) -> usize {
        self.item_count
    }

    pub const fn current_logical(&self) -> usize {
        self.current_logical
    }

    pub const fn physical(&self) -> usize {
        self.physical
    }

    /// Live scroll update. Keeps the page indicator in step with the view;
    /// returns a re-home target when the view has run onto a clone.
    pub fn scrolled(&mut self, physical: usize) -> Option<usize> {
        if self.indexer().is_disabled() {
            return None;
        }
        let settle = self.indexer().settle(physical);
        self.current_logical = settle.logical;
        self.physical = settle.rehome.unwrap_or(physical);
        settle.rehome
    }

    /// Scrolling stopped at `physical`.
    pub fn settle(&mut self, physical: usize) -> Settle {
        if self.indexer().is_disabled() {
            return Settle {
                logical: 0,
                rehome: None,
            };
        }
        let settle = self.indexer().settle(physical);
        self.current_logical = settle.logical;
        self.physical = settle.rehome.unwrap_or(physical);
        settle
    }

    /// Explicit "go to page" command. Returns the physical target.
    pub fn jump_to_page(&mut self, page: usize) -> Option<usize> {
        if self.indexer().is_disabled() {
            return None;
        }
        let page = page.min(self.item_count - 1);
        let target = self.indexer().physical_for_logical(page);
        self.current_logical = page;
        self.physical = target;
        Some(target)
    }

    /// Arrow forward: the animated target; settle it when the animation ends.
    pub fn step_forward(&self) -> Option<usize> {
        self.indexer().next_physical(self.physical)
    }

    pub fn step_back(&self) -> Option<usize> {
        self.indexer().prev_physical(self.physical)
    }
}

#[cfg(test)]
mod tests {
    use super::{CarouselState, CircularIndexer, Settle};

    #[test]
    fn five_items_rehome_off_both_clones() {
        let ix = CircularIndexer::new(5);
        assert_eq!(ix.physical_len(), 7);
        assert_eq!(
            ix.settle(0),
            Settle {
                logical: 4,
                rehome: Some(5)
            }
        );
        assert_eq!(
            ix.settle(6),
            Settle {
                logical: 0,
                rehome: Some(1)
            }
        );
        for physical in 1..=5 {
            assert_eq!(
                ix.settle(physical),
                Settle {
                    logical: physical - 1,
                    rehome: None
                }
            );
        }
    }

    #[test]
    fn clones_render_the_boundary_items() {
        let ix = CircularIndexer::new(3);
        assert_eq!(ix.logical_for_physical(0), 2);
        assert_eq!(ix.logical_for_physical(4), 0);
        assert!(ix.is_clone(0) && ix.is_clone(4));
        assert!(!ix.is_clone(2));
    }

    #[test]
    fn single_item_never_wraps() {
        let ix = CircularIndexer::new(1);
        assert!(!ix.wraps());
        assert_eq!(ix.physical_len(), 1);
        assert_eq!(ix.initial_physical(), 0);
        assert!(!ix.is_clone(0));
        assert_eq!(
            ix.settle(0),
            Settle {
                logical: 0,
                rehome: None
            }
        );
        assert_eq!(ix.next_physical(0), None);
        assert_eq!(ix.prev_physical(0), None);
    }

    #[test]
    fn empty_carousel_is_disabled() {
        let mut state = CarouselState::new(0);
        assert!(state.indexer().is_disabled());
        assert_eq!(state.indexer().physical_len(), 0);
        assert_eq!(state.jump_to_page(3), None);
        assert_eq!(state.step_forward(), None);
        assert_eq!(state.settle(0).logical, 0);
    }

    #[test]
    fn arrows_walk_through_the_clone_and_come_back() {
        let mut state = CarouselState::new(3);
        assert_eq!(state.physical(), 1);

        // back from the first real item lands on the clone of the last
        let target = state.step_back().unwrap();
        assert_eq!(target, 0);
        let settle = state.settle(target);
        assert_eq!(settle.logical, 2);
        assert_eq!(settle.rehome, Some(3));
        assert_eq!(state.physical(), 3);

        // forward from the last real item lands on the clone of the first
        let target = state.step_forward().unwrap();
        assert_eq!(target, 4);
        let settle = state.settle(target);
        assert_eq!(settle.logical, 0);
        assert_eq!(settle.rehome, Some(1));
        assert_eq!(state.current_logical(), 0);
    }

    #[test]
    fn scrolling_tracks_page_indicator() {
        let mut state = CarouselState::new(4);
        assert_eq!(state.scrolled(3), None);
        assert_eq!(state.current_logical(), 2);
        assert_eq!(state.scrolled(5), Some(1));
        assert_eq!(state.current_logical(), 0);
        assert_eq!(state.physical(), 1);
    }

    #[test]
    fn jump_to_page_clamps_and_skips_clones() {
        let mut state = CarouselState::new(4);
        assert_eq!(state.jump_to_page(2), Some(3));
        assert_eq!(state.current_logical(), 2);
        assert_eq!(state.jump_to_page(99), Some(4));
        assert_eq!(state.current_logical(), 3);

        state.configure(1);
        assert_eq!(state.jump_to_page(0), Some(0));
        assert_eq!(state.current_logical(), 0);
    }
}
