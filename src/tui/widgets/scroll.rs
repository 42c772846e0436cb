//! Scroll window arithmetic for list popups

/// Visible slice of a list and the cursor inside it
///
/// Holds `first <= cursor <= last <= len - 1` and `last - first < visible`
/// after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    len: usize,
    visible: usize,
    cursor: usize,
    first: usize,
}

impl ScrollWindow {
    /// Window over `len` items (at least one) showing `visible` rows, opened
    /// with the cursor at `cursor`
    pub fn new(len: usize, visible: usize, cursor: usize) -> Self {
        let len = len.max(1);
        let visible = visible.max(1);
        let cursor = cursor.min(len - 1);
        Self {
            len,
            visible,
            cursor,
            first: cursor.min(len.saturating_sub(visible)),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn first(&self) -> usize {
        self.first
    }

    /// Last visible index, inclusive
    pub fn last(&self) -> usize {
        (self.first + self.visible).min(self.len) - 1
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            if self.cursor < self.first {
                self.first = self.cursor;
            }
        }
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.len {
            self.cursor += 1;
            if self.cursor > self.last() {
                self.first += 1;
            }
        }
    }

    pub fn page_down(&mut self) {
        self.cursor = (self.cursor + self.visible).min(self.len - 1);
        self.first = (self.first + self.visible).min(self.len.saturating_sub(self.visible));
        self.follow_cursor();
    }

    pub fn page_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(self.visible);
        self.first = self.first.saturating_sub(self.visible);
        self.follow_cursor();
    }

    fn follow_cursor(&mut self) {
        if self.cursor < self.first {
            self.first = self.cursor;
        } else if self.cursor > self.last() {
            self.first = self.cursor + 1 - self.visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Move {
        Up,
        Down,
        PageUp,
        PageDown,
    }

    fn moves() -> impl Strategy<Value = Move> {
        prop_oneof![
            Just(Move::Up),
            Just(Move::Down),
            Just(Move::PageUp),
            Just(Move::PageDown),
        ]
    }

    fn check(w: &ScrollWindow, len: usize, visible: usize) {
        assert!(w.first() <= w.cursor());
        assert!(w.cursor() <= w.last());
        assert!(w.last() <= len - 1);
        assert!(w.last() - w.first() < visible);
    }

    #[test]
    fn test_open_near_end() {
        let w = ScrollWindow::new(10, 4, 9);
        assert_eq!((w.first(), w.cursor(), w.last()), (6, 9, 9));
    }

    #[test]
    fn test_short_list() {
        let mut w = ScrollWindow::new(3, 7, 0);
        w.page_down();
        assert_eq!((w.first(), w.cursor(), w.last()), (0, 2, 2));
        w.page_up();
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn test_scrolls_one_line_at_edges() {
        let mut w = ScrollWindow::new(20, 5, 0);
        for _ in 0..5 {
            w.down();
        }
        assert_eq!((w.first(), w.cursor(), w.last()), (1, 5, 5));
        w.up();
        assert_eq!(w.first(), 1);
        for _ in 0..5 {
            w.up();
        }
        assert_eq!((w.first(), w.cursor()), (0, 0));
        w.up();
        assert_eq!(w.cursor(), 0);
    }

    #[test]
    fn test_paging() {
        let mut w = ScrollWindow::new(20, 5, 0);
        w.page_down();
        assert_eq!((w.first(), w.cursor()), (5, 5));
        w.page_down();
        w.page_down();
        w.page_down();
        assert_eq!((w.first(), w.cursor(), w.last()), (15, 19, 19));
        w.page_up();
        assert_eq!((w.first(), w.cursor()), (10, 14));
    }

    proptest! {
        #[test]
        fn window_invariant_holds(
            len in 1usize..60,
            visible in 1usize..12,
            start in 0usize..60,
            steps in prop::collection::vec(moves(), 0..80),
        ) {
            let mut w = ScrollWindow::new(len, visible, start);
            check(&w, len, visible);
            for step in steps {
                match step {
                    Move::Up => w.up(),
                    Move::Down => w.down(),
                    Move::PageUp => w.page_up(),
                    Move::PageDown => w.page_down(),
                }
                check(&w, len, visible);
            }
        }
    }
}
