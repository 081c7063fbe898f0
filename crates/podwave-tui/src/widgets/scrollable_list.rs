//! Row cursor for lists that are rebuilt on every render.
//!
//! The list never holds on to rows from a previous render: `set_items`
//! replaces the whole set and clamps the cursor, so the selected row always
//! resolves through the fresh set.

pub struct ScrollableList<T> {
    pub items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.items.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Rows visible in `height` lines, paired with their index.
    /// Call `ensure_visible` first.
    pub fn visible_items(&self, height: usize) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Select the row drawn `row` lines below the top of the list area.
    /// Returns true if that row exists.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target < self.items.len() {
            self.selected = target;
            return true;
        }
        false
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_clamps_when_rows_shrink() {
        let mut l = ScrollableList::new();
        l.set_items(vec![1, 2, 3, 4]);
        l.select_last();
        assert_eq!(l.selected_item(), Some(&4));
        l.set_items(vec![9, 8]);
        assert_eq!(l.selected_item(), Some(&8));
        l.set_items(Vec::new());
        assert_eq!(l.selected_item(), None);
        l.select_down(1);
        assert_eq!(l.selected, 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_window() {
        let mut l = ScrollableList::new();
        l.set_items((0..10).collect());
        l.select_down(6);
        l.ensure_visible(3);
        assert_eq!(l.scroll_offset, 4);
        let rows: Vec<usize> = l.visible_items(3).map(|(i, _)| i).collect();
        assert_eq!(rows, vec![4, 5, 6]);
        assert!(l.handle_click(0));
        assert_eq!(l.selected, 4);
        assert!(!l.handle_click(9));
    }
}
