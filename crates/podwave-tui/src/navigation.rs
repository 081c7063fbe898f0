//! Screen navigation helpers: tab hit-testing and mouse swipes.
//!
//! A swipe is a horizontal left-button drag on the screen body. The column
//! where the button went down is remembered; on release the signed distance
//! decides the direction once it reaches the configured threshold.

use ratatui::layout::Rect;

use crate::action::Screen;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger/pointer moved left: go to the next screen.
    Left,
    /// Moved right: go to the previous screen.
    Right,
}

impl SwipeDirection {
    /// Screen reached from `current`, or `None` at either end.
    pub fn target(self, current: Screen) -> Option<Screen> {
        match self {
            SwipeDirection::Left => current.next(),
            SwipeDirection::Right => current.prev(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: u16,
    start_col: Option<u16>,
}

impl SwipeTracker {
    pub fn new(threshold: u16) -> Self {
        Self {
            threshold: threshold.max(1),
            start_col: None,
        }
    }

    pub fn begin(&mut self, col: u16) {
        self.start_col = Some(col);
    }

    /// Finish the gesture. Moves shorter than the threshold are not swipes.
    pub fn end(&mut self, col: u16) -> Option<SwipeDirection> {
        let start = self.start_col.take()?;
        let dx = i32::from(col) - i32::from(start);
        if dx.unsigned_abs() < u32::from(self.threshold) {
            return None;
        }
        Some(if dx < 0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }

    pub fn cancel(&mut self) {
        self.start_col = None;
    }
}

pub fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_drag_is_not_a_swipe() {
        let mut s = SwipeTracker::new(8);
        s.begin(40);
        assert_eq!(s.end(33), None);
        s.begin(40);
        assert_eq!(s.end(47), None);
    }

    #[test]
    fn test_swipe_directions() {
        let mut s = SwipeTracker::new(8);
        s.begin(40);
        assert_eq!(s.end(32), Some(SwipeDirection::Left));
        s.begin(10);
        assert_eq!(s.end(30), Some(SwipeDirection::Right));
    }

    #[test]
    fn test_release_without_press_is_ignored() {
        let mut s = SwipeTracker::new(8);
        assert_eq!(s.end(60), None);
        s.begin(0);
        s.cancel();
        assert_eq!(s.end(60), None);
    }

    #[test]
    fn test_swipe_targets_stop_at_ends() {
        assert_eq!(SwipeDirection::Left.target(Screen::Home), Some(Screen::Explore));
        assert_eq!(SwipeDirection::Left.target(Screen::Library), None);
        assert_eq!(SwipeDirection::Right.target(Screen::Home), None);
        assert_eq!(SwipeDirection::Right.target(Screen::Library), Some(Screen::Explore));
    }

    #[test]
    fn test_hit() {
        let r = Rect::new(2, 1, 4, 1);
        assert!(hit(r, 2, 1));
        assert!(hit(r, 5, 1));
        assert!(!hit(r, 6, 1));
        assert!(!hit(r, 3, 2));
        assert!(!hit(Rect::default(), 0, 0));
    }
}
