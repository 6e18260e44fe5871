use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the selection moves after a paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvancePolicy {
    #[default]
    Stay,
    Up,
    Down,
}

impl AdvancePolicy {
    pub fn cycle(&self) -> Self {
        match self {
            Self::Stay => Self::Up,
            Self::Up => Self::Down,
            Self::Down => Self::Stay,
        }
    }
}

impl fmt::Display for AdvancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stay => write!(f, "stay"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Selection over the displayed list. `selected` is `None` exactly when the
/// displayed list is empty (or nothing has been displayed yet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCursor {
    selected: Option<usize>,
    pub locked: bool,
    pub policy: AdvancePolicy,
}

impl SelectionCursor {
    pub fn new(policy: AdvancePolicy) -> Self {
        Self {
            selected: None,
            locked: false,
            policy,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// The displayed list changed. Unlocked cursors jump back to the top;
    /// locked ones keep their index, clamped into the new bounds.
    pub fn refresh(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
        } else if self.locked {
            self.selected = Some(self.selected.map_or(0, |i| i.min(len - 1)));
        } else {
            self.selected = Some(0);
        }
    }

    /// Apply the advance policy after a successful paste. The lock wins over
    /// the policy.
    pub fn advance(&mut self, len: usize) {
        if self.locked || len == 0 {
            return;
        }
        if let Some(i) = self.selected {
            self.selected = Some(match self.policy {
                AdvancePolicy::Stay => i,
                AdvancePolicy::Up => i.saturating_sub(1),
                AdvancePolicy::Down => (i + 1).min(len - 1),
            });
        }
    }

    pub fn move_up(&mut self) {
        if let Some(i) = self.selected {
            self.selected = Some(i.saturating_sub(1));
        }
    }

    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            self.selected = None;
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + 1).min(len - 1)));
    }

    /// Select an explicit row, clamped into `len`.
    pub fn select(&mut self, index: usize, len: usize) {
        self.selected = if len == 0 {
            None
        } else {
            Some(index.min(len - 1))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_at(index: usize, policy: AdvancePolicy, locked: bool) -> SelectionCursor {
        let mut cursor = SelectionCursor::new(policy);
        cursor.locked = locked;
        cursor.select(index, usize::MAX);
        cursor
    }

    #[test]
    fn test_refresh_unlocked_resets_to_top() {
        let mut cursor = cursor_at(2, AdvancePolicy::Stay, false);
        cursor.refresh(5);
        assert_eq!(cursor.selected(), Some(0));
    }

    #[test]
    fn test_refresh_locked_clamps() {
        let mut cursor = cursor_at(4, AdvancePolicy::Stay, true);
        cursor.refresh(10);
        assert_eq!(cursor.selected(), Some(4));

        cursor.refresh(3);
        assert_eq!(cursor.selected(), Some(2));
    }

    #[test]
    fn test_refresh_empty_is_no_selection() {
        for locked in [false, true] {
            let mut cursor = cursor_at(3, AdvancePolicy::Down, locked);
            cursor.refresh(0);
            assert_eq!(cursor.selected(), None);

            cursor.refresh(2);
            assert_eq!(cursor.selected(), Some(0));
        }
    }

    #[test]
    fn test_refresh_clamp_holds_for_all_lengths() {
        for len in 0..6 {
            for prior in 0..8 {
                for locked in [false, true] {
                    let mut cursor = cursor_at(prior, AdvancePolicy::Stay, locked);
                    cursor.refresh(len);
                    match cursor.selected() {
                        None => assert_eq!(len, 0),
                        Some(i) => assert!(i < len),
                    }
                }
            }
        }
    }

    #[test]
    fn test_advance_policies() {
        let mut up = cursor_at(2, AdvancePolicy::Up, false);
        up.advance(5);
        assert_eq!(up.selected(), Some(1));

        let mut down = cursor_at(2, AdvancePolicy::Down, false);
        down.advance(5);
        assert_eq!(down.selected(), Some(3));

        let mut stay = cursor_at(2, AdvancePolicy::Stay, false);
        stay.advance(5);
        assert_eq!(stay.selected(), Some(2));
    }

    #[test]
    fn test_advance_clamps_at_edges() {
        let mut up = cursor_at(0, AdvancePolicy::Up, false);
        up.advance(3);
        assert_eq!(up.selected(), Some(0));

        let mut down = cursor_at(2, AdvancePolicy::Down, false);
        down.advance(3);
        assert_eq!(down.selected(), Some(2));
    }

    #[test]
    fn test_lock_overrides_policy() {
        for policy in [AdvancePolicy::Up, AdvancePolicy::Down, AdvancePolicy::Stay] {
            let mut cursor = cursor_at(1, policy, true);
            cursor.advance(3);
            assert_eq!(cursor.selected(), Some(1));
        }
    }

    #[test]
    fn test_manual_moves() {
        let mut cursor = SelectionCursor::default();
        cursor.move_down(2);
        assert_eq!(cursor.selected(), Some(0));
        cursor.move_down(2);
        cursor.move_down(2);
        assert_eq!(cursor.selected(), Some(1));
        cursor.move_up();
        cursor.move_up();
        assert_eq!(cursor.selected(), Some(0));
    }

    #[test]
    fn test_policy_cycle_and_serde() {
        assert_eq!(AdvancePolicy::Stay.cycle(), AdvancePolicy::Up);
        assert_eq!(AdvancePolicy::Down.cycle(), AdvancePolicy::Stay);
        assert_eq!(serde_json::to_string(&AdvancePolicy::Down).unwrap(), "\"down\"");
    }
}
