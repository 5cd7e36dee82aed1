//! Keyboard and pointer selection over the rendered suggestion list.

/// Which suggestion, if any, is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Idle,
    Active(usize),
}

/// Directional input from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Next,
    Prev,
}

/// Selection state machine over a list of `len` suggestions.
///
/// Movement clamps at the ends instead of wrapping; no input is ever an error.
/// Moving up from the first entry clears the selection.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    selection: Selection,
    len: usize,
}

impl NavigationController {
    pub fn new(len: usize) -> Self {
        Self {
            selection: Selection::Idle,
            len,
        }
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub const fn active(&self) -> Option<usize> {
        match self.selection {
            Selection::Idle => None,
            Selection::Active(i) => Some(i),
        }
    }

    /// A new list was rendered (or the list was cleared).
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selection = Selection::Idle;
    }

    pub fn press(&mut self, key: NavKey) -> Selection {
        self.selection = match (key, self.selection) {
            (NavKey::Next, Selection::Idle) if self.len > 0 => Selection::Active(0),
            (NavKey::Next, Selection::Active(i)) if i + 1 < self.len => Selection::Active(i + 1),
            (NavKey::Prev, Selection::Active(i)) if i > 0 => Selection::Active(i - 1),
            (NavKey::Prev, Selection::Active(_)) => Selection::Idle,
            (_, unchanged) => unchanged,
        };
        self.selection
    }

    /// Pointer entered entry `i`; it becomes the only active entry.
    pub fn hover(&mut self, i: usize) {
        if i < self.len {
            self.selection = Selection::Active(i);
        }
    }

    /// Pointer left entry `i`.
    pub fn unhover(&mut self, i: usize) {
        if self.selection == Selection::Active(i) {
            self.selection = Selection::Idle;
        }
    }

    /// Index to navigate to on confirm, if one is active.
    pub const fn activate(&self) -> Option<usize> {
        self.active()
    }
}
