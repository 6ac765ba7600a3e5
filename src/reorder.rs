//! Drag-and-drop reordering of the draft's exercise list.
//!
//! Tracks the index being dragged and the index it hovers over. Neither is
//! persisted, and both are cleared after every drop, drag end, or leave.

use tracing::debug;

use crate::draft::CourseDraft;
use crate::error::IndexError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragReorderController {
    dragged_index: Option<usize>,
    drag_over_index: Option<usize>,
}

impl DragReorderController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dragged_index(&self) -> Option<usize> {
        self.dragged_index
    }

    pub fn drag_over_index(&self) -> Option<usize> {
        self.drag_over_index
    }

    pub fn drag_start(&mut self, index: usize) {
        self.dragged_index = Some(index);
        self.drag_over_index = None;
    }

    pub fn drag_over(&mut self, index: usize) {
        if self.dragged_index.is_some() {
            self.drag_over_index = Some(index);
        }
    }

    /// Apply the pending move to `draft`, if any.
    ///
    /// Returns whether the draft was reordered. The tracked indices are
    /// reset whether or not the move succeeds.
    pub fn drop_on(&mut self, draft: &mut CourseDraft) -> Result<bool, IndexError> {
        let pending = (self.dragged_index, self.drag_over_index);
        self.reset();
        match pending {
            (Some(from), Some(to)) if from != to => {
                draft.reorder(from, to)?;
                Ok(true)
            }
            _ => {
                debug!("drop without a pending move");
                Ok(false)
            }
        }
    }

    pub fn drag_end(&mut self) {
        self.reset();
    }

    pub fn drag_leave(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.dragged_index = None;
        self.drag_over_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::builder;
    use crate::catalog::find_type;

    fn draft_with(n: usize) -> CourseDraft {
        let t = find_type("rapid-fire").unwrap();
        let mut draft = CourseDraft::new();
        for _ in 0..n {
            draft.add_exercise(builder::commit(t, &builder::instantiate(t)).unwrap());
        }
        draft
    }

    #[test]
    fn drop_moves_dragged_exercise() {
        let mut draft = draft_with(3);
        let first = draft.exercises()[0].id;
        let mut drag = DragReorderController::new();

        drag.drag_start(0);
        drag.drag_over(2);
        assert!(drag.drop_on(&mut draft).unwrap());

        assert_eq!(draft.exercises()[2].id, first);
        assert_eq!(drag, DragReorderController::new());
    }

    #[test]
    fn drop_on_same_index_does_nothing() {
        let mut draft = draft_with(3);
        let before = draft.clone();
        let mut drag = DragReorderController::new();

        drag.drag_start(1);
        drag.drag_over(1);
        assert!(!drag.drop_on(&mut draft).unwrap());
        assert_eq!(draft, before);
    }

    #[test]
    fn drop_without_hover_does_nothing() {
        let mut draft = draft_with(2);
        let mut drag = DragReorderController::new();

        drag.drag_start(0);
        assert!(!drag.drop_on(&mut draft).unwrap());
        assert_eq!(drag.dragged_index(), None);
    }

    #[test]
    fn hover_without_drag_is_ignored() {
        let mut drag = DragReorderController::new();
        drag.drag_over(1);
        assert_eq!(drag.drag_over_index(), None);
    }

    #[test]
    fn failed_drop_still_resets() {
        let mut draft = draft_with(2);
        let mut drag = DragReorderController::new();

        drag.drag_start(0);
        drag.drag_over(5);
        assert_eq!(
            drag.drop_on(&mut draft).unwrap_err(),
            IndexError { index: 5, len: 2 }
        );
        assert_eq!(drag, DragReorderController::new());
    }

    #[test]
    fn drag_end_and_leave_reset_indices() {
        let mut drag = DragReorderController::new();

        drag.drag_start(0);
        drag.drag_over(1);
        drag.drag_end();
        assert_eq!(drag, DragReorderController::new());

        drag.drag_start(2);
        drag.drag_over(0);
        drag.drag_leave();
        assert_eq!(drag.dragged_index(), None);
        assert_eq!(drag.drag_over_index(), None);
    }
}
