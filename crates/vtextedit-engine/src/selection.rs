//! Selection model decoupled from the native edit cursor.
//!
//! The editor-visible selection is resolved by precedence: a valid
//! overridden selection wins over the primary one. Input modes use the
//! override to present a selection the raw cursor cannot express.

use std::ops::Range;

use crate::editing::TextCursor;

/// A normalized `[start, end)` byte range. Valid only when non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Build from two endpoints in any order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<TextCursor> for Selection {
    fn from(cursor: TextCursor) -> Self {
        Self::new(cursor.anchor, cursor.position)
    }
}

/// Selection state of one editor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    /// Follows the native cursor
    pub(crate) selection: Selection,
    pub(crate) overridden_selection: Selection,
    /// Block-mode selections, sorted by start; never holds the primary
    pub(crate) additional_selections: Vec<Selection>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active selection: the override when valid, else the primary
    pub fn selection(&self) -> Selection {
        if self.overridden_selection.is_valid() {
            self.overridden_selection
        } else {
            self.selection
        }
    }

    pub fn primary(&self) -> Selection {
        self.selection
    }

    pub fn overridden(&self) -> Option<Selection> {
        self.overridden_selection
            .is_valid()
            .then_some(self.overridden_selection)
    }

    pub fn has_selection(&self) -> bool {
        self.selection().is_valid()
    }

    pub fn additional_selections(&self) -> &[Selection] {
        &self.additional_selections
    }

    pub(crate) fn set_primary(&mut self, selection: Selection) {
        self.selection = selection;
        self.additional_selections.retain(|s| *s != selection);
    }

    pub(crate) fn set_overridden(&mut self, start: usize, end: usize) {
        self.overridden_selection = Selection::new(start, end);
    }

    pub(crate) fn clear_overridden(&mut self) {
        self.overridden_selection.clear();
    }

    /// Replace the secondary selections wholesale
    pub(crate) fn set_additional(&mut self, selections: Vec<Selection>) {
        let mut selections: Vec<_> = selections
            .into_iter()
            .filter(|s| s.is_valid() && *s != self.selection)
            .collect();
        selections.sort_by_key(|s| s.start);
        self.additional_selections = selections;
    }

    pub(crate) fn clear_additional(&mut self) {
        self.additional_selections.clear();
    }

    /// The overridden selection followed by the additional ones, for
    /// carrying through document edits
    pub(crate) fn tracked_ranges(&self) -> Vec<Range<usize>> {
        std::iter::once(self.overridden_selection)
            .chain(self.additional_selections.iter().copied())
            .map(|s| s.range())
            .collect()
    }

    /// Take back ranges produced by [`Selections::tracked_ranges`] after an
    /// edit. Selections the edit collapsed are dropped.
    pub(crate) fn follow_tracked_ranges(&mut self, ranges: &[Range<usize>]) {
        let Some((overridden, additional)) = ranges.split_first() else {
            return;
        };
        if self.overridden_selection.is_valid() {
            self.overridden_selection = Selection::from(overridden.clone());
        }
        self.set_additional(additional.iter().cloned().map(Selection::from).collect());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(5, 2, 2, 5, true)]
    #[case(2, 5, 2, 5, true)]
    #[case(3, 3, 3, 3, false)]
    #[case(0, 1, 0, 1, true)]
    fn test_selection_normalizes_endpoints(
        #[case] a: usize,
        #[case] b: usize,
        #[case] start: usize,
        #[case] end: usize,
        #[case] valid: bool,
    ) {
        let selection = Selection::new(a, b);

        assert_eq!((selection.start, selection.end), (start, end));
        assert_eq!(selection.is_valid(), valid);
    }

    #[test]
    fn test_cleared_selection_is_invalid() {
        let mut selection = Selection::new(4, 9);
        selection.clear();

        assert_eq!(selection, Selection { start: 0, end: 0 });
        assert!(!selection.is_valid());
    }

    #[test]
    fn test_override_takes_precedence_until_cleared() {
        let mut selections = Selections::new();
        selections.set_primary(Selection::new(0, 5));
        selections.set_overridden(4, 2);

        assert_eq!(selections.selection(), Selection::new(2, 4));

        selections.clear_overridden();
        assert_eq!(selections.selection(), Selection::new(0, 5));
    }

    #[test]
    fn test_invalid_override_falls_back_to_primary() {
        let mut selections = Selections::new();
        selections.set_primary(Selection::new(1, 3));
        selections.set_overridden(7, 7);

        assert_eq!(selections.selection(), Selection::new(1, 3));
        assert_eq!(selections.overridden(), None);
    }

    #[test]
    fn test_additional_selections_sorted_and_filtered() {
        let mut selections = Selections::new();
        selections.set_primary(Selection::new(0, 2));

        selections.set_additional(vec![
            Selection::new(20, 25),
            Selection::new(6, 6),
            Selection::new(0, 2),
            Selection::new(10, 12),
        ]);

        assert_eq!(
            selections.additional_selections(),
            &[Selection::new(10, 12), Selection::new(20, 25)]
        );
    }

    #[test]
    fn test_primary_never_duplicated_in_additional() {
        let mut selections = Selections::new();
        selections.set_additional(vec![Selection::new(0, 3), Selection::new(5, 8)]);

        selections.set_primary(Selection::new(5, 8));

        assert_eq!(selections.additional_selections(), &[Selection::new(0, 3)]);
    }

    #[test]
    fn test_follow_tracked_ranges_drops_collapsed_selections() {
        let mut selections = Selections::new();
        selections.set_overridden(2, 6);
        selections.set_additional(vec![Selection::new(10, 12), Selection::new(20, 24)]);
        assert_eq!(selections.tracked_ranges(), vec![2..6, 10..12, 20..24]);

        selections.follow_tracked_ranges(&[3..7, 11..11, 21..25]);

        assert_eq!(selections.selection(), Selection::new(3, 7));
        assert_eq!(selections.selection().len(), 4);
        assert_eq!(selections.additional_selections(), &[Selection::new(21, 25)]);
    }

    #[test]
    fn test_follow_tracked_ranges_keeps_cleared_override_cleared() {
        let mut selections = Selections::new();
        selections.set_primary(Selection::new(1, 2));

        selections.follow_tracked_ranges(&[4..4]);

        assert_eq!(selections.overridden(), None);
        assert!(selections.overridden_selection.is_empty());
    }

    #[test]
    fn test_selection_from_backwards_cursor() {
        let selection = Selection::from(TextCursor::with_selection(9, 4));

        assert_eq!(selection.range(), 4..9);
    }
}
