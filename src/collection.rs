use crate::artwork::ArtworkRecord;
use crate::{wrap_index, Step};

/// Full collection plus the displayed subset and its focus pointer.
#[derive(Debug, Default, Clone)]
pub struct CollectionStore {
    full: Vec<ArtworkRecord>,
    displayed: Vec<ArtworkRecord>,
    focus_index: Option<usize>,
    loaded: bool,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-time initialization. Later calls are ignored so the full set stays read-only.
    pub fn set_full(&mut self, records: Vec<ArtworkRecord>) -> bool {
        if self.loaded {
            log::warn!("[collection] set_full called twice; keeping the original {} records", self.full.len());
            return false;
        }
        self.displayed = records.clone();
        self.full = records;
        self.focus_index = if self.displayed.is_empty() { None } else { Some(0) };
        self.loaded = true;
        true
    }

    pub fn replace_displayed(&mut self, displayed: Vec<ArtworkRecord>) {
        self.focus_index = if displayed.is_empty() { None } else { Some(0) };
        self.displayed = displayed;
    }

    /// Cyclic step through the displayed subset. Returns the new focus, or `None` when empty.
    pub fn advance_focus(&mut self, step: Step) -> Option<usize> {
        let current = self.focus_index?;
        let next = wrap_index(current, self.displayed.len(), step);
        self.focus_index = Some(next);
        Some(next)
    }

    pub fn current_item(&self) -> Option<&ArtworkRecord> {
        self.displayed.get(self.focus_index?)
    }

    pub fn full(&self) -> &[ArtworkRecord] {
        &self.full
    }

    pub fn displayed(&self) -> &[ArtworkRecord] {
        &self.displayed
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus_index
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<ArtworkRecord> {
        (0..n).map(|i| ArtworkRecord::new(i, format!("Title {i}"), "Artist", None, format!("{i}.png"))).collect()
    }

    #[test]
    fn stepping_len_times_returns_to_start() {
        let mut store = CollectionStore::new();
        store.set_full(records(4));
        store.advance_focus(Step::Forward);
        let start = store.focus_index();
        for _ in 0..4 {
            store.advance_focus(Step::Forward);
        }
        assert_eq!(store.focus_index(), start);
        for _ in 0..4 {
            store.advance_focus(Step::Backward);
        }
        assert_eq!(store.focus_index(), start);
    }

    #[test]
    fn focus_wraps_at_both_ends() {
        let mut store = CollectionStore::new();
        store.set_full(records(3));
        assert_eq!(store.advance_focus(Step::Backward), Some(2));
        assert_eq!(store.advance_focus(Step::Forward), Some(0));
    }

    #[test]
    fn replacing_displayed_resets_focus_even_if_item_survives() {
        let mut store = CollectionStore::new();
        store.set_full(records(3));
        store.advance_focus(Step::Forward);
        store.advance_focus(Step::Forward);
        let kept = store.displayed().to_vec();
        store.replace_displayed(kept);
        assert_eq!(store.focus_index(), Some(0));
        assert_eq!(store.current_item().map(|r| r.id.0), Some(0));
    }

    #[test]
    fn empty_displayed_has_no_focus_and_ignores_steps() {
        let mut store = CollectionStore::new();
        store.set_full(records(2));
        store.replace_displayed(Vec::new());
        assert_eq!(store.focus_index(), None);
        assert_eq!(store.advance_focus(Step::Forward), None);
        assert!(store.current_item().is_none());
        assert_eq!(store.full().len(), 2);
    }

    #[test]
    fn full_set_is_write_once() {
        let mut store = CollectionStore::new();
        assert!(store.set_full(records(2)));
        assert!(!store.set_full(records(5)));
        assert_eq!(store.full().len(), 2);
    }
}
