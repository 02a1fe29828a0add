use std::collections::BTreeSet;

use crate::tmux::{Entity, EntityId, Level};

/// Selection state for one level of the hierarchy.
///
/// Holds every entity of its level; which ones are shown depends on the
/// parent scope and the name filter. The parent scope is set from outside
/// (from the selection of the level above) so selectors never reference each
/// other.
#[derive(Debug, Clone)]
pub struct ListSelector {
    level: Level,
    items: Vec<Entity>,
    current: Option<EntityId>,
    marked: BTreeSet<EntityId>,
    /// `None` shows entities of every parent.
    parent: Option<EntityId>,
    filter: String,
}

impl ListSelector {
    pub fn new(level: Level) -> Self {
        Self {
            level,
            items: Vec::new(),
            current: None,
            marked: BTreeSet::new(),
            parent: None,
            filter: String::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn items(&self) -> &[Entity] {
        &self.items
    }

    /// Replace the entity list wholesale. The selection is left untouched
    /// until the next [`update`](Self::update).
    pub fn set_items(&mut self, items: Vec<Entity>) {
        self.items = items;
    }

    pub fn current(&self) -> Option<EntityId> {
        self.current
    }

    pub fn select(&mut self, id: Option<EntityId>) {
        self.current = id;
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        filter.clone_into(&mut self.filter);
    }

    pub fn item(&self, id: EntityId) -> Option<&Entity> {
        self.items.iter().find(|e| e.id == id)
    }

    pub fn selected(&self) -> Option<&Entity> {
        self.current.and_then(|id| self.item(id))
    }

    /// Entities within the parent scope whose name contains the filter text
    /// (case-insensitive), in the order of `items`.
    pub fn visible_items(&self) -> Vec<&Entity> {
        let filter = self.filter.to_lowercase();
        self.items
            .iter()
            .filter(|e| self.parent.is_none() || e.parent == self.parent)
            .filter(|e| filter.is_empty() || e.name.to_lowercase().contains(&filter))
            .collect()
    }

    /// Move to the next visible entity, stopping at the last one.
    pub fn select_next(&mut self) {
        let visible = self.visible_items();
        let next = match self.current {
            None => visible.first().map(|e| e.id),
            Some(id) => match visible.iter().position(|e| e.id == id) {
                Some(i) => visible.get(i + 1).map_or(Some(id), |e| Some(e.id)),
                None => Some(id),
            },
        };
        self.current = next;
    }

    /// Move to the previous visible entity, stopping at the first one.
    ///
    /// Unlike [`select_next`](Self::select_next), a selection that is no
    /// longer visible is cleared rather than kept.
    pub fn select_previous(&mut self) {
        let visible = self.visible_items();
        let prev = match self.current {
            None => visible.last().map(|e| e.id),
            Some(id) => match visible.iter().position(|e| e.id == id) {
                Some(0) => Some(id),
                Some(i) => Some(visible[i - 1].id),
                None => None,
            },
        };
        self.current = prev;
    }

    /// Keep the selection on a visible entity: fall back to the first visible
    /// one, or to no selection when nothing is visible.
    pub fn update(&mut self) {
        let visible = self.visible_items();
        if self
            .current
            .is_some_and(|id| visible.iter().any(|e| e.id == id))
        {
            return;
        }
        self.current = visible.first().map(|e| e.id);
    }

    pub fn mark_selection(&mut self) {
        if let Some(id) = self.current {
            self.marked.insert(id);
        }
    }

    pub fn unmark_selection(&mut self) {
        if let Some(id) = self.current {
            self.marked.remove(&id);
        }
    }

    pub fn is_marked(&self, id: EntityId) -> bool {
        self.marked.contains(&id)
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(items: &[(EntityId, &str, Option<EntityId>)]) -> ListSelector {
        let mut s = ListSelector::new(Level::Window);
        s.set_items(
            items
                .iter()
                .map(|&(id, name, parent)| Entity::new(id, name, parent))
                .collect(),
        );
        s
    }

    fn abc() -> ListSelector {
        selector(&[(5, "a", None), (6, "b", None), (7, "c", None)])
    }

    fn visible_ids(s: &ListSelector) -> Vec<EntityId> {
        s.visible_items().iter().map(|e| e.id).collect()
    }

    #[test]
    fn select_previous_from_nothing_picks_last() {
        let mut s = abc();
        s.select_previous();
        assert_eq!(s.current(), Some(7));
    }

    #[test]
    fn select_next_from_nothing_picks_first() {
        let mut s = abc();
        s.select_next();
        assert_eq!(s.current(), Some(5));
    }

    #[test]
    fn select_next_stops_at_last() {
        let mut s = abc();
        s.select(Some(6));
        s.select_next();
        assert_eq!(s.current(), Some(7));
        s.select_next();
        s.select_next();
        assert_eq!(s.current(), Some(7));
    }

    #[test]
    fn select_previous_stops_at_first() {
        let mut s = abc();
        s.select(Some(6));
        s.select_previous();
        assert_eq!(s.current(), Some(5));
        s.select_previous();
        assert_eq!(s.current(), Some(5));
    }

    #[test]
    fn stale_selection_next_keeps_previous_clears() {
        let mut s = abc();
        s.select(Some(42));
        s.select_next();
        assert_eq!(s.current(), Some(42));
        s.select_previous();
        assert_eq!(s.current(), None);
    }

    #[test]
    fn navigation_on_empty_list_selects_nothing() {
        let mut s = ListSelector::new(Level::Pane);
        s.select_next();
        assert_eq!(s.current(), None);
        s.select_previous();
        assert_eq!(s.current(), None);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut s = selector(&[(1, "Build-Server", None), (2, "client", None)]);
        s.set_filter("server");
        assert_eq!(visible_ids(&s), vec![1]);
        s.set_filter("SERV");
        assert_eq!(visible_ids(&s), vec![1]);
        s.set_filter("");
        assert_eq!(visible_ids(&s), vec![1, 2]);
    }

    #[test]
    fn parent_scope_restricts_visible_items() {
        let mut s = selector(&[
            (10, "shell", Some(1)),
            (11, "editor", Some(1)),
            (12, "logs", Some(2)),
        ]);
        s.set_parent(Some(1));
        assert_eq!(visible_ids(&s), vec![10, 11]);
        s.set_parent(Some(2));
        assert_eq!(visible_ids(&s), vec![12]);
        s.set_parent(None);
        assert_eq!(visible_ids(&s), vec![10, 11, 12]);
    }

    #[test]
    fn parent_scope_and_filter_combine() {
        let mut s = selector(&[
            (10, "shell", Some(1)),
            (11, "editor", Some(1)),
            (12, "shell", Some(2)),
        ]);
        s.set_parent(Some(2));
        s.set_filter("sh");
        assert_eq!(visible_ids(&s), vec![12]);
    }

    #[test]
    fn update_keeps_visible_selection() {
        let mut s = abc();
        s.select(Some(6));
        s.update();
        assert_eq!(s.current(), Some(6));
    }

    #[test]
    fn update_falls_back_to_first_visible() {
        let mut s = abc();
        s.select(Some(6));
        s.set_filter("c");
        s.update();
        assert_eq!(s.current(), Some(7));
    }

    #[test]
    fn update_clears_selection_when_nothing_visible() {
        let mut s = abc();
        s.select(Some(6));
        s.set_filter("zzz");
        s.update();
        assert_eq!(s.current(), None);
    }

    #[test]
    fn update_selects_first_when_nothing_selected() {
        let mut s = abc();
        s.update();
        assert_eq!(s.current(), Some(5));
    }

    #[test]
    fn update_always_leaves_a_visible_or_empty_selection() {
        let filters = ["", "a", "b", "x"];
        let parents = [None, Some(1), Some(2)];
        for filter in filters {
            for parent in parents {
                for start in [None, Some(10), Some(11), Some(12), Some(99)] {
                    let mut s = selector(&[
                        (10, "alpha", Some(1)),
                        (11, "beta", Some(1)),
                        (12, "box", Some(2)),
                    ]);
                    s.set_filter(filter);
                    s.set_parent(parent);
                    s.select(start);
                    s.update();
                    let visible = visible_ids(&s);
                    match s.current() {
                        None => assert!(visible.is_empty()),
                        Some(id) => assert!(visible.contains(&id)),
                    }
                }
            }
        }
    }

    #[test]
    fn marks() {
        let mut s = abc();
        s.select(Some(5));
        s.mark_selection();
        assert!(s.is_marked(5));
        assert!(!s.is_marked(6));
        s.unmark_selection();
        assert!(!s.is_marked(5));
        s.mark_selection();
        s.select(Some(6));
        s.mark_selection();
        s.clear_marks();
        assert!(!s.is_marked(5));
        assert!(!s.is_marked(6));
    }

    #[test]
    fn selected_looks_up_current_entity() {
        let mut s = abc();
        assert!(s.selected().is_none());
        s.select(Some(6));
        assert_eq!(s.selected().map(|e| e.name.as_str()), Some("b"));
    }
}
