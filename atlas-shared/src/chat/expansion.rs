//! Per-message expand/collapse state, kept apart from the messages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message ids whose replies are currently shown.
///
/// Membership is not checked against the store: toggling an unknown id is
/// allowed and simply has no visible effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpansionSet {
    expanded: HashSet<Uuid>,
}

impl ExpansionSet {
    /// Nothing expanded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `id` and returns whether it is now expanded.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if self.expanded.remove(&id) {
            false
        } else {
            self.expanded.insert(id);
            true
        }
    }

    /// Whether the replies of `id` are shown.
    #[must_use]
    pub fn is_expanded(&self, id: Uuid) -> bool {
        self.expanded.contains(&id)
    }

    /// Shows the replies of `id`.
    pub fn expand(&mut self, id: Uuid) {
        self.expanded.insert(id);
    }

    /// Hides the replies of `id`.
    pub fn collapse(&mut self, id: Uuid) {
        self.expanded.remove(&id);
    }

    /// Collapses everything.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    /// Number of expanded ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    /// True when nothing is expanded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

impl Extend<Uuid> for ExpansionSet {
    fn extend<T: IntoIterator<Item = Uuid>>(&mut self, iter: T) {
        self.expanded.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_restores_membership() {
        let mut set = ExpansionSet::new();
        let id = Uuid::new_v4();

        assert!(set.toggle(id));
        assert!(set.is_expanded(id));
        assert!(!set.toggle(id));
        assert!(!set.is_expanded(id));
        assert!(set.is_empty());

        set.expand(id);
        set.toggle(id);
        set.toggle(id);
        assert!(set.is_expanded(id));
    }

    #[test]
    fn unknown_ids_are_accepted() {
        let mut set = ExpansionSet::new();
        let ghost = Uuid::new_v4();
        set.toggle(ghost);
        assert_eq!(set.len(), 1);
        set.collapse(ghost);
        assert!(set.is_empty());
    }

    #[test]
    fn extend_and_clear() {
        let mut set = ExpansionSet::new();
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        set.extend(ids);
        assert!(ids.iter().all(|id| set.is_expanded(*id)));
        set.clear();
        assert!(set.is_empty());
    }
}
