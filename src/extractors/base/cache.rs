// Identity cache: at most one handle per syntax node for the whole unit.
//
// Arena + index: the slot is allocated (and the node mapped to it) before the
// populator runs, so a path that cycles back to an ancestor sees a valid but
// not yet populated handle.

use std::collections::HashMap;

use super::types::{Category, Handle, NodeKey, UnitId};

/// Population state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Reserved,
    Populating,
    Populated,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub tag: &'static str,
    pub category: Category,
    pub state: SlotState,
}

#[derive(Debug)]
pub struct IdentityCache {
    unit: UnitId,
    slots: Vec<Slot>,
    by_node: HashMap<NodeKey, Handle>,
}

impl IdentityCache {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            slots: Vec::new(),
            by_node: HashMap::new(),
        }
    }

    /// Returns `(handle, is_new)`. When `is_new` is false the caller must not
    /// populate the entity again.
    pub fn lookup_or_reserve(
        &mut self,
        key: NodeKey,
        tag: &'static str,
        category: Category,
    ) -> (Handle, bool) {
        if let Some(&handle) = self.by_node.get(&key) {
            return (handle, false);
        }
        let handle = self.allocate(tag, category);
        self.by_node.insert(key, handle);
        (handle, true)
    }

    /// Lookup without reserving.
    pub fn get(&self, key: NodeKey) -> Option<Handle> {
        self.by_node.get(&key).copied()
    }

    /// Allocate a slot that no syntax node maps to (the unit's file entity).
    pub fn allocate_detached(&mut self, tag: &'static str, category: Category) -> Handle {
        self.allocate(tag, category)
    }

    fn allocate(&mut self, tag: &'static str, category: Category) -> Handle {
        let slot = self.slots.len() as u32;
        self.slots.push(Slot {
            tag,
            category,
            state: SlotState::Reserved,
        });
        Handle::new(self.unit, slot)
    }

    pub fn slot(&self, handle: Handle) -> Option<&Slot> {
        if handle.unit() != self.unit {
            return None;
        }
        handle.slot().and_then(|i| self.slots.get(i as usize))
    }

    pub fn state(&self, handle: Handle) -> Option<SlotState> {
        self.slot(handle).map(|s| s.state)
    }

    /// Move a slot from `Reserved` to `Populating`.
    ///
    /// Returns false when the slot was already past reservation, which means
    /// someone is about to populate it a second time.
    pub fn begin(&mut self, handle: Handle) -> bool {
        match self.slot_mut(handle) {
            Some(slot) if slot.state == SlotState::Reserved => {
                slot.state = SlotState::Populating;
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self, handle: Handle, state: SlotState) {
        if let Some(slot) = self.slot_mut(handle) {
            slot.state = state;
        }
    }

    fn slot_mut(&mut self, handle: Handle) -> Option<&mut Slot> {
        if handle.unit() != self.unit {
            return None;
        }
        handle.slot().and_then(|i| self.slots.get_mut(i as usize))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn count(&self, state: SlotState) -> usize {
        self.slots.iter().filter(|s| s.state == state).count()
    }

    /// Handles whose slot is in `state`, in allocation order.
    pub fn handles_in(&self, state: SlotState) -> impl Iterator<Item = Handle> + '_ {
        let unit = self.unit;
        self.slots
            .iter()
            .enumerate()
            .filter(move |(_, slot)| slot.state == state)
            .map(move |(i, _)| Handle::new(unit, i as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(code: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .unwrap();
        parser.parse(code, None).unwrap()
    }

    #[test]
    fn test_second_lookup_returns_same_handle_and_is_not_new() {
        let tree = parse("class A {}");
        let root = tree.root_node();
        let mut cache = IdentityCache::new(UnitId(0));

        let (first, is_new) =
            cache.lookup_or_reserve(NodeKey::of(&root), "COMPILATION_UNIT", Category::Declaration);
        assert!(is_new);
        let (second, is_new) =
            cache.lookup_or_reserve(NodeKey::of(&root), "COMPILATION_UNIT", Category::Declaration);
        assert!(!is_new);
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_nodes_get_distinct_handles() {
        let tree = parse("class A {} class B {}");
        let root = tree.root_node();
        let a = root.named_child(0).unwrap();
        let b = root.named_child(1).unwrap();
        let mut cache = IdentityCache::new(UnitId(0));

        let (ha, _) = cache.lookup_or_reserve(NodeKey::of(&a), "CLASS", Category::Declaration);
        let (hb, _) = cache.lookup_or_reserve(NodeKey::of(&b), "CLASS", Category::Declaration);
        assert_ne!(ha, hb);
        assert_eq!(cache.get(NodeKey::of(&a)), Some(ha));
    }

    #[test]
    fn test_begin_refuses_second_population() {
        let mut cache = IdentityCache::new(UnitId(2));
        let h = cache.allocate_detached("FILE", Category::File);

        assert_eq!(cache.state(h), Some(SlotState::Reserved));
        assert!(cache.begin(h));
        assert!(!cache.begin(h));
        cache.finish(h, SlotState::Populated);
        assert!(!cache.begin(h));
        assert_eq!(cache.count(SlotState::Populated), 1);
    }

    #[test]
    fn test_foreign_handles_are_not_found() {
        let mut cache = IdentityCache::new(UnitId(0));
        let _ = cache.allocate_detached("FILE", Category::File);
        let foreign = Handle::new(UnitId(9), 0);
        assert!(cache.slot(foreign).is_none());
        assert!(cache.slot(Handle::UNRESOLVED).is_none());
    }
}
