use std::any::Any;
use std::collections::HashMap;

use super::EntityId;

/// Anything 'static can be attached to an entity.
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

/// Type-erased view over a storage, enough for entity teardown.
pub trait ErasedStorage {
    fn remove_entity(&mut self, entity_id: EntityId);
    fn has(&self, entity_id: EntityId) -> bool;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Storage of a single component type.
pub struct TypedStorage<T: Component> {
    data: HashMap<EntityId, T>,
}

impl<T: Component> TypedStorage<T> {
    pub fn new() -> Self {
        Self { data: HashMap::new() }
    }

    pub fn insert(&mut self, entity_id: EntityId, component: T) {
        self.data.insert(entity_id, component);
    }

    pub fn remove(&mut self, entity_id: EntityId) -> Option<T> {
        self.data.remove(&entity_id)
    }

    pub fn get(&self, entity_id: EntityId) -> Option<&T> {
        self.data.get(&entity_id)
    }

    pub fn get_mut(&mut self, entity_id: EntityId) -> Option<&mut T> {
        self.data.get_mut(&entity_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.data.iter().map(|(id, comp)| (*id, comp))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.data.iter_mut().map(|(id, comp)| (*id, comp))
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.data.keys().copied()
    }
}

impl<T: Component> Default for TypedStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedStorage for TypedStorage<T> {
    fn remove_entity(&mut self, entity_id: EntityId) {
        self.data.remove(&entity_id);
    }

    fn has(&self, entity_id: EntityId) -> bool {
        self.data.contains_key(&entity_id)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
#[derive(Debug, PartialEq)]
struct Position {
    x: f32,
    y: f32,
}

#[test]
fn test_storage_insert_get_remove() {
    let mut storage = TypedStorage::<Position>::new();

    storage.insert(1, Position { x: 1.0, y: 2.0 });
    storage.insert(2, Position { x: 3.0, y: 4.0 });

    assert_eq!(storage.len(), 2);
    assert!(storage.has(1));
    assert!(!storage.has(3));

    let pos = storage.get(1).unwrap();
    assert_eq!(pos.x, 1.0);

    storage.remove(1);
    assert!(!storage.has(1));
    assert_eq!(storage.len(), 1);
}

#[test]
fn test_storage_iteration() {
    let mut storage = TypedStorage::<Position>::new();

    storage.insert(1, Position { x: 1.0, y: 2.0 });
    storage.insert(2, Position { x: 3.0, y: 4.0 });

    assert_eq!(storage.iter().count(), 2);

    for (_id, pos) in storage.iter_mut() {
        pos.x += 1.0;
    }
    assert_eq!(storage.get(1).unwrap().x, 2.0);
    assert_eq!(storage.get(2).unwrap().x, 4.0);
}
