use std::any::TypeId;
use std::collections::HashMap;

use super::component::ErasedStorage;
use super::entity::EntityAllocator;
use super::{Component, Entity, TypedStorage};

/// Central store of entities and their components.
pub struct Registry {
    entities: EntityAllocator,
    storages: HashMap<TypeId, Box<dyn ErasedStorage>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: EntityAllocator::new(),
            storages: HashMap::new(),
        }
    }

    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        log::trace!("Created entity {}", entity.id);
        entity
    }

    /// Removes the entity from every storage before releasing its ID.
    pub fn destroy_entity(&mut self, entity: Entity) {
        if !self.entities.is_alive(entity) {
            return;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity.id);
        }
        self.entities.deallocate(entity);
        log::trace!("Destroyed entity {}", entity.id);
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.count()
    }

    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) {
        if !self.entities.is_alive(entity) {
            log::warn!("Ignored component insert on dead entity {}", entity.id);
            return;
        }

        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(TypedStorage::<T>::new()));

        if let Some(storage) = storage.as_any_mut().downcast_mut::<TypedStorage<T>>() {
            storage.insert(entity.id, component);
        }
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity.id)
    }

    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storage::<T>()?.get(entity.id)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity.id)
    }

    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.storage::<T>()
            .map(|storage| storage.get(entity.id).is_some())
            .unwrap_or(false)
    }

    pub fn storage<T: Component>(&self) -> Option<&TypedStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<TypedStorage<T>>()
    }

    pub fn storage_mut<T: Component>(&mut self) -> Option<&mut TypedStorage<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<TypedStorage<T>>()
    }

    /// Snapshot of entities carrying component `T`. Systems use this to walk
    /// one storage while mutating another.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        match self.storage::<T>() {
            Some(storage) => storage.entity_ids().map(Entity::new).collect(),
            None => Vec::new(),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[test]
    fn test_entity_lifecycle() {
        let mut registry = Registry::new();

        let e1 = registry.create_entity();
        let e2 = registry.create_entity();
        assert!(registry.is_alive(e1));
        assert!(registry.is_alive(e2));
        assert_eq!(registry.entity_count(), 2);

        registry.destroy_entity(e1);
        assert!(!registry.is_alive(e1));
        assert_eq!(registry.entity_count(), 1);
    }

    #[test]
    fn test_component_access() {
        let mut registry = Registry::new();

        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 1.0, y: 2.0 });
        registry.add_component(entity, Velocity { dx: 0.5, dy: 0.5 });

        assert!(registry.has_component::<Position>(entity));
        assert!(registry.has_component::<Velocity>(entity));

        assert_eq!(registry.get_component::<Position>(entity).unwrap().x, 1.0);

        if let Some(vel) = registry.get_component_mut::<Velocity>(entity) {
            vel.dx = 1.0;
        }
        assert_eq!(registry.get_component::<Velocity>(entity).unwrap().dx, 1.0);
    }

    #[test]
    fn test_destroy_removes_components() {
        let mut registry = Registry::new();

        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 1.0, y: 2.0 });

        registry.destroy_entity(entity);
        assert!(registry.get_component::<Position>(entity).is_none());

        // The reused ID must not see the old component
        let reused = registry.create_entity();
        assert_eq!(reused.id, entity.id);
        assert!(!registry.has_component::<Position>(reused));
    }

    #[test]
    fn test_entities_with() {
        let mut registry = Registry::new();

        let e1 = registry.create_entity();
        let e2 = registry.create_entity();
        let _e3 = registry.create_entity();
        registry.add_component(e1, Position { x: 0.0, y: 0.0 });
        registry.add_component(e2, Position { x: 0.0, y: 0.0 });

        let mut with_position = registry.entities_with::<Position>();
        with_position.sort_by_key(|e| e.id);
        assert_eq!(with_position.len(), 2);
        assert_eq!(with_position[0], e1);
        assert_eq!(with_position[1], e2);
    }
}
