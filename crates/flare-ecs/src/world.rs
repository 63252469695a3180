//! FlareWorld: hecs storage addressed by stable ids and unique names

use crate::component::ComponentTable;
use bimap::BiMap;
use flare_core::{EntityId, FlareError, Result, Transform, Vec3};

/// Deepest parent chain walked when resolving world positions
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Points a child at the entity it is attached to
#[derive(Debug, Clone, Copy)]
struct Parent(EntityId);

/// Every entity carries a [`Transform`] and a [`ComponentTable`] as hecs
/// components. A [`Parent`] is added when the entity is attached to another.
#[derive(Default)]
pub struct FlareWorld {
    ecs: hecs::World,
    handles: BiMap<EntityId, hecs::Entity>,
    names: BiMap<String, EntityId>,
}

impl FlareWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity at the origin. Names are unique.
    pub fn spawn(&mut self, name: impl Into<String>) -> Result<EntityId> {
        let name = name.into();
        if self.names.contains_left(&name) {
            return Err(FlareError::DuplicateEntityName(name));
        }

        let id = EntityId::next();
        let handle = self
            .ecs
            .spawn((Transform::default(), ComponentTable::default()));
        self.handles.insert(id, handle);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Remove an entity. Its children are detached and keep their local transform.
    pub fn despawn(&mut self, id: EntityId) -> Result<()> {
        let handle = self.handle(id)?;
        let _ = self.ecs.despawn(handle);
        self.handles.remove_by_left(&id);
        self.names.remove_by_right(&id);

        let orphans: Vec<hecs::Entity> = self
            .ecs
            .query::<&Parent>()
            .iter()
            .filter(|(_, parent)| parent.0 == id)
            .map(|(entity, _)| entity)
            .collect();
        for entity in orphans {
            let _ = self.ecs.remove_one::<Parent>(entity);
        }
        Ok(())
    }

    pub fn get_id(&self, name: &str) -> Option<EntityId> {
        self.names.get_by_left(name).copied()
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.names.get_by_right(&id).map(String::as_str)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.handles.contains_left(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Local transform, relative to the parent if there is one
    pub fn transform(&self, id: EntityId) -> Option<Transform> {
        let handle = self.handles.get_by_left(&id)?;
        self.ecs.get::<&Transform>(*handle).ok().map(|t| *t)
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> Result<()> {
        let handle = self.handle(id)?;
        let mut transform = self
            .ecs
            .get::<&mut Transform>(handle)
            .map_err(|_| FlareError::EntityNotFound(id.to_string()))?;
        transform.position = position;
        Ok(())
    }

    /// Attach `child` to `parent`. Attaching an entity below itself is rejected.
    pub fn set_parent(&mut self, child: EntityId, parent: EntityId) -> Result<()> {
        let child_handle = self.handle(child)?;
        self.handle(parent)?;

        let mut cursor = Some(parent);
        while let Some(ancestor) = cursor {
            if ancestor == child {
                return Err(FlareError::RuntimeError(format!(
                    "attaching {child} to {parent} would create a cycle"
                )));
            }
            cursor = self.parent(ancestor);
        }

        self.ecs
            .insert_one(child_handle, Parent(parent))
            .map_err(|_| FlareError::EntityNotFound(child.to_string()))
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        let handle = self.handles.get_by_left(&id)?;
        self.ecs.get::<&Parent>(*handle).ok().map(|p| p.0)
    }

    /// Position after applying every ancestor's transform
    pub fn get_world_position(&self, id: EntityId) -> Option<Vec3> {
        let mut position = self.transform(id)?.position;
        let mut cursor = self.parent(id);
        let mut depth = 0;

        while let Some(ancestor) = cursor {
            depth += 1;
            if depth > MAX_HIERARCHY_DEPTH {
                tracing::warn!(entity = %id, "parent chain too deep; truncating");
                break;
            }
            position = self.transform(ancestor)?.transform_point(position);
            cursor = self.parent(ancestor);
        }
        Some(position)
    }

    /// Store `value` under `component` on the entity, replacing any previous value
    pub fn set_component(&mut self, id: EntityId, component: &str, value: toml::Value) -> Result<()> {
        let handle = self.handle(id)?;
        let mut table = self
            .ecs
            .get::<&mut ComponentTable>(handle)
            .map_err(|_| FlareError::EntityNotFound(id.to_string()))?;
        table.insert(component, value);
        Ok(())
    }

    pub fn get_component(&self, id: EntityId, component: &str) -> Option<toml::Value> {
        let handle = self.handles.get_by_left(&id)?;
        let table = self.ecs.get::<&ComponentTable>(*handle).ok()?;
        table.get(component).cloned()
    }

    pub fn component_names(&self, id: EntityId) -> Vec<String> {
        self.handles
            .get_by_left(&id)
            .and_then(|handle| self.ecs.get::<&ComponentTable>(*handle).ok())
            .map(|table| table.names().map(String::from).collect())
            .unwrap_or_default()
    }

    fn handle(&self, id: EntityId) -> Result<hecs::Entity> {
        self.handles
            .get_by_left(&id)
            .copied()
            .ok_or_else(|| FlareError::EntityNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_registers_name_and_origin() {
        let mut world = FlareWorld::new();
        assert!(world.is_empty());

        let id = world.spawn("martian").unwrap();
        assert!(world.contains(id));
        assert_eq!(world.get_id("martian"), Some(id));
        assert_eq!(world.name(id), Some("martian"));
        assert_eq!(world.len(), 1);
        assert_eq!(world.transform(id), Some(Transform::default()));
    }

    #[test]
    fn names_must_be_unique() {
        let mut world = FlareWorld::new();
        world.spawn("martian").unwrap();
        assert!(matches!(
            world.spawn("martian"),
            Err(FlareError::DuplicateEntityName(_))
        ));
    }

    #[test]
    fn despawn_frees_name_and_detaches_children() {
        let mut world = FlareWorld::new();
        let ship = world.spawn("ship").unwrap();
        let pilot = world.spawn("pilot").unwrap();
        world.set_position(ship, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        world.set_position(pilot, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        world.set_parent(pilot, ship).unwrap();

        world.despawn(ship).unwrap();
        assert!(!world.contains(ship));
        assert!(world.get_id("ship").is_none());
        assert!(world.despawn(ship).is_err());

        assert_eq!(world.parent(pilot), None);
        assert_eq!(world.get_world_position(pilot), Some(Vec3::new(0.0, 1.0, 0.0)));
        assert!(world.spawn("ship").is_ok());
    }

    #[test]
    fn world_position_follows_parent_chain() {
        let mut world = FlareWorld::new();
        let ship = world.spawn("ship").unwrap();
        let pilot = world.spawn("pilot").unwrap();
        let visor = world.spawn("visor").unwrap();

        world.set_position(ship, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        world.set_position(pilot, Vec3::new(0.0, 1.0, 0.0)).unwrap();
        world.set_position(visor, Vec3::new(0.0, 0.0, 0.5)).unwrap();
        world.set_parent(pilot, ship).unwrap();
        world.set_parent(visor, pilot).unwrap();

        let pos = world.get_world_position(visor).unwrap();
        assert!((pos.x - 10.0).abs() < 1e-5);
        assert!((pos.y - 1.0).abs() < 1e-5);
        assert!((pos.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn cycles_are_rejected() {
        let mut world = FlareWorld::new();
        let a = world.spawn("a").unwrap();
        let b = world.spawn("b").unwrap();
        world.set_parent(b, a).unwrap();

        assert!(world.set_parent(a, b).is_err());
        assert!(world.set_parent(a, a).is_err());
        assert_eq!(world.parent(a), None);
    }

    #[test]
    fn components_round_trip() {
        let mut world = FlareWorld::new();
        let id = world.spawn("martian").unwrap();

        let pose = toml::toml! {
            visible = false
            flapping = false
        };
        world.set_component(id, "wings", toml::Value::Table(pose)).unwrap();

        let stored = world.get_component(id, "wings").unwrap();
        assert_eq!(stored.get("visible").and_then(|v| v.as_bool()), Some(false));
        assert_eq!(world.component_names(id), vec!["wings".to_string()]);
        assert!(world.get_component(id, "aura").is_none());

        let ghost = EntityId::next();
        assert!(world
            .set_component(ghost, "wings", toml::Value::Boolean(true))
            .is_err());
    }
}
