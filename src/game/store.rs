//! # Entity Store
//!
//! The id-keyed registry of every entity in the game, and the only place that
//! moves entities between the map, inventories and equipment.
//!
//! Ids are allocated from a monotonic counter and never reused. Iteration is
//! always in id order, which is also creation order.

use crate::config::INVENTORY_CAPACITY;
use crate::game::{Entity, EntityId, EntityKind, EquipSlot, Location, Position, SpawnOverrides};
use crate::{GloomError, GloomResult};
use std::collections::BTreeMap;

/// Registry of all entities, keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityStore {
    /// Creates an empty store. The first id handed out is 1.
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Rebuilds a store from saved entities and the saved id counter.
    ///
    /// Every carried or equipped entity must be recorded in its owner's slot
    /// and every filled slot must point back at an entity located there.
    pub fn from_parts(entities: Vec<Entity>, next_id: u64) -> GloomResult<Self> {
        let mut map = BTreeMap::new();
        for entity in entities {
            if entity.id.0 >= next_id {
                return Err(GloomError::Invariant(format!(
                    "Entity {} is not below the id counter {}",
                    entity.id, next_id
                )));
            }
            let id = entity.id;
            if map.insert(id, entity).is_some() {
                return Err(GloomError::Invariant(format!("Duplicate entity id {}", id)));
            }
        }

        let store = Self {
            entities: map,
            next_id,
        };
        store.check_slots()?;
        Ok(store)
    }

    fn check_slots(&self) -> GloomResult<()> {
        for entity in self.entities.values() {
            if matches!(
                entity.location,
                Location::Carried { .. } | Location::Equipped { .. }
            ) && self.slot(entity.location)? != Some(entity.id)
            {
                return Err(GloomError::Invariant(format!(
                    "{} claims {:?} but the slot disagrees",
                    entity.id, entity.location
                )));
            }

            let carried = entity.inventory.iter().flatten().enumerate();
            for (slot, content) in carried {
                if let Some(item) = content {
                    let expected = Location::Carried {
                        owner: entity.id,
                        slot,
                    };
                    if self.get(*item)?.location != expected {
                        return Err(GloomError::Invariant(format!(
                            "Inventory slot {} of {} holds {} which is elsewhere",
                            slot, entity.id, item
                        )));
                    }
                }
            }

            let worn = entity.equipment.iter().flatten().enumerate();
            for (slot, content) in worn {
                if let Some(item) = content {
                    let expected = Location::Equipped {
                        owner: entity.id,
                        slot,
                    };
                    if self.get(*item)?.location != expected {
                        return Err(GloomError::Invariant(format!(
                            "Equipment slot {} of {} holds {} which is elsewhere",
                            slot, entity.id, item
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// The id the next created entity will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Number of entities in the store.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Creates an entity of `kind` and places it at `location`.
    ///
    /// Stats come from the kind's traits unless overridden; current hp
    /// defaults to max hp. Kinds with an inventory or equipment get empty
    /// slot arrays.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::{EntityKind, EntityStore, Location, Position, SpawnOverrides};
    ///
    /// let mut store = EntityStore::new();
    /// let orc = store
    ///     .create(EntityKind::Orc, Location::Map(Position::new(2, 3)), SpawnOverrides::default())
    ///     .unwrap();
    /// assert_eq!(store.get(orc).unwrap().hp, Some(10));
    /// assert_eq!(store.blocking_at(Position::new(2, 3)).unwrap(), Some(orc));
    /// ```
    pub fn create(
        &mut self,
        kind: EntityKind,
        location: Location,
        overrides: SpawnOverrides,
    ) -> GloomResult<EntityId> {
        let traits = kind.traits();
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let base_max_hp = overrides.base_max_hp.or(traits.base_max_hp);
        let entity = Entity {
            id,
            kind,
            name: overrides.name.unwrap_or_else(|| traits.name.to_string()),
            location: Location::Nowhere,
            hp: overrides.hp.or(base_max_hp),
            base_max_hp,
            base_power: overrides.base_power.unwrap_or(traits.base_power),
            base_defense: overrides.base_defense.unwrap_or(traits.base_defense),
            xp: 0,
            level: 1,
            inventory: traits
                .has_inventory
                .then(|| vec![None; INVENTORY_CAPACITY]),
            equipment: traits
                .has_equipment
                .then(|| vec![None; EquipSlot::ALL.len()]),
            ai: traits.starting_ai,
            dead: false,
        };
        self.entities.insert(id, entity);

        if let Err(err) = self.move_to(id, location) {
            self.entities.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Looks up an entity. An unknown id is a broken invariant.
    pub fn get(&self, id: EntityId) -> GloomResult<&Entity> {
        self.entities
            .get(&id)
            .ok_or_else(|| GloomError::Invariant(format!("Unknown entity {}", id)))
    }

    /// Looks up an entity for mutation.
    pub fn get_mut(&mut self, id: EntityId) -> GloomResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or_else(|| GloomError::Invariant(format!("Unknown entity {}", id)))
    }

    /// Returns true if an entity with this id exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Iterates over all entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Snapshot of every id in id order.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    /// All entities standing on `pos`, in id order.
    pub fn all_at(&self, pos: Position) -> Vec<&Entity> {
        self.iter().filter(|e| e.position() == Some(pos)).collect()
    }

    /// The blocking entity on `pos`, if any.
    ///
    /// Two blockers sharing a tile is a broken invariant.
    pub fn blocking_at(&self, pos: Position) -> GloomResult<Option<EntityId>> {
        let mut blockers = self
            .iter()
            .filter(|e| e.blocks() && e.position() == Some(pos));
        let first = blockers.next().map(|e| e.id);
        if let Some(second) = blockers.next() {
            return Err(GloomError::Invariant(format!(
                "More than one blocking entity at {} (including {})",
                pos, second.id
            )));
        }
        Ok(first)
    }

    /// The first item lying on `pos`, if any.
    pub fn item_at(&self, pos: Position) -> Option<EntityId> {
        self.iter()
            .find(|e| e.is_item() && e.position() == Some(pos))
            .map(|e| e.id)
    }

    /// On-map entities in drawing order: ascending render layer, ties by id.
    pub fn render_order(&self) -> Vec<&Entity> {
        let mut visible: Vec<&Entity> = self.iter().filter(|e| e.position().is_some()).collect();
        visible.sort_by_key(|e| e.traits().layer);
        visible
    }

    /// Keeps only the entities matching the predicate.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Entity) -> bool,
    {
        self.entities.retain(|_, entity| keep(entity));
    }

    /// Filled inventory slots of `owner` as `(slot, item)` pairs.
    pub fn inventory_items(&self, owner: EntityId) -> GloomResult<Vec<(usize, EntityId)>> {
        let inventory = self.get(owner)?.inventory.as_ref().ok_or_else(|| {
            GloomError::Invariant(format!("{} has no inventory", owner))
        })?;
        Ok(inventory
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| item.map(|id| (slot, id)))
            .collect())
    }

    /// Lowest empty inventory slot of `owner`, or `None` when full.
    pub fn free_inventory_slot(&self, owner: EntityId) -> GloomResult<Option<usize>> {
        let inventory = self.get(owner)?.inventory.as_ref().ok_or_else(|| {
            GloomError::Invariant(format!("{} has no inventory", owner))
        })?;
        Ok(inventory.iter().position(Option::is_none))
    }

    /// Entities worn by `owner`. Owners without equipment wear nothing.
    pub fn equipped_items(&self, owner: EntityId) -> GloomResult<Vec<&Entity>> {
        let Some(equipment) = self.get(owner)?.equipment.as_ref() else {
            return Ok(Vec::new());
        };
        equipment.iter().flatten().map(|id| self.get(*id)).collect()
    }

    /// Contents of a carried or equipped slot.
    pub fn slot(&self, location: Location) -> GloomResult<Option<EntityId>> {
        let (owner, slot) = slot_address(location)?;
        let entity = self.get(owner)?;
        let array = slot_array(entity, location)?;
        array.get(slot).copied().ok_or_else(|| {
            GloomError::Invariant(format!("{:?} is out of range", location))
        })
    }

    fn slot_mut(&mut self, location: Location) -> GloomResult<&mut Option<EntityId>> {
        let (owner, slot) = slot_address(location)?;
        let entity = self.get_mut(owner)?;
        let array = match location {
            Location::Carried { .. } => entity.inventory.as_mut(),
            _ => entity.equipment.as_mut(),
        }
        .ok_or_else(|| GloomError::Invariant(format!("{} has no slots for {:?}", owner, location)))?;
        array
            .get_mut(slot)
            .ok_or_else(|| GloomError::Invariant(format!("{:?} is out of range", location)))
    }

    /// Moves an entity to a new location.
    ///
    /// A carried or equipped source slot must hold this entity and is cleared.
    /// A carried or equipped destination must be empty and accept the
    /// entity's kind; it is filled with the entity's id. Nothing changes when
    /// a check fails.
    pub fn move_to(&mut self, id: EntityId, location: Location) -> GloomResult<()> {
        let entity = self.get(id)?;
        let old = entity.location;
        if old == location {
            return Ok(());
        }

        match location {
            Location::Carried { owner, .. } => {
                if !entity.is_item() {
                    return Err(GloomError::Invariant(format!(
                        "{} ({:?}) cannot be carried",
                        id, entity.kind
                    )));
                }
                if owner == id {
                    return Err(GloomError::Invariant(format!("{} cannot carry itself", id)));
                }
            }
            Location::Equipped { owner, slot } => {
                let fits = entity
                    .traits()
                    .equip_slot
                    .map(|s| s.index() == slot)
                    .unwrap_or(false);
                if !fits {
                    return Err(GloomError::Invariant(format!(
                        "{} ({:?}) cannot be worn in equipment slot {}",
                        id, entity.kind, slot
                    )));
                }
                if owner == id {
                    return Err(GloomError::Invariant(format!("{} cannot wear itself", id)));
                }
            }
            Location::Map(_) | Location::Nowhere => {}
        }

        if is_slot(old) && self.slot(old)? != Some(id) {
            return Err(GloomError::Invariant(format!(
                "{} records {:?} but the slot disagrees",
                id, old
            )));
        }
        if is_slot(location) {
            if let Some(occupant) = self.slot(location)? {
                return Err(GloomError::Invariant(format!(
                    "{:?} is already occupied by {}",
                    location, occupant
                )));
            }
        }

        if is_slot(old) {
            *self.slot_mut(old)? = None;
        }
        if is_slot(location) {
            *self.slot_mut(location)? = Some(id);
        }
        self.get_mut(id)?.location = location;
        Ok(())
    }

    /// Puts a carried item on in the equipment slot its kind declares.
    ///
    /// An empty slot simply receives the item. An occupied slot exchanges
    /// places with it in one step: the worn item takes the incoming item's
    /// inventory slot. Returns the item that was taken off, if any.
    pub fn swap_equipment(&mut self, item: EntityId) -> GloomResult<Option<EntityId>> {
        let entity = self.get(item)?;
        let Location::Carried { owner, slot: carried_slot } = entity.location else {
            return Err(GloomError::Invariant(format!(
                "{} must be carried to be equipped",
                item
            )));
        };
        let equip_slot = entity.traits().equip_slot.ok_or_else(|| {
            GloomError::Invariant(format!("{} ({:?}) is not equipment", item, entity.kind))
        })?;

        let carried = Location::Carried {
            owner,
            slot: carried_slot,
        };
        let worn = Location::Equipped {
            owner,
            slot: equip_slot.index(),
        };

        if self.slot(carried)? != Some(item) {
            return Err(GloomError::Invariant(format!(
                "{} records {:?} but the slot disagrees",
                item, carried
            )));
        }

        let Some(previous) = self.slot(worn)? else {
            self.move_to(item, worn)?;
            return Ok(None);
        };
        if self.get(previous)?.location != worn {
            return Err(GloomError::Invariant(format!(
                "{:?} holds {} which is elsewhere",
                worn, previous
            )));
        }

        *self.slot_mut(carried)? = Some(previous);
        *self.slot_mut(worn)? = Some(item);
        self.get_mut(previous)?.location = carried;
        self.get_mut(item)?.location = worn;
        Ok(Some(previous))
    }
}

fn is_slot(location: Location) -> bool {
    matches!(
        location,
        Location::Carried { .. } | Location::Equipped { .. }
    )
}

fn slot_address(location: Location) -> GloomResult<(EntityId, usize)> {
    match location {
        Location::Carried { owner, slot } | Location::Equipped { owner, slot } => Ok((owner, slot)),
        other => Err(GloomError::Invariant(format!("{:?} is not a slot", other))),
    }
}

fn slot_array(entity: &Entity, location: Location) -> GloomResult<&Vec<Option<EntityId>>> {
    match location {
        Location::Carried { .. } => entity.inventory.as_ref(),
        _ => entity.equipment.as_ref(),
    }
    .ok_or_else(|| {
        GloomError::Invariant(format!("{} has no slots for {:?}", entity.id, location))
    })
}
