//! # Entities
//!
//! The entity model: one [`Entity`] struct for every identity-bearing object
//! (player, monsters, items, corpses, stairs), a kind tag selecting a static
//! [`KindTraits`] record, and the [`Location`] enum tying an entity to the map
//! or to another entity's inventory/equipment slot.
//!
//! Static traits are always resolved from the entity's *current* kind. Death
//! rewrites the kind to [`EntityKind::Corpse`] in place, and blocking, glyph,
//! render order and the rest follow automatically.

use crate::game::{EntityId, Position};
use serde::{Deserialize, Serialize};

/// Equipment slot classes. The discriminant is the slot's index in an
/// entity's equipment array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
}

impl EquipSlot {
    /// Every slot class, in equipment-array order.
    pub const ALL: [EquipSlot; 2] = [EquipSlot::Weapon, EquipSlot::Armor];

    /// Index of this slot in an equipment array.
    pub fn index(self) -> usize {
        match self {
            EquipSlot::Weapon => 0,
            EquipSlot::Armor => 1,
        }
    }

    /// Human readable slot name.
    pub fn label(self) -> &'static str {
        match self {
            EquipSlot::Weapon => "weapon",
            EquipSlot::Armor => "armor",
        }
    }
}

/// Drawing layer. Entities on higher layers are drawn over lower ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderLayer {
    Stairs,
    Corpse,
    Item,
    Actor,
}

/// Static properties shared by every entity of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct KindTraits {
    /// Default display name
    pub name: &'static str,
    /// Map glyph
    pub glyph: char,
    /// Glyph colour (CSS-style name)
    pub color: &'static str,
    /// Whether the entity prevents other blockers from sharing its tile
    pub blocks: bool,
    /// Whether the entity can be carried
    pub is_item: bool,
    /// Slot this kind is worn in, if it is equipment
    pub equip_slot: Option<EquipSlot>,
    /// Drawing layer
    pub layer: RenderLayer,
    /// Drawn on explored tiles even when not currently lit
    pub always_visible: bool,
    /// Starting maximum hit points; `None` means the entity cannot be damaged
    pub base_max_hp: Option<i32>,
    /// Starting power
    pub base_power: i32,
    /// Starting defense
    pub base_defense: i32,
    /// Experience granted to whoever kills this kind
    pub xp_award: Option<u32>,
    /// Power bonus while equipped
    pub bonus_power: i32,
    /// Defense bonus while equipped
    pub bonus_defense: i32,
    /// Maximum hit point bonus while equipped
    pub bonus_max_hp: i32,
    /// Behaviour given to freshly created entities of this kind
    pub starting_ai: Option<Ai>,
    /// Whether the kind owns an inventory array
    pub has_inventory: bool,
    /// Whether the kind owns an equipment array
    pub has_equipment: bool,
    /// Whether the kind accumulates experience and levels
    pub gains_xp: bool,
}

const BASE: KindTraits = KindTraits {
    name: "thing",
    glyph: '?',
    color: "white",
    blocks: false,
    is_item: false,
    equip_slot: None,
    layer: RenderLayer::Item,
    always_visible: false,
    base_max_hp: None,
    base_power: 0,
    base_defense: 0,
    xp_award: None,
    bonus_power: 0,
    bonus_defense: 0,
    bonus_max_hp: 0,
    starting_ai: None,
    has_inventory: false,
    has_equipment: false,
    gains_xp: false,
};

static PLAYER: KindTraits = KindTraits {
    name: "player",
    glyph: '@',
    color: "white",
    blocks: true,
    layer: RenderLayer::Actor,
    base_max_hp: Some(30),
    base_power: 5,
    base_defense: 2,
    has_inventory: true,
    has_equipment: true,
    gains_xp: true,
    ..BASE
};

static ORC: KindTraits = KindTraits {
    name: "orc",
    glyph: 'o',
    color: "hsl(100,30%,40%)",
    blocks: true,
    layer: RenderLayer::Actor,
    base_max_hp: Some(10),
    base_power: 3,
    base_defense: 0,
    xp_award: Some(35),
    starting_ai: Some(Ai::MoveToPlayer),
    ..BASE
};

static TROLL: KindTraits = KindTraits {
    name: "troll",
    glyph: 'T',
    color: "hsl(100,30%,40%)",
    blocks: true,
    layer: RenderLayer::Actor,
    base_max_hp: Some(16),
    base_power: 4,
    base_defense: 1,
    xp_award: Some(100),
    starting_ai: Some(Ai::MoveToPlayer),
    ..BASE
};

static CORPSE: KindTraits = KindTraits {
    name: "corpse",
    glyph: '%',
    color: "darkred",
    layer: RenderLayer::Corpse,
    ..BASE
};

static STAIRS: KindTraits = KindTraits {
    name: "stairs",
    glyph: '>',
    color: "hsl(200,100%,50%)",
    layer: RenderLayer::Stairs,
    always_visible: true,
    ..BASE
};

static HEALING_POTION: KindTraits = KindTraits {
    name: "healing potion",
    glyph: '!',
    color: "violet",
    is_item: true,
    ..BASE
};

static LIGHTNING_SCROLL: KindTraits = KindTraits {
    name: "scroll of lightning bolt",
    glyph: '#',
    color: "hsl(60,50%,75%)",
    is_item: true,
    ..BASE
};

static FIREBALL_SCROLL: KindTraits = KindTraits {
    name: "scroll of fireball",
    glyph: '#',
    color: "hsl(0,50%,60%)",
    is_item: true,
    ..BASE
};

static CONFUSION_SCROLL: KindTraits = KindTraits {
    name: "scroll of confusion",
    glyph: '#',
    color: "hsl(0,100%,75%)",
    is_item: true,
    ..BASE
};

static DAGGER: KindTraits = KindTraits {
    name: "dagger",
    glyph: '/',
    color: "hsl(200,30%,60%)",
    is_item: true,
    equip_slot: Some(EquipSlot::Weapon),
    bonus_power: 2,
    ..BASE
};

static SWORD: KindTraits = KindTraits {
    name: "sword",
    glyph: '/',
    color: "hsl(200,50%,70%)",
    is_item: true,
    equip_slot: Some(EquipSlot::Weapon),
    bonus_power: 3,
    ..BASE
};

static LEATHER_ARMOR: KindTraits = KindTraits {
    name: "leather armor",
    glyph: '[',
    color: "hsl(30,40%,50%)",
    is_item: true,
    equip_slot: Some(EquipSlot::Armor),
    bonus_defense: 1,
    ..BASE
};

static CHAIN_MAIL: KindTraits = KindTraits {
    name: "chain mail",
    glyph: '[',
    color: "hsl(200,10%,70%)",
    is_item: true,
    equip_slot: Some(EquipSlot::Armor),
    bonus_defense: 3,
    ..BASE
};

/// Every kind of entity the game knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Orc,
    Troll,
    Corpse,
    Stairs,
    HealingPotion,
    LightningScroll,
    FireballScroll,
    ConfusionScroll,
    Dagger,
    Sword,
    LeatherArmor,
    ChainMail,
}

impl EntityKind {
    /// Looks up the static traits of this kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use gloom::EntityKind;
    ///
    /// assert!(EntityKind::Orc.traits().blocks);
    /// assert!(!EntityKind::Corpse.traits().blocks);
    /// assert_eq!(EntityKind::Sword.traits().bonus_power, 3);
    /// ```
    pub fn traits(self) -> &'static KindTraits {
        match self {
            EntityKind::Player => &PLAYER,
            EntityKind::Orc => &ORC,
            EntityKind::Troll => &TROLL,
            EntityKind::Corpse => &CORPSE,
            EntityKind::Stairs => &STAIRS,
            EntityKind::HealingPotion => &HEALING_POTION,
            EntityKind::LightningScroll => &LIGHTNING_SCROLL,
            EntityKind::FireballScroll => &FIREBALL_SCROLL,
            EntityKind::ConfusionScroll => &CONFUSION_SCROLL,
            EntityKind::Dagger => &DAGGER,
            EntityKind::Sword => &SWORD,
            EntityKind::LeatherArmor => &LEATHER_ARMOR,
            EntityKind::ChainMail => &CHAIN_MAIL,
        }
    }
}

/// Where an entity currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    /// Standing or lying on the map
    Map(Position),
    /// In slot `slot` of `owner`'s inventory
    Carried { owner: EntityId, slot: usize },
    /// Worn in slot `slot` of `owner`'s equipment
    Equipped { owner: EntityId, slot: usize },
    /// Off the map entirely (used up items)
    Nowhere,
}

impl Location {
    /// Returns the map coordinate if the location is on the map.
    pub fn position(self) -> Option<Position> {
        match self {
            Location::Map(pos) => Some(pos),
            _ => None,
        }
    }

    /// Returns the owning entity for carried or equipped locations.
    pub fn owner(self) -> Option<EntityId> {
        match self {
            Location::Carried { owner, .. } | Location::Equipped { owner, .. } => Some(owner),
            _ => None,
        }
    }
}

/// Monster behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    /// Chase and attack the player while standing in the player's light
    MoveToPlayer,
    /// Stumble around randomly until the counter runs out
    Confused { turns_remaining: u32 },
}

/// Optional overrides applied on top of a kind's defaults at creation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnOverrides {
    pub name: Option<String>,
    pub hp: Option<i32>,
    pub base_max_hp: Option<i32>,
    pub base_power: Option<i32>,
    pub base_defense: Option<i32>,
}

/// A game entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique, never reused identifier
    pub id: EntityId,
    /// Current kind; selects the static traits
    pub kind: EntityKind,
    /// Display name
    pub name: String,
    /// Current location
    pub location: Location,
    /// Current hit points (`None`: cannot be damaged)
    pub hp: Option<i32>,
    /// Maximum hit points before equipment bonuses
    pub base_max_hp: Option<i32>,
    /// Power before equipment bonuses
    pub base_power: i32,
    /// Defense before equipment bonuses
    pub base_defense: i32,
    /// Accumulated experience
    pub xp: u32,
    /// Character level
    pub level: u32,
    /// Inventory slot array, for kinds that carry things
    pub inventory: Option<Vec<Option<EntityId>>>,
    /// Equipment slot array, indexed by [`EquipSlot::index`]
    pub equipment: Option<Vec<Option<EntityId>>>,
    /// Behaviour, for monsters
    pub ai: Option<Ai>,
    /// Set once on death, never cleared
    pub dead: bool,
}

impl Entity {
    /// Static traits of the entity's current kind.
    pub fn traits(&self) -> &'static KindTraits {
        self.kind.traits()
    }

    /// Whether the entity blocks movement.
    pub fn blocks(&self) -> bool {
        self.traits().blocks
    }

    /// Whether the entity can be carried.
    pub fn is_item(&self) -> bool {
        self.traits().is_item
    }

    /// Map position, if on the map.
    pub fn position(&self) -> Option<Position> {
        self.location.position()
    }

    /// True for living entities that can take damage.
    pub fn is_damageable(&self) -> bool {
        self.hp.is_some() && !self.dead
    }
}
