//! The canonical item, boss, and reward-table catalog.
//!
//! Every surface that needs an item's stats reads them from here: the
//! reward resolver when minting drops, the combat resolver when weighing
//! weapons, the modifier pass when translating held items into typed
//! capabilities. Earlier iterations of this system kept per-call-site
//! copies of these tables and they drifted; this module is the only copy.

use super::types::{CombatUpgrade, ItemCategory, Rarity, ToolTier};

/// Catalog definition an [`super::types::ItemInstance`] is minted from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDef {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ItemCategory,
    pub rarity: Rarity,
    pub power: u32,
    /// `None` = unlimited uses.
    pub uses: Option<u16>,
}

/// The full item catalog. Order is stable; reward tables refer to ids.
pub const ITEMS: &[ItemDef] = &[
    // Weapons
    ItemDef {
        id: "guitarra_rota",
        name: "Guitarra Rota",
        category: ItemCategory::Weapon,
        rarity: Rarity::Common,
        power: 20,
        uses: None,
    },
    ItemDef {
        id: "tridente_oxidado",
        name: "Tridente Oxidado",
        category: ItemCategory::Weapon,
        rarity: Rarity::Rare,
        power: 35,
        uses: None,
    },
    ItemDef {
        id: "hacha_runica",
        name: "Hacha Rúnica",
        category: ItemCategory::Weapon,
        rarity: Rarity::Epic,
        power: 55,
        uses: None,
    },
    ItemDef {
        id: "espada_solar",
        name: "Espada Solar",
        category: ItemCategory::Weapon,
        rarity: Rarity::Legendary,
        power: 80,
        uses: None,
    },
    // Tools
    ItemDef {
        id: "pico_mejorado",
        name: "Pico Mejorado",
        category: ItemCategory::Tool,
        rarity: Rarity::Rare,
        power: 0,
        uses: None,
    },
    ItemDef {
        id: "pico_epico",
        name: "Pico Épico",
        category: ItemCategory::Tool,
        rarity: Rarity::Epic,
        power: 0,
        uses: None,
    },
    // Consumables
    ItemDef {
        id: "amuleto_suerte",
        name: "Amuleto de la Suerte",
        category: ItemCategory::Consumable,
        rarity: Rarity::Epic,
        power: 0,
        uses: Some(3),
    },
    ItemDef {
        id: "zapatos_baile",
        name: "Zapatos de Baile",
        category: ItemCategory::Consumable,
        rarity: Rarity::Rare,
        power: 0,
        uses: Some(5),
    },
    ItemDef {
        id: "llave_dorada",
        name: "Llave Dorada",
        category: ItemCategory::Consumable,
        rarity: Rarity::Rare,
        power: 0,
        uses: Some(1),
    },
    ItemDef {
        id: "saco_botin",
        name: "Saco de Botín",
        category: ItemCategory::Consumable,
        rarity: Rarity::Rare,
        power: 0,
        uses: Some(10),
    },
    // Upgrades
    ItemDef {
        id: "escudo_reforzado",
        name: "Escudo Reforzado",
        category: ItemCategory::Upgrade,
        rarity: Rarity::Epic,
        power: 0,
        uses: None,
    },
    ItemDef {
        id: "capa_espinosa",
        name: "Capa Espinosa",
        category: ItemCategory::Upgrade,
        rarity: Rarity::Epic,
        power: 0,
        uses: None,
    },
    ItemDef {
        id: "anillo_regenerador",
        name: "Anillo Regenerador",
        category: ItemCategory::Upgrade,
        rarity: Rarity::Legendary,
        power: 0,
        uses: None,
    },
    ItemDef {
        id: "armadura_placas",
        name: "Armadura de Placas",
        category: ItemCategory::Upgrade,
        rarity: Rarity::Rare,
        power: 0,
        uses: None,
    },
    // Containers
    ItemDef {
        id: "cofre_madera",
        name: "Cofre de Madera",
        category: ItemCategory::Container,
        rarity: Rarity::Common,
        power: 0,
        uses: Some(1),
    },
    ItemDef {
        id: "cofre_plata",
        name: "Cofre de Plata",
        category: ItemCategory::Container,
        rarity: Rarity::Rare,
        power: 0,
        uses: Some(1),
    },
    ItemDef {
        id: "cofre_oro",
        name: "Cofre de Oro",
        category: ItemCategory::Container,
        rarity: Rarity::Epic,
        power: 0,
        uses: Some(1),
    },
    // Collectibles
    ItemDef {
        id: "moneda_antigua",
        name: "Moneda Antigua",
        category: ItemCategory::Collectible,
        rarity: Rarity::Common,
        power: 5,
        uses: None,
    },
    ItemDef {
        id: "perla_negra",
        name: "Perla Negra",
        category: ItemCategory::Collectible,
        rarity: Rarity::Rare,
        power: 15,
        uses: None,
    },
    ItemDef {
        id: "gema_abisal",
        name: "Gema Abisal",
        category: ItemCategory::Collectible,
        rarity: Rarity::Legendary,
        power: 60,
        uses: None,
    },
    ItemDef {
        id: "fragmento_omega",
        name: "Fragmento Omega",
        category: ItemCategory::Collectible,
        rarity: Rarity::Master,
        power: 45,
        uses: None,
    },
];

/// Look up a catalog definition by id.
pub fn item_def(id: &str) -> Option<&'static ItemDef> {
    ITEMS.iter().find(|def| def.id == id)
}

/// Map a held catalog item to the combat upgrade it grants, if any.
pub fn upgrade_for(item_id: &str) -> Option<CombatUpgrade> {
    match item_id {
        "escudo_reforzado" => Some(CombatUpgrade::Shield),
        "capa_espinosa" => Some(CombatUpgrade::Reflect),
        "anillo_regenerador" => Some(CombatUpgrade::Regen),
        "armadura_placas" => Some(CombatUpgrade::Armor),
        _ => None,
    }
}

/// Map a held catalog item to the tool tier it grants, if any.
pub fn tool_tier_for(item_id: &str) -> Option<ToolTier> {
    match item_id {
        "pico_mejorado" => Some(ToolTier::Improved),
        "pico_epico" => Some(ToolTier::Epic),
        _ => None,
    }
}

// ============================================================================
// Reward tables
// ============================================================================

/// One entry in an activity's reward table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RewardOutcome {
    /// Mint an instance of this catalog item.
    Item(&'static str),
    /// Currency only, uniform in `[min, max]`.
    Coins { min: u64, max: u64 },
    /// An unlucky draw. Still consumes the cooldown.
    Nothing,
}

pub type RewardEntry = (RewardOutcome, f64);

/// Exploration favors containers and trinkets.
pub const EXPLORE_TABLE: &[RewardEntry] = &[
    (RewardOutcome::Coins { min: 10, max: 40 }, 30.0),
    (RewardOutcome::Item("moneda_antigua"), 20.0),
    (RewardOutcome::Item("cofre_madera"), 14.0),
    (RewardOutcome::Item("cofre_plata"), 6.0),
    (RewardOutcome::Item("guitarra_rota"), 8.0),
    (RewardOutcome::Item("zapatos_baile"), 4.0),
    (RewardOutcome::Item("cofre_oro"), 2.0),
    (RewardOutcome::Item("espada_solar"), 0.5),
    (RewardOutcome::Nothing, 15.5),
];

/// Mining favors raw value and the occasional weapon.
pub const MINE_TABLE: &[RewardEntry] = &[
    (RewardOutcome::Coins { min: 15, max: 50 }, 32.0),
    (RewardOutcome::Item("moneda_antigua"), 18.0),
    (RewardOutcome::Item("armadura_placas"), 6.0),
    (RewardOutcome::Item("hacha_runica"), 3.0),
    (RewardOutcome::Item("gema_abisal"), 1.0),
    (RewardOutcome::Item("fragmento_omega"), 0.25),
    (RewardOutcome::Nothing, 39.75),
];

/// Fishing favors consumables and the rare deep-water find.
pub const FISH_TABLE: &[RewardEntry] = &[
    (RewardOutcome::Coins { min: 5, max: 30 }, 30.0),
    (RewardOutcome::Item("perla_negra"), 12.0),
    (RewardOutcome::Item("tridente_oxidado"), 8.0),
    (RewardOutcome::Item("llave_dorada"), 5.0),
    (RewardOutcome::Item("saco_botin"), 4.0),
    (RewardOutcome::Item("gema_abisal"), 0.75),
    (RewardOutcome::Nothing, 40.25),
];

/// Chest contents, drawn once per quantity unit.
pub const CHEST_TABLE: &[RewardEntry] = &[
    (RewardOutcome::Coins { min: 20, max: 80 }, 28.0),
    (RewardOutcome::Item("moneda_antigua"), 20.0),
    (RewardOutcome::Item("perla_negra"), 14.0),
    (RewardOutcome::Item("amuleto_suerte"), 8.0),
    (RewardOutcome::Item("llave_dorada"), 8.0),
    (RewardOutcome::Item("hacha_runica"), 6.0),
    (RewardOutcome::Item("anillo_regenerador"), 3.0),
    (RewardOutcome::Item("espada_solar"), 2.0),
    (RewardOutcome::Item("fragmento_omega"), 1.0),
    (RewardOutcome::Coins { min: 100, max: 250 }, 10.0),
];

/// Per-rarity `[min, max]` quantity ranges for chest-style draws.
pub fn chest_quantity_range(rarity: Rarity) -> (u32, u32) {
    match rarity {
        Rarity::Common => (1, 2),
        Rarity::Rare => (1, 3),
        Rarity::Epic => (2, 4),
        Rarity::Legendary => (2, 5),
        Rarity::Master => (3, 6),
    }
}

/// Per-rarity probability that a dropped container is sealed.
pub fn sealed_probability(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 0.10,
        Rarity::Rare => 0.20,
        Rarity::Epic => 0.30,
        Rarity::Legendary => 0.40,
        Rarity::Master => 0.50,
    }
}

/// Base pay range for a work shift, before the rank multiplier.
pub const WORK_PAY_RANGE: (u64, u64) = (80, 160);

// ============================================================================
// Bosses
// ============================================================================

/// A spawnable boss species. `spawn_probability` feeds the
/// independent-probability pick: species are tried in order, each with its
/// own chance, and a uniform fallback guarantees something spawns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossDef {
    pub species: &'static str,
    pub spawn_probability: f64,
    pub hp: i64,
    pub damage_min: i64,
    pub damage_max: i64,
    pub hit_chance: f64,
}

pub const BOSSES: &[BossDef] = &[
    BossDef {
        species: "Gólem de Barro",
        spawn_probability: 0.45,
        hp: 300,
        damage_min: 10,
        damage_max: 25,
        hit_chance: 0.70,
    },
    BossDef {
        species: "Serpiente Emplumada",
        spawn_probability: 0.30,
        hp: 450,
        damage_min: 15,
        damage_max: 35,
        hit_chance: 0.75,
    },
    BossDef {
        species: "Coloso de Obsidiana",
        spawn_probability: 0.15,
        hp: 700,
        damage_min: 25,
        damage_max: 50,
        hit_chance: 0.80,
    },
    BossDef {
        species: "Dragón Omega",
        spawn_probability: 0.05,
        hp: 1200,
        damage_min: 40,
        damage_max: 70,
        hit_chance: 0.85,
    },
];

pub fn boss_def(species: &str) -> Option<&'static BossDef> {
    BOSSES.iter().find(|def| def.species == species)
}

// ============================================================================
// Combat constants
// ============================================================================

/// Clan-war base damage range, inclusive.
pub const CLAN_DAMAGE_RANGE: (i64, i64) = (20, 50);
/// Player hit chance in duels/boss fights.
pub const PLAYER_HIT_CHANCE: f64 = 0.80;
/// Critical chance, rolled only on a hit.
pub const CRIT_CHANCE: f64 = 0.20;
/// Unarmed fallback damage range when no weapon was chosen.
pub const UNARMED_DAMAGE_RANGE: (i64, i64) = (5, 12);
/// Shield full-block probability.
pub const SHIELD_BLOCK_CHANCE: f64 = 0.25;
/// Reflect fraction of post-reduction, post-block damage.
pub const REFLECT_FRACTION: f64 = 0.30;
/// Regen flat heal per incoming attack.
pub const REGEN_HEAL: i64 = 10;
/// Armor flat percentage reduction.
pub const ARMOR_REDUCTION: f64 = 0.20;
/// Durability chipped off a weapon per swing.
pub const WEAPON_WEAR_PER_ATTACK: u8 = 2;

/// Per-participant reward ranges on encounter resolution: (coins, xp).
pub const WINNER_COIN_RANGE: (u64, u64) = (200, 400);
pub const WINNER_XP_RANGE: (u64, u64) = (50, 100);
pub const LOSER_COIN_RANGE: (u64, u64) = (25, 75);
pub const LOSER_XP_RANGE: (u64, u64) = (10, 25);

// ============================================================================
// Slot symbols
// ============================================================================

/// A slot reel symbol: display glyph, draw weight, payout multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotSymbol {
    pub glyph: &'static str,
    pub weight: f64,
    pub multiplier: u64,
}

pub const SLOT_SYMBOLS: &[SlotSymbol] = &[
    SlotSymbol { glyph: "⚪", weight: 40.0, multiplier: 1 },
    SlotSymbol { glyph: "🔵", weight: 30.0, multiplier: 2 },
    SlotSymbol { glyph: "🟣", weight: 15.0, multiplier: 3 },
    SlotSymbol { glyph: "🟡", weight: 10.0, multiplier: 5 },
    SlotSymbol { glyph: "💎", weight: 5.0, multiplier: 10 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        for (i, a) in ITEMS.iter().enumerate() {
            for b in &ITEMS[i + 1..] {
                assert_ne!(a.id, b.id, "duplicate catalog id {}", a.id);
            }
        }
    }

    #[test]
    fn reward_tables_reference_real_items() {
        for table in [EXPLORE_TABLE, MINE_TABLE, FISH_TABLE, CHEST_TABLE] {
            for (outcome, weight) in table {
                assert!(*weight >= 0.0);
                if let RewardOutcome::Item(id) = outcome {
                    assert!(item_def(id).is_some(), "unknown item {}", id);
                }
            }
        }
    }

    #[test]
    fn canonical_powers() {
        assert_eq!(item_def("guitarra_rota").unwrap().power, 20);
        assert_eq!(item_def("fragmento_omega").unwrap().power, 45);
    }

    #[test]
    fn quantity_ranges_widen_with_rarity() {
        let mut last_max = 0;
        for rarity in Rarity::ALL {
            let (min, max) = chest_quantity_range(rarity);
            assert!(min >= 1 && min <= max);
            assert!(max >= last_max);
            last_max = max;
        }
    }

    #[test]
    fn modifier_mappings_resolve() {
        assert_eq!(upgrade_for("escudo_reforzado"), Some(CombatUpgrade::Shield));
        assert_eq!(upgrade_for("capa_espinosa"), Some(CombatUpgrade::Reflect));
        assert_eq!(tool_tier_for("pico_epico"), Some(ToolTier::Epic));
        assert_eq!(tool_tier_for("guitarra_rota"), None);
    }

    #[test]
    fn boss_probabilities_are_probabilities() {
        for def in BOSSES {
            assert!(def.spawn_probability > 0.0 && def.spawn_probability <= 1.0);
            assert!(def.damage_min <= def.damage_max);
            assert!(def.hp > 0);
        }
    }
}
