use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub const PLAYER_SCHEMA_VERSION: u8 = 1;
pub const ITEM_SCHEMA_VERSION: u8 = 1;
pub const ENCOUNTER_SCHEMA_VERSION: u8 = 1;

/// Fixed inventory capacity in slots. Hitting the cap never drops loot
/// silently; it opens a forced-replacement session instead.
pub const INVENTORY_CAPACITY: usize = 20;

/// Ordered rarity classification. Ordering matters: tool-tier weight
/// scaling and chest quantity ranges are keyed off `>=` comparisons.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Master,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Master,
    ];

    /// Short display tag used by callers formatting drop lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Rarity::Common => "común",
            Rarity::Rare => "rara",
            Rarity::Epic => "épica",
            Rarity::Legendary => "legendaria",
            Rarity::Master => "maestra",
        }
    }
}

/// Player rank, derived from accumulated experience.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Novato,
    Aprendiz,
    Veterano,
    Experto,
    Maestro,
}

impl Rank {
    /// Experience thresholds for each rank, lowest first.
    const THRESHOLDS: [(u64, Rank); 5] = [
        (0, Rank::Novato),
        (500, Rank::Aprendiz),
        (2_000, Rank::Veterano),
        (8_000, Rank::Experto),
        (25_000, Rank::Maestro),
    ];

    pub fn from_xp(xp: u64) -> Rank {
        let mut rank = Rank::Novato;
        for (min, r) in Self::THRESHOLDS {
            if xp >= min {
                rank = r;
            }
        }
        rank
    }

    /// Work payout multiplier, in percent. Higher ranks earn more per shift.
    pub fn pay_multiplier_pct(&self) -> u64 {
        match self {
            Rank::Novato => 100,
            Rank::Aprendiz => 115,
            Rank::Veterano => 135,
            Rank::Experto => 160,
            Rank::Maestro => 200,
        }
    }
}

impl Default for Rank {
    fn default() -> Self {
        Rank::Novato
    }
}

/// Player-initiated action kinds gated by their own cooldown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Explore,
    Mine,
    Fish,
    Work,
    BossFight,
    ClanWar,
    Wager,
}

impl Activity {
    /// Stable name used as the cooldown map key and in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Activity::Explore => "explore",
            Activity::Mine => "mine",
            Activity::Fish => "fish",
            Activity::Work => "work",
            Activity::BossFight => "boss_fight",
            Activity::ClanWar => "clan_war",
            Activity::Wager => "wager",
        }
    }

    pub fn from_name(name: &str) -> Option<Activity> {
        match name {
            "explore" => Some(Activity::Explore),
            "mine" => Some(Activity::Mine),
            "fish" => Some(Activity::Fish),
            "work" => Some(Activity::Work),
            "boss_fight" => Some(Activity::BossFight),
            "clan_war" => Some(Activity::ClanWar),
            "wager" => Some(Activity::Wager),
            _ => None,
        }
    }
}

/// Item classification used for modifier resolution and display grouping.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Tool,
    Weapon,
    Consumable,
    Container,
    Upgrade,
    Collectible,
}

/// Gathering tool tier held by a player. Resolved once per action from the
/// inventory; reward tables scale specific rarity weights off this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ToolTier {
    None,
    Improved,
    Epic,
}

impl Default for ToolTier {
    fn default() -> Self {
        ToolTier::None
    }
}

/// Typed combat upgrades. These replace the original's string-keyed
/// "has item named X" lookups with a capability set resolved up front.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CombatUpgrade {
    /// Independent chance to zero incoming damage entirely.
    Shield,
    /// Returns a percentage of post-reduction, post-block damage.
    Reflect,
    /// Flat heal after every incoming attack, regardless of outcome.
    Regen,
    /// Flat percentage damage reduction, applied before blocking.
    Armor,
}

/// The capability/modifier set for one actor, resolved once per action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModifierSet {
    pub tool_tier: ToolTier,
    pub upgrades: Vec<CombatUpgrade>,
    /// Doubles positive wager payouts (never affects a loss).
    pub double_winnings: bool,
    /// +15% on the blackjack natural bonus.
    pub dance: bool,
    /// +1 chest quantity (capped at range max) on rare-or-better draws.
    pub loot_sack: bool,
    /// Holds a key able to open sealed containers.
    pub golden_key: bool,
}

impl ModifierSet {
    pub fn has_upgrade(&self, upgrade: CombatUpgrade) -> bool {
        self.upgrades.contains(&upgrade)
    }
}

/// One inventory slot: a concrete item instance owned by a player.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemInstance {
    pub id: Uuid,
    /// Catalog key this instance was minted from.
    pub item_id: String,
    pub name: String,
    pub rarity: Rarity,
    pub category: ItemCategory,
    pub power: u32,
    /// `None` means the item never wears out by use count.
    pub remaining_uses: Option<u16>,
    /// 0-100. Combat use chips this down; repairs restore it.
    pub durability: u8,
    /// Sealed containers need a golden key to open.
    pub sealed: bool,
    pub acquired_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ItemInstance {
    pub fn new(
        item_id: &str,
        name: &str,
        rarity: Rarity,
        category: ItemCategory,
        power: u32,
        remaining_uses: Option<u16>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            item_id: item_id.to_string(),
            name: name.to_string(),
            rarity,
            category,
            power,
            remaining_uses,
            durability: 100,
            sealed: false,
            acquired_at: Utc::now(),
            schema_version: ITEM_SCHEMA_VERSION,
        }
    }

    pub fn with_sealed(mut self, sealed: bool) -> Self {
        self.sealed = sealed;
        self
    }

    /// Consume one use. Returns true when the item is spent and should be
    /// removed from the inventory.
    pub fn consume_use(&mut self) -> bool {
        match self.remaining_uses.as_mut() {
            Some(uses) => {
                *uses = uses.saturating_sub(1);
                *uses == 0
            }
            None => false,
        }
    }

    /// Chip durability by `amount`, saturating at zero.
    pub fn wear(&mut self, amount: u8) {
        self.durability = self.durability.saturating_sub(amount);
    }

    pub fn repair(&mut self) {
        self.durability = 100;
    }
}

/// Persistent economy record for one player. The engine treats this as an
/// opaque mutable ledger: read, adjust, write back within a single action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerRecord {
    pub id: String,
    pub balance: u64,
    pub experience: u64,
    pub rank: Rank,
    /// Earliest-next-allowed instant per activity name.
    #[serde(default)]
    pub cooldowns: HashMap<String, DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl PlayerRecord {
    pub fn new(id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            balance: 0,
            experience: 0,
            rank: Rank::Novato,
            cooldowns: HashMap::new(),
            created_at: now,
            updated_at: now,
            schema_version: PLAYER_SCHEMA_VERSION,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Credit coins and experience in one step, re-deriving rank.
    pub fn award(&mut self, coins: u64, xp: u64) {
        self.balance = self.balance.saturating_add(coins);
        self.experience = self.experience.saturating_add(xp);
        self.rank = Rank::from_xp(self.experience);
    }

    /// Debit `amount`, failing without mutation when the balance is short.
    pub fn debit(&mut self, amount: u64) -> Result<(), super::errors::GameError> {
        if self.balance < amount {
            return Err(super::errors::GameError::InsufficientFunds {
                have: self.balance,
                need: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}

/// Which side of an encounter an actor fights on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Challenger,
    Defender,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Challenger => Side::Defender,
            Side::Defender => Side::Challenger,
        }
    }
}

/// Encounter lifecycle. `Resolved` is terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EncounterState {
    Pending,
    Active,
    Resolved { winner: Side },
}

/// What kind of fight this encounter is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EncounterKind {
    Boss { species: String },
    ClanWar,
}

/// One side of an encounter: hit points, roster, and active upgrades.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncounterSide {
    pub hp: i64,
    pub max_hp: i64,
    pub participants: Vec<String>,
    #[serde(default)]
    pub upgrades: Vec<CombatUpgrade>,
}

impl EncounterSide {
    pub fn new(max_hp: i64, participants: Vec<String>) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            participants,
            upgrades: Vec::new(),
        }
    }

    /// Hit points clamped at zero, for display. Resolution checks use the
    /// raw `hp` field.
    pub fn display_hp(&self) -> i64 {
        self.hp.max(0)
    }
}

/// A bounded combat session between two sides. Keyed in storage by scope,
/// so spawning a new encounter in a scope implicitly retires the old one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncounterRecord {
    pub id: Uuid,
    /// Guild id for boss fights, "clan_a:clan_b" (sorted) for wars.
    pub scope: String,
    pub kind: EncounterKind,
    pub state: EncounterState,
    pub challenger: EncounterSide,
    pub defender: EncounterSide,
    pub created_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl EncounterRecord {
    pub fn new(
        scope: &str,
        kind: EncounterKind,
        challenger: EncounterSide,
        defender: EncounterSide,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            scope: scope.to_string(),
            kind,
            state: EncounterState::Pending,
            challenger,
            defender,
            created_at: Utc::now(),
            schema_version: ENCOUNTER_SCHEMA_VERSION,
        }
    }

    pub fn side(&self, side: Side) -> &EncounterSide {
        match side {
            Side::Challenger => &self.challenger,
            Side::Defender => &self.defender,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut EncounterSide {
        match side {
            Side::Challenger => &mut self.challenger,
            Side::Defender => &mut self.defender,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == EncounterState::Active
    }
}

/// One resolved drop handed back to the dispatcher for formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    pub item: ItemInstance,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_ordering_drives_comparisons() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
        assert!(Rarity::Legendary < Rarity::Master);
    }

    #[test]
    fn rank_thresholds() {
        assert_eq!(Rank::from_xp(0), Rank::Novato);
        assert_eq!(Rank::from_xp(499), Rank::Novato);
        assert_eq!(Rank::from_xp(500), Rank::Aprendiz);
        assert_eq!(Rank::from_xp(2_000), Rank::Veterano);
        assert_eq!(Rank::from_xp(7_999), Rank::Veterano);
        assert_eq!(Rank::from_xp(8_000), Rank::Experto);
        assert_eq!(Rank::from_xp(1_000_000), Rank::Maestro);
    }

    #[test]
    fn award_rerolls_rank() {
        let mut player = PlayerRecord::new("ana");
        player.award(10, 600);
        assert_eq!(player.balance, 10);
        assert_eq!(player.rank, Rank::Aprendiz);
    }

    #[test]
    fn debit_rejects_short_balance_without_mutation() {
        let mut player = PlayerRecord::new("ana");
        player.balance = 50;
        assert!(player.debit(100).is_err());
        assert_eq!(player.balance, 50);
        player.debit(30).expect("debit");
        assert_eq!(player.balance, 20);
    }

    #[test]
    fn consumable_spends_down_to_removal() {
        let mut item = ItemInstance::new(
            "llave_dorada",
            "Llave Dorada",
            Rarity::Rare,
            ItemCategory::Consumable,
            0,
            Some(2),
        );
        assert!(!item.consume_use());
        assert!(item.consume_use());
        assert_eq!(item.remaining_uses, Some(0));
    }

    #[test]
    fn display_hp_clamps_but_raw_hp_keeps_sign() {
        let mut side = EncounterSide::new(100, vec!["ana".into()]);
        side.hp = -12;
        assert_eq!(side.display_hp(), 0);
        assert_eq!(side.hp, -12);
    }

    #[test]
    fn activity_names_round_trip() {
        for activity in [
            Activity::Explore,
            Activity::Mine,
            Activity::Fish,
            Activity::Work,
            Activity::BossFight,
            Activity::ClanWar,
            Activity::Wager,
        ] {
            assert_eq!(Activity::from_name(activity.name()), Some(activity));
        }
        assert_eq!(Activity::from_name("nap"), None);
    }
}
