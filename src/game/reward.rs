//! Reward resolution: turning an activity draw into drops and coins.
//!
//! The resolver is deliberately free of persistence. It takes the actor's
//! pre-resolved [`ModifierSet`], rolls against the catalog tables, and
//! hands back a [`RewardDraw`] for the action envelope to commit.

use log::debug;
use rand::Rng;

use super::catalog::{
    self, RewardOutcome, CHEST_TABLE, EXPLORE_TABLE, FISH_TABLE, MINE_TABLE, WORK_PAY_RANGE,
};
use super::errors::GameError;
use super::table::WeightedTable;
use super::types::{
    Activity, Drop, ItemCategory, ItemInstance, ModifierSet, Rank, Rarity, ToolTier,
};

/// Everything one resolved reward draw produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardDraw {
    pub drops: Vec<Drop>,
    pub coins: u64,
}

impl RewardDraw {
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty() && self.coins == 0
    }
}

/// Improved tools boost rare/epic entries ×1.3; epic tools boost
/// epic/legendary/master entries ×1.5. The boost lands on the matching
/// entries only; the rest of the table keeps its base weight.
fn tier_scale(tier: ToolTier, outcome: &RewardOutcome) -> f64 {
    let rarity = match outcome {
        RewardOutcome::Item(id) => match catalog::item_def(id) {
            Some(def) => def.rarity,
            None => return 1.0,
        },
        _ => return 1.0,
    };
    match tier {
        ToolTier::None => 1.0,
        ToolTier::Improved => {
            if matches!(rarity, Rarity::Rare | Rarity::Epic) {
                1.3
            } else {
                1.0
            }
        }
        ToolTier::Epic => {
            if rarity >= Rarity::Epic {
                1.5
            } else {
                1.0
            }
        }
    }
}

fn table_for(activity: Activity) -> Result<WeightedTable<RewardOutcome>, GameError> {
    let entries = match activity {
        Activity::Explore => EXPLORE_TABLE,
        Activity::Mine => MINE_TABLE,
        Activity::Fish => FISH_TABLE,
        _ => {
            return Err(GameError::UnknownActivity(format!(
                "{} has no reward table",
                activity.name()
            )))
        }
    };
    WeightedTable::new(entries.to_vec())
}

/// Mint a fresh instance from the catalog. Containers roll their sealed
/// flag here, per-rarity.
pub fn mint_item<R: Rng + ?Sized>(item_id: &str, rng: &mut R) -> Result<ItemInstance, GameError> {
    let def = catalog::item_def(item_id)
        .ok_or_else(|| GameError::NotFound(format!("catalog item: {}", item_id)))?;
    let mut item = ItemInstance::new(
        def.id,
        def.name,
        def.rarity,
        def.category,
        def.power,
        def.uses,
    );
    if def.category == ItemCategory::Container {
        item.sealed = rng.gen_bool(catalog::sealed_probability(def.rarity));
    }
    Ok(item)
}

fn realize<R: Rng + ?Sized>(
    outcome: &RewardOutcome,
    rng: &mut R,
) -> Result<RewardDraw, GameError> {
    let mut draw = RewardDraw::default();
    match outcome {
        RewardOutcome::Item(id) => {
            let item = mint_item(id, rng)?;
            draw.drops.push(Drop { item, quantity: 1 });
        }
        RewardOutcome::Coins { min, max } => {
            draw.coins = rng.gen_range(*min..=*max);
        }
        RewardOutcome::Nothing => {}
    }
    Ok(draw)
}

/// Resolve one gathering draw (explore / mine / fish).
pub fn resolve_activity<R: Rng + ?Sized>(
    activity: Activity,
    modifiers: &ModifierSet,
    rng: &mut R,
) -> Result<RewardDraw, GameError> {
    let table = table_for(activity)?;
    let outcome = *table.sample_scaled(rng, |o| tier_scale(modifiers.tool_tier, o));
    let draw = realize(&outcome, rng)?;
    debug!(
        "reward: {} tier={:?} -> {} drops, {} coins",
        activity.name(),
        modifiers.tool_tier,
        draw.drops.len(),
        draw.coins
    );
    Ok(draw)
}

/// Number of content draws a chest of `rarity` yields. The loot sack adds
/// one on rare-or-better chests, capped at the range maximum.
pub fn chest_quantity<R: Rng + ?Sized>(
    rarity: Rarity,
    modifiers: &ModifierSet,
    rng: &mut R,
) -> u32 {
    let (min, max) = catalog::chest_quantity_range(rarity);
    let mut quantity = rng.gen_range(min..=max);
    if modifiers.loot_sack && rarity >= Rarity::Rare {
        quantity = (quantity + 1).min(max);
    }
    quantity
}

/// Resolve the contents of an (already unsealed) chest.
pub fn resolve_chest<R: Rng + ?Sized>(
    rarity: Rarity,
    modifiers: &ModifierSet,
    rng: &mut R,
) -> Result<RewardDraw, GameError> {
    let table = WeightedTable::new(CHEST_TABLE.to_vec())?;
    let quantity = chest_quantity(rarity, modifiers, rng);
    let mut combined = RewardDraw::default();
    for _ in 0..quantity {
        let outcome = *table.sample_scaled(rng, |o| tier_scale(modifiers.tool_tier, o));
        let draw = realize(&outcome, rng)?;
        combined.coins = combined.coins.saturating_add(draw.coins);
        combined.drops.extend(draw.drops);
    }
    debug!(
        "chest: rarity={:?} pulls={} -> {} drops, {} coins",
        rarity,
        quantity,
        combined.drops.len(),
        combined.coins
    );
    Ok(combined)
}

/// A work shift pays coins only, scaled by rank.
pub fn work_pay<R: Rng + ?Sized>(rank: Rank, rng: &mut R) -> u64 {
    let (min, max) = WORK_PAY_RANGE;
    let base = rng.gen_range(min..=max);
    base * rank.pay_multiplier_pct() / 100
}
