//! Turn-level combat resolution for boss fights and clan wars.
//!
//! An encounter moves `Pending → Active → Resolved(winner)`. Every attack
//! walks the same fixed pipeline: base roll, hit/crit gating (duels only),
//! flat reduction, full block, reflect, regen, then the resolution check
//! against the *unclamped* hit points.

use log::{debug, info};
use rand::Rng;

use super::catalog::{
    self, BossDef, ARMOR_REDUCTION, CLAN_DAMAGE_RANGE, CRIT_CHANCE, LOSER_COIN_RANGE,
    LOSER_XP_RANGE, PLAYER_HIT_CHANCE, REFLECT_FRACTION, REGEN_HEAL, SHIELD_BLOCK_CHANCE,
    UNARMED_DAMAGE_RANGE, WINNER_COIN_RANGE, WINNER_XP_RANGE,
};
use super::errors::GameError;
use super::table::pick_independent;
use super::types::{
    CombatUpgrade, EncounterKind, EncounterRecord, EncounterSide, EncounterState, ItemInstance,
    Side,
};

/// What one resolved attack did, for the dispatcher to narrate.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackReport {
    pub attacker: Side,
    pub base_damage: i64,
    pub hit: bool,
    pub critical: bool,
    /// Damage actually applied to the defender (post reduction and block).
    pub damage_dealt: i64,
    pub blocked: bool,
    /// Damage bounced back onto the attacker.
    pub reflected: i64,
    pub regen_heal: i64,
    /// Clamped-at-zero hit points for display.
    pub defender_hp: i64,
    pub attacker_hp: i64,
    pub state: EncounterState,
}

/// Pick the boss species to spawn. Species are tried in catalog order,
/// each with its own independent probability; a uniform fallback
/// guarantees a spawn even on a joint miss.
pub fn pick_boss_species<R: Rng + ?Sized>(rng: &mut R) -> &'static BossDef {
    pick_independent(catalog::BOSSES, rng, |def| def.spawn_probability)
}

/// Spawn a boss encounter in a guild scope. Bosses do not negotiate, so
/// the encounter starts `Active` immediately.
pub fn spawn_boss<R: Rng + ?Sized>(
    guild_id: &str,
    participants: Vec<String>,
    rng: &mut R,
) -> EncounterRecord {
    let def = pick_boss_species(rng);
    let challenger = EncounterSide::new(100 * participants.len().max(1) as i64, participants);
    let defender = EncounterSide::new(def.hp, vec![def.species.to_string()]);
    let mut encounter = EncounterRecord::new(
        guild_id,
        EncounterKind::Boss {
            species: def.species.to_string(),
        },
        challenger,
        defender,
    );
    encounter.state = EncounterState::Active;
    info!("boss spawn: {} in scope {}", def.species, guild_id);
    encounter
}

/// Canonical scope key for a clan pair, order-independent.
pub fn clan_scope(clan_a: &str, clan_b: &str) -> String {
    let mut pair = [clan_a, clan_b];
    pair.sort_unstable();
    format!("{}:{}", pair[0], pair[1])
}

/// Open a clan war challenge. Stays `Pending` until the defenders accept.
pub fn start_clan_war(
    clan_a: &str,
    roster_a: Vec<String>,
    clan_b: &str,
    roster_b: Vec<String>,
) -> EncounterRecord {
    let hp_a = 150 * roster_a.len().max(1) as i64;
    let hp_b = 150 * roster_b.len().max(1) as i64;
    EncounterRecord::new(
        &clan_scope(clan_a, clan_b),
        EncounterKind::ClanWar,
        EncounterSide::new(hp_a, roster_a),
        EncounterSide::new(hp_b, roster_b),
    )
}

/// `Pending → Active`. Accepting a resolved or already-active encounter
/// is rejected.
pub fn accept(encounter: &mut EncounterRecord) -> Result<(), GameError> {
    match encounter.state {
        EncounterState::Pending => {
            encounter.state = EncounterState::Active;
            Ok(())
        }
        EncounterState::Active => Err(GameError::Internal(
            "encounter already accepted".to_string(),
        )),
        EncounterState::Resolved { .. } => Err(GameError::EncounterResolved),
    }
}

/// Uniform base damage for a duel attacker: the weapon's range, or bare
/// fists without one.
fn duel_base_damage<R: Rng + ?Sized>(weapon: Option<&ItemInstance>, rng: &mut R) -> i64 {
    match weapon {
        Some(item) if item.power > 0 => {
            let max = i64::from(item.power);
            let min = (max / 2).max(1);
            rng.gen_range(min..=max)
        }
        _ => rng.gen_range(UNARMED_DAMAGE_RANGE.0..=UNARMED_DAMAGE_RANGE.1),
    }
}

/// Resolve one attack within an active encounter, mutating both sides.
///
/// `weapon` is the attacker's chosen weapon for duel-style encounters
/// (`None` after a declined weapon-choice session). Clan-war attacks roll
/// the fixed clan range and skip hit/crit gating.
pub fn resolve_attack<R: Rng + ?Sized>(
    encounter: &mut EncounterRecord,
    attacker: Side,
    weapon: Option<&ItemInstance>,
    rng: &mut R,
) -> Result<AttackReport, GameError> {
    match encounter.state {
        EncounterState::Active => {}
        EncounterState::Pending => {
            return Err(GameError::NoActiveEncounter(format!(
                "{} not accepted yet",
                encounter.scope
            )))
        }
        EncounterState::Resolved { .. } => return Err(GameError::EncounterResolved),
    }

    let is_clan_war = encounter.kind == EncounterKind::ClanWar;
    let defender = attacker.opposite();

    // 1-2: base roll plus hit/crit gating (duels only).
    let (base, hit, critical, mut damage) = if is_clan_war {
        let base = rng.gen_range(CLAN_DAMAGE_RANGE.0..=CLAN_DAMAGE_RANGE.1);
        (base, true, false, base)
    } else {
        let hit_chance = match (&encounter.kind, attacker) {
            (EncounterKind::Boss { species }, Side::Defender) => catalog::boss_def(species)
                .map(|d| d.hit_chance)
                .unwrap_or(PLAYER_HIT_CHANCE),
            _ => PLAYER_HIT_CHANCE,
        };
        let base = match (&encounter.kind, attacker) {
            (EncounterKind::Boss { species }, Side::Defender) => {
                match catalog::boss_def(species) {
                    Some(d) => rng.gen_range(d.damage_min..=d.damage_max),
                    None => duel_base_damage(weapon, rng),
                }
            }
            _ => duel_base_damage(weapon, rng),
        };
        if !rng.gen_bool(hit_chance) {
            (base, false, false, 0)
        } else {
            let critical = rng.gen_bool(CRIT_CHANCE);
            let mut dmg = (base as f64 * rng.gen_range(0.8..1.2)).floor() as i64;
            if critical {
                dmg = (dmg as f64 * 1.5).floor() as i64;
            }
            (base, true, critical, dmg.max(1))
        }
    };

    let defender_upgrades = encounter.side(defender).upgrades.clone();

    // 3: flat percentage reduction, before any blocking check.
    if damage > 0 && defender_upgrades.contains(&CombatUpgrade::Armor) {
        damage = (damage as f64 * (1.0 - ARMOR_REDUCTION)).floor() as i64;
    }

    // 4: full block.
    let mut blocked = false;
    if damage > 0
        && defender_upgrades.contains(&CombatUpgrade::Shield)
        && rng.gen_bool(SHIELD_BLOCK_CHANCE)
    {
        damage = 0;
        blocked = true;
    }

    encounter.side_mut(defender).hp -= damage;

    // 5: reflect a share of what actually landed.
    let mut reflected = 0;
    if damage > 0 && defender_upgrades.contains(&CombatUpgrade::Reflect) {
        reflected = (damage as f64 * REFLECT_FRACTION).floor() as i64;
        encounter.side_mut(attacker).hp -= reflected;
    }

    // 6: regen heals the defender no matter how the attack went.
    let mut regen_heal = 0;
    if defender_upgrades.contains(&CombatUpgrade::Regen) {
        let side = encounter.side_mut(defender);
        regen_heal = REGEN_HEAL.min(side.max_hp - side.hp).max(0);
        side.hp += regen_heal;
    }

    // 7: resolution on the unclamped values. Defender death takes
    // precedence when a reflect kill lands in the same exchange.
    if encounter.side(defender).hp <= 0 {
        encounter.state = EncounterState::Resolved { winner: attacker };
    } else if encounter.side(attacker).hp <= 0 {
        encounter.state = EncounterState::Resolved { winner: defender };
    }

    let report = AttackReport {
        attacker,
        base_damage: base,
        hit,
        critical,
        damage_dealt: damage,
        blocked,
        reflected,
        regen_heal,
        defender_hp: encounter.side(defender).display_hp(),
        attacker_hp: encounter.side(attacker).display_hp(),
        state: encounter.state,
    };
    debug!(
        "attack: scope={} attacker={:?} dealt={} reflected={} state={:?}",
        encounter.scope, attacker, damage, reflected, encounter.state
    );
    Ok(report)
}

/// One participant's payout from a resolved encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub player_id: String,
    pub coins: u64,
    pub xp: u64,
    pub won: bool,
}

/// Roll per-participant rewards for a resolved encounter. Each winner and
/// each loser rolls independently from the fixed ranges; nothing is split
/// from a pool. Boss rosters (the boss side itself) are skipped.
pub fn distribute_rewards<R: Rng + ?Sized>(
    encounter: &EncounterRecord,
    rng: &mut R,
) -> Result<Vec<Payout>, GameError> {
    let winner = match encounter.state {
        EncounterState::Resolved { winner } => winner,
        _ => {
            return Err(GameError::NoActiveEncounter(format!(
                "{} not resolved",
                encounter.scope
            )))
        }
    };
    let mut payouts = Vec::new();
    for side in [Side::Challenger, Side::Defender] {
        // The boss itself draws no salary.
        if matches!(encounter.kind, EncounterKind::Boss { .. }) && side == Side::Defender {
            continue;
        }
        let won = side == winner;
        let (coin_range, xp_range) = if won {
            (WINNER_COIN_RANGE, WINNER_XP_RANGE)
        } else {
            (LOSER_COIN_RANGE, LOSER_XP_RANGE)
        };
        for player_id in &encounter.side(side).participants {
            payouts.push(Payout {
                player_id: player_id.clone(),
                coins: rng.gen_range(coin_range.0..=coin_range.1),
                xp: rng.gen_range(xp_range.0..=xp_range.1),
                won,
            });
        }
    }
    Ok(payouts)
}
