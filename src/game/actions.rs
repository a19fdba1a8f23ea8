//! The cooldown-gated action envelope.
//!
//! [`GameEngine`] is the surface the external command dispatcher calls.
//! Every player action follows the same shape: validate arguments, pass
//! the cooldown gate, resolve the player's held items into a typed
//! [`ModifierSet`] once, run the resolver, then commit results and the
//! new cooldown instant back through storage. A denied gate mutates
//! nothing and reports the remaining wait.

use chrono::{Duration, Utc};
use log::{debug, info};
use uuid::Uuid;

use crate::validation::{
    validate_clan_pair, validate_player_id, validate_roulette_number, validate_stake, StakeRules,
};

use super::blackjack::{BlackjackHand, Settlement};
use super::catalog::{self, WEAPON_WEAR_PER_ATTACK};
use super::combat::{self, AttackReport, Payout};
use super::cooldown::{self, CooldownSchedule, CooldownStatus};
use super::errors::GameError;
use super::reward::{self, RewardDraw};
use super::session::{FlowKind, Resolution, SessionHandle, SessionRegistry, SubmitOutcome};
use super::storage::GameStore;
use super::types::{
    Activity, EncounterKind, EncounterRecord, EncounterState, ItemCategory, ItemInstance,
    ModifierSet, PlayerRecord, Side, INVENTORY_CAPACITY,
};
use super::wager::{self, CoinFace, SlotResult};

/// Timeouts for the interactive flows, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    pub chest_secs: i64,
    pub replacement_secs: i64,
    pub weapon_secs: i64,
    pub blackjack_secs: i64,
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self {
            chest_secs: 60,
            replacement_secs: 60,
            weapon_secs: 30,
            blackjack_secs: 30,
        }
    }
}

/// Wager games the dispatcher can route a stake into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WagerKind {
    Coin { guess: CoinFace },
    Roulette { number: u8 },
    Slot,
}

/// The draw behind a wager settlement, for the dispatcher to narrate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WagerDetail {
    Coin { drawn: CoinFace, won: bool },
    Roulette { chosen: u8, drawn: u8 },
    Slot { glyphs: [&'static str; 3], result: SlotResult },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerReport {
    pub stake: u64,
    pub payout: u64,
    pub detail: WagerDetail,
    pub balance_after: u64,
}

/// What landed in (or bounced off) the inventory after a reward draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardReport {
    pub coins: u64,
    pub xp: u64,
    pub stored: Vec<ItemInstance>,
    /// Draws discarded because the owner declined a replacement.
    pub discarded: Vec<ItemInstance>,
    /// Items evicted by an owner-chosen replacement.
    pub evicted: Vec<ItemInstance>,
    pub balance_after: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChestReport {
    pub opened: bool,
    pub key_consumed: bool,
    pub loot: Option<RewardReport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CombatReport {
    pub attack: AttackReport,
    /// Present once the encounter resolved on this attack.
    pub payouts: Option<Vec<Payout>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlackjackReport {
    pub hand: BlackjackHand,
    pub settlement: Settlement,
    pub balance_after: u64,
}

/// Small fixed experience for running a gathering activity at all.
fn activity_xp(activity: Activity) -> u64 {
    match activity {
        Activity::Explore => 10,
        Activity::Mine => 15,
        Activity::Fish => 15,
        Activity::Work => 25,
        _ => 0,
    }
}

/// The engine facade the dispatcher drives.
pub struct GameEngine {
    store: GameStore,
    sessions: SessionRegistry,
    schedule: CooldownSchedule,
    timeouts: SessionTimeouts,
    stake_rules: StakeRules,
}

impl GameEngine {
    pub fn new(store: GameStore) -> Self {
        Self {
            store,
            sessions: SessionRegistry::new(),
            schedule: CooldownSchedule::default(),
            timeouts: SessionTimeouts::default(),
            stake_rules: StakeRules::default(),
        }
    }

    pub fn with_schedule(mut self, schedule: CooldownSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_timeouts(mut self, timeouts: SessionTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn store(&self) -> &GameStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    // ------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------

    /// Resolve a player's held items into the typed capability set, once
    /// per action. Broken tools (durability 0) grant nothing.
    pub fn resolve_modifiers(&self, player_id: &str) -> Result<ModifierSet, GameError> {
        let mut modifiers = ModifierSet::default();
        for item in self.store.list_inventory(player_id)? {
            if item.durability == 0 {
                continue;
            }
            if let Some(tier) = catalog::tool_tier_for(&item.item_id) {
                modifiers.tool_tier = modifiers.tool_tier.max(tier);
            }
            if let Some(upgrade) = catalog::upgrade_for(&item.item_id) {
                if !modifiers.upgrades.contains(&upgrade) {
                    modifiers.upgrades.push(upgrade);
                }
            }
            match item.item_id.as_str() {
                "amuleto_suerte" => modifiers.double_winnings = true,
                "zapatos_baile" => modifiers.dance = true,
                "saco_botin" => modifiers.loot_sack = true,
                "llave_dorada" => modifiers.golden_key = true,
                _ => {}
            }
        }
        Ok(modifiers)
    }

    /// Spend one use of a held consumable, removing it when exhausted.
    /// No-op when the player holds none.
    fn consume_one(&self, player_id: &str, item_id: &str) -> Result<(), GameError> {
        let held = self.store.list_inventory(player_id)?;
        if let Some(mut item) = held.into_iter().find(|i| i.item_id == item_id) {
            if item.consume_use() {
                self.store.remove_item(player_id, item.id)?;
            } else {
                self.store.put_item(player_id, item)?;
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Cooldown gate
    // ------------------------------------------------------------------

    /// Read-only gate check. Never mutates the stored instant.
    pub fn check_cooldown(
        &self,
        player_id: &str,
        activity: Activity,
    ) -> Result<CooldownStatus, GameError> {
        validate_player_id(player_id)?;
        let player = self.store.get_or_create_player(player_id)?;
        Ok(cooldown::may_act(&player, activity, Utc::now()))
    }

    fn gate(&self, player: &PlayerRecord, activity: Activity) -> Result<(), GameError> {
        let status = cooldown::may_act(player, activity, Utc::now());
        match status {
            CooldownStatus::Allowed => Ok(()),
            CooldownStatus::Cooling { remaining } => Err(GameError::CooldownActive {
                remaining_secs: remaining.num_seconds().max(1),
            }),
        }
    }

    // ------------------------------------------------------------------
    // Rewards
    // ------------------------------------------------------------------

    /// Resolve one gated activity draw for a player and commit the
    /// results. Inventory-full draws run a forced-replacement session per
    /// drop; a declined replacement discards that drop only.
    pub async fn resolve_reward(
        &self,
        player_id: &str,
        activity: Activity,
    ) -> Result<RewardReport, GameError> {
        validate_player_id(player_id)?;
        let mut player = self.store.get_or_create_player(player_id)?;
        self.gate(&player, activity)?;
        let modifiers = self.resolve_modifiers(player_id)?;

        let draw = {
            let mut rng = rand::thread_rng();
            match activity {
                Activity::Explore | Activity::Mine | Activity::Fish => {
                    reward::resolve_activity(activity, &modifiers, &mut rng)?
                }
                Activity::Work => RewardDraw {
                    drops: Vec::new(),
                    coins: reward::work_pay(player.rank, &mut rng),
                },
                _ => {
                    return Err(GameError::UnknownActivity(format!(
                        "{} is not a reward activity",
                        activity.name()
                    )))
                }
            }
        };

        let mut report = self.commit_draw(player_id, draw).await?;
        let xp = activity_xp(activity);
        player.award(report.coins, xp);
        cooldown::commit(&mut player, activity, &self.schedule, Utc::now());
        self.store.put_player(player.clone())?;
        report.xp = xp;
        report.balance_after = player.balance;
        info!(
            "reward: player={} activity={} coins={} stored={} discarded={}",
            player_id,
            activity.name(),
            report.coins,
            report.stored.len(),
            report.discarded.len()
        );
        Ok(report)
    }

    /// Store each drop, running the forced-replacement flow when the
    /// inventory is at capacity.
    async fn commit_draw(
        &self,
        player_id: &str,
        draw: RewardDraw,
    ) -> Result<RewardReport, GameError> {
        let mut report = RewardReport {
            coins: draw.coins,
            xp: 0,
            stored: Vec::new(),
            discarded: Vec::new(),
            evicted: Vec::new(),
            balance_after: 0,
        };
        for drop in draw.drops {
            for unit in 0..drop.quantity {
                let mut item = drop.item.clone();
                if unit > 0 {
                    // Each stored unit is its own instance.
                    item.id = Uuid::new_v4();
                }
                match self.store_item(player_id, item.clone()).await? {
                    StoreOutcome::Stored => report.stored.push(item),
                    StoreOutcome::Replaced { evicted } => {
                        report.evicted.push(evicted);
                        report.stored.push(item);
                    }
                    StoreOutcome::Discarded => report.discarded.push(item),
                }
            }
        }
        Ok(report)
    }

    async fn store_item(
        &self,
        player_id: &str,
        item: ItemInstance,
    ) -> Result<StoreOutcome, GameError> {
        if self.store.inventory_count(player_id)? < INVENTORY_CAPACITY {
            self.store.put_item(player_id, item)?;
            return Ok(StoreOutcome::Stored);
        }

        // At capacity: the owner picks a slot to evict, or declines and
        // the fresh draw is gone. Never a silent eviction.
        let held = self.store.list_inventory(player_id)?;
        let mut choices: Vec<String> = held.iter().map(|i| i.id.to_string()).collect();
        choices.push("decline".to_string());
        let handle = self.sessions.open(
            player_id,
            FlowKind::ForcedReplacement,
            choices,
            "decline",
            Duration::seconds(self.timeouts.replacement_secs),
        )?;
        let resolution = self.sessions.await_resolution(handle).await?;
        if resolution.choice == "decline" {
            debug!("replacement declined: player={} drop discarded", player_id);
            return Ok(StoreOutcome::Discarded);
        }
        let evict_id = Uuid::parse_str(&resolution.choice)
            .map_err(|_| GameError::InvalidChoice(resolution.choice.clone()))?;
        let evicted = self.store.get_item(player_id, evict_id)?;
        self.store.remove_item(player_id, evict_id)?;
        self.store.put_item(player_id, item)?;
        Ok(StoreOutcome::Replaced { evicted })
    }

    /// Open (or ignore) a chest from the player's inventory through the
    /// interactive flow. Sealed chests need the golden key, which is
    /// always consumed on open.
    pub async fn open_chest(
        &self,
        player_id: &str,
        chest_id: Uuid,
    ) -> Result<ChestReport, GameError> {
        validate_player_id(player_id)?;
        let chest = self.store.get_item(player_id, chest_id)?;
        if chest.category != ItemCategory::Container {
            return Err(GameError::InvalidChoice(format!(
                "{} is not a container",
                chest.name
            )));
        }
        let modifiers = self.resolve_modifiers(player_id)?;

        let handle = self.sessions.open(
            player_id,
            FlowKind::ChestOpen,
            vec!["open".to_string(), "ignore".to_string()],
            "ignore",
            Duration::seconds(self.timeouts.chest_secs),
        )?;
        let resolution = self.sessions.await_resolution(handle).await?;
        if resolution.choice != "open" {
            // Ignored (or timed out): no loot, no key consumption, the
            // chest stays where it is.
            return Ok(ChestReport {
                opened: false,
                key_consumed: false,
                loot: None,
            });
        }

        let mut key_consumed = false;
        if chest.sealed {
            if !modifiers.golden_key {
                return Err(GameError::MissingKey);
            }
            self.consume_one(player_id, "llave_dorada")?;
            key_consumed = true;
        }

        let draw = {
            let mut rng = rand::thread_rng();
            reward::resolve_chest(chest.rarity, &modifiers, &mut rng)?
        };
        self.store.remove_item(player_id, chest_id)?;
        let mut loot = self.commit_draw(player_id, draw).await?;
        let mut player = self.store.get_or_create_player(player_id)?;
        player.award(loot.coins, 0);
        self.store.put_player(player.clone())?;
        loot.balance_after = player.balance;
        info!(
            "chest: player={} rarity={:?} sealed={} coins={}",
            player_id, chest.rarity, chest.sealed, loot.coins
        );
        Ok(ChestReport {
            opened: true,
            key_consumed,
            loot: Some(loot),
        })
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    /// Spawn a boss in a guild scope, gated on the spawner's cooldown.
    /// Any previous encounter in the scope is implicitly retired.
    pub fn spawn_boss(
        &self,
        spawner_id: &str,
        guild_id: &str,
        participants: Vec<String>,
    ) -> Result<EncounterRecord, GameError> {
        validate_player_id(spawner_id)?;
        let mut spawner = self.store.get_or_create_player(spawner_id)?;
        self.gate(&spawner, Activity::BossFight)?;
        let encounter = {
            let mut rng = rand::thread_rng();
            combat::spawn_boss(guild_id, participants, &mut rng)
        };
        self.store.put_encounter(encounter.clone())?;
        cooldown::commit(&mut spawner, Activity::BossFight, &self.schedule, Utc::now());
        self.store.put_player(spawner)?;
        Ok(encounter)
    }

    /// Open a clan war challenge (pending until accepted).
    pub fn start_clan_war(
        &self,
        initiator_id: &str,
        clan_a: &str,
        roster_a: Vec<String>,
        clan_b: &str,
        roster_b: Vec<String>,
    ) -> Result<EncounterRecord, GameError> {
        validate_player_id(initiator_id)?;
        validate_clan_pair(clan_a, clan_b)?;
        let mut initiator = self.store.get_or_create_player(initiator_id)?;
        self.gate(&initiator, Activity::ClanWar)?;
        let encounter = combat::start_clan_war(clan_a, roster_a, clan_b, roster_b);
        self.store.put_encounter(encounter.clone())?;
        cooldown::commit(&mut initiator, Activity::ClanWar, &self.schedule, Utc::now());
        self.store.put_player(initiator)?;
        Ok(encounter)
    }

    /// Accept a pending clan war, activating it.
    pub fn accept_clan_war(&self, scope: &str) -> Result<EncounterRecord, GameError> {
        let mut encounter = self.store.get_encounter(scope)?;
        combat::accept(&mut encounter)?;
        self.store.put_encounter(encounter.clone())?;
        Ok(encounter)
    }

    /// Resolve one attack in the scope's encounter. Boss attackers pick a
    /// weapon through the item-choice flow (default: bare hands); the
    /// chosen weapon wears down a little per swing. When the attack
    /// resolves the encounter, per-participant payouts are rolled and
    /// credited before the report returns.
    pub async fn resolve_combat_attack(
        &self,
        scope: &str,
        attacker_side: Side,
        attacker_id: &str,
    ) -> Result<CombatReport, GameError> {
        validate_player_id(attacker_id)?;
        let mut encounter = self.store.get_encounter(scope)?;

        let weapon = if matches!(encounter.kind, EncounterKind::Boss { .. })
            && attacker_side == Side::Challenger
        {
            self.pick_weapon(attacker_id).await?
        } else {
            None
        };

        let attack = {
            let mut rng = rand::thread_rng();
            combat::resolve_attack(&mut encounter, attacker_side, weapon.as_ref(), &mut rng)?
        };
        self.store.put_encounter(encounter.clone())?;

        if let Some(mut weapon) = weapon {
            weapon.wear(WEAPON_WEAR_PER_ATTACK);
            self.store.put_item(attacker_id, weapon)?;
        }

        let payouts = if matches!(attack.state, EncounterState::Resolved { .. }) {
            let payouts = {
                let mut rng = rand::thread_rng();
                combat::distribute_rewards(&encounter, &mut rng)?
            };
            for payout in &payouts {
                let mut player = self.store.get_or_create_player(&payout.player_id)?;
                player.award(payout.coins, payout.xp);
                self.store.put_player(player)?;
            }
            Some(payouts)
        } else {
            None
        };

        Ok(CombatReport { attack, payouts })
    }

    /// Offer the attacker's usable weapons; the timeout default is
    /// fighting bare-handed.
    async fn pick_weapon(&self, player_id: &str) -> Result<Option<ItemInstance>, GameError> {
        let weapons: Vec<ItemInstance> = self
            .store
            .list_inventory(player_id)?
            .into_iter()
            .filter(|i| i.category == ItemCategory::Weapon && i.durability > 0)
            .collect();
        if weapons.is_empty() {
            return Ok(None);
        }
        let mut choices: Vec<String> = weapons.iter().map(|w| w.id.to_string()).collect();
        choices.push("none".to_string());
        let handle = self.sessions.open(
            player_id,
            FlowKind::WeaponChoice,
            choices,
            "none",
            Duration::seconds(self.timeouts.weapon_secs),
        )?;
        let resolution = self.sessions.await_resolution(handle).await?;
        if resolution.choice == "none" {
            return Ok(None);
        }
        let chosen = Uuid::parse_str(&resolution.choice)
            .map_err(|_| GameError::InvalidChoice(resolution.choice.clone()))?;
        Ok(weapons.into_iter().find(|w| w.id == chosen))
    }

    // ------------------------------------------------------------------
    // Wagers
    // ------------------------------------------------------------------

    /// Run one closed-form wager: debit the stake, draw, settle, credit.
    pub fn resolve_wager(
        &self,
        player_id: &str,
        kind: WagerKind,
        stake: u64,
    ) -> Result<WagerReport, GameError> {
        validate_player_id(player_id)?;
        validate_stake(stake, &self.stake_rules)?;
        if let WagerKind::Roulette { number } = kind {
            validate_roulette_number(number)?;
        }
        let mut player = self.store.get_or_create_player(player_id)?;
        self.gate(&player, Activity::Wager)?;
        let modifiers = self.resolve_modifiers(player_id)?;
        player.debit(stake)?;

        let mut rng = rand::thread_rng();
        let (raw_payout, detail) = match kind {
            WagerKind::Coin { guess } => {
                let drawn = wager::draw_coin(&mut rng);
                let won = drawn == guess;
                (wager::settle_coin(stake, won), WagerDetail::Coin { drawn, won })
            }
            WagerKind::Roulette { number } => {
                let drawn = wager::draw_roulette(&mut rng);
                (
                    wager::settle_roulette(stake, number, drawn),
                    WagerDetail::Roulette {
                        chosen: number,
                        drawn,
                    },
                )
            }
            WagerKind::Slot => {
                let draw = wager::draw_slot(&mut rng)?;
                let (payout, result) = wager::settle_slot(stake, &draw);
                (
                    payout,
                    WagerDetail::Slot {
                        glyphs: [draw[0].glyph, draw[1].glyph, draw[2].glyph],
                        result,
                    },
                )
            }
        };

        let payout = wager::apply_double(raw_payout, &modifiers);
        if payout > raw_payout {
            self.consume_one(player_id, "amuleto_suerte")?;
        }
        player.balance = player.balance.saturating_add(payout);
        cooldown::commit(&mut player, Activity::Wager, &self.schedule, Utc::now());
        self.store.put_player(player.clone())?;
        debug!(
            "wager: player={} stake={} payout={} balance={}",
            player_id, stake, payout, player.balance
        );
        Ok(WagerReport {
            stake,
            payout,
            detail,
            balance_after: player.balance,
        })
    }

    /// Play a full blackjack hand. The stake is committed up front and is
    /// not rolled back on timeout; each turn runs through a hit/stand
    /// session whose timeout default is standing.
    pub async fn play_blackjack(
        &self,
        player_id: &str,
        stake: u64,
    ) -> Result<BlackjackReport, GameError> {
        validate_player_id(player_id)?;
        validate_stake(stake, &self.stake_rules)?;
        let mut player = self.store.get_or_create_player(player_id)?;
        self.gate(&player, Activity::Wager)?;
        let modifiers = self.resolve_modifiers(player_id)?;
        player.debit(stake)?;
        cooldown::commit(&mut player, Activity::Wager, &self.schedule, Utc::now());
        self.store.put_player(player.clone())?;

        let mut hand = {
            let mut rng = rand::thread_rng();
            BlackjackHand::deal(stake, &modifiers, &mut rng)
        };

        while hand.settled().is_none() {
            let handle = self.sessions.open(
                player_id,
                FlowKind::Blackjack,
                vec!["hit".to_string(), "stand".to_string()],
                "stand",
                Duration::seconds(self.timeouts.blackjack_secs),
            )?;
            let resolution = self.sessions.await_resolution(handle).await?;
            let mut rng = rand::thread_rng();
            match resolution.choice.as_str() {
                "hit" => {
                    hand.hit(&mut rng)?;
                }
                _ => {
                    hand.stand(&modifiers, &mut rng)?;
                }
            }
        }

        let settlement = hand.settled().expect("hand settled by loop exit");
        if settlement.outcome == super::blackjack::HandOutcome::Natural && modifiers.dance {
            self.consume_one(player_id, "zapatos_baile")?;
        }
        if modifiers.double_winnings && settlement.payout > stake {
            self.consume_one(player_id, "amuleto_suerte")?;
        }
        let mut player = self.store.get_player(player_id)?;
        player.balance = player.balance.saturating_add(settlement.payout);
        self.store.put_player(player.clone())?;
        info!(
            "blackjack: player={} stake={} outcome={:?} payout={}",
            player_id, stake, settlement.outcome, settlement.payout
        );
        Ok(BlackjackReport {
            hand,
            settlement,
            balance_after: player.balance,
        })
    }

    // ------------------------------------------------------------------
    // Sessions (pass-through for the dispatcher)
    // ------------------------------------------------------------------

    /// Open an ad-hoc session on behalf of the dispatcher.
    pub fn start_session(
        &self,
        owner: &str,
        kind: FlowKind,
        choices: Vec<String>,
        default_choice: &str,
        timeout_secs: i64,
    ) -> Result<SessionHandle, GameError> {
        self.sessions.open(
            owner,
            kind,
            choices,
            default_choice,
            Duration::seconds(timeout_secs),
        )
    }

    /// Route one raw input event to a session.
    pub fn submit_choice(
        &self,
        handle: SessionHandle,
        actor: &str,
        choice: &str,
    ) -> Result<SubmitOutcome, GameError> {
        self.sessions.submit(handle, actor, choice)
    }

    /// Wait for a session's resolution (owner input or timeout default).
    pub async fn await_choice(&self, handle: SessionHandle) -> Result<Resolution, GameError> {
        self.sessions.await_resolution(handle).await
    }

    /// Resolve every overdue session to its default. Returns the count.
    pub fn sweep_sessions(&self) -> usize {
        self.sessions.sweep_expired(Utc::now())
    }

    // ------------------------------------------------------------------
    // Administration
    // ------------------------------------------------------------------

    /// Sysop balance grant. Returns the new balance.
    pub fn grant(&self, player_id: &str, coins: u64) -> Result<u64, GameError> {
        validate_player_id(player_id)?;
        let mut player = self.store.get_or_create_player(player_id)?;
        player.award(coins, 0);
        self.store.put_player(player.clone())?;
        info!("grant: player={} coins={}", player_id, coins);
        Ok(player.balance)
    }

    /// Hand a player a catalog item directly (admin / shop hook).
    pub fn grant_item(&self, player_id: &str, item_id: &str) -> Result<ItemInstance, GameError> {
        validate_player_id(player_id)?;
        if self.store.inventory_count(player_id)? >= INVENTORY_CAPACITY {
            return Err(GameError::InventoryFull {
                capacity: INVENTORY_CAPACITY,
            });
        }
        let item = {
            let mut rng = rand::thread_rng();
            reward::mint_item(item_id, &mut rng)?
        };
        self.store.put_item(player_id, item.clone())?;
        Ok(item)
    }

    /// Repair an item back to full durability for a coin cost.
    pub fn repair_item(&self, player_id: &str, item_id: Uuid, cost: u64) -> Result<(), GameError> {
        let mut player = self.store.get_player(player_id)?;
        let mut item = self.store.get_item(player_id, item_id)?;
        player.debit(cost)?;
        item.repair();
        self.store.put_item(player_id, item)?;
        self.store.put_player(player)?;
        Ok(())
    }
}

enum StoreOutcome {
    Stored,
    Replaced { evicted: ItemInstance },
    Discarded,
}
