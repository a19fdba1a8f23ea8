//! Game resolution core: reward, combat, and wager resolvers behind the
//! cooldown-gated action envelope, with sled-backed persistence and an
//! owner-scoped interactive session registry.

pub mod actions;
pub mod blackjack;
pub mod catalog;
pub mod combat;
pub mod cooldown;
pub mod errors;
pub mod reward;
pub mod session;
pub mod storage;
pub mod table;
pub mod types;
pub mod wager;

pub use actions::{
    BlackjackReport, ChestReport, CombatReport, GameEngine, RewardReport, SessionTimeouts,
    WagerDetail, WagerKind, WagerReport,
};
pub use blackjack::{BlackjackHand, HandOutcome, Settlement, DEALER_STAND};
pub use catalog::{item_def, ItemDef, RewardOutcome};
pub use combat::{
    accept, clan_scope, distribute_rewards, resolve_attack, spawn_boss, start_clan_war,
    AttackReport, Payout,
};
pub use cooldown::{commit as commit_cooldown, may_act, CooldownSchedule, CooldownStatus};
pub use errors::GameError;
pub use reward::{resolve_activity, resolve_chest, work_pay, RewardDraw};
pub use session::{
    FlowKind, Resolution, SessionHandle, SessionRegistry, SubmitOutcome,
};
pub use storage::{GameStore, GameStoreBuilder};
pub use table::{pick_independent, WeightedTable};
pub use types::*;
pub use wager::{
    draw_coin, draw_roulette, draw_slot, settle_coin, settle_roulette, settle_slot, CoinFace,
    SlotResult,
};
