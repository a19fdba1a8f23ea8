//! # Grindbot - Game Engine for Chat-Platform Economy Bots
//!
//! Grindbot is the resolution core of a chat-platform game bot: a virtual
//! economy with gathering activities, gambling minigames, an inventory and
//! loot system, boss encounters, and clan-vs-clan battles. The chat
//! transport and command grammar live in an external dispatcher; this crate
//! owns the rules.
//!
//! ## Features
//!
//! - **Cooldown-Gated Actions**: every player action passes a per-activity
//!   gate first; denials report the remaining wait and mutate nothing.
//! - **Weighted Loot Tables**: one probability primitive behind every
//!   reward surface, with tool-tier weight scaling and sealed containers.
//! - **Turn-Based Combat**: boss fights and clan wars with hit/critical
//!   rolls, damage reduction, full blocks, reflect, and regeneration.
//! - **Wager Games**: coin flip, roulette, slots, and stateful blackjack
//!   with consumable payout modifiers.
//! - **Interactive Sessions**: owner-scoped pending choices (open a chest,
//!   pick a weapon, hit or stand) with timeout defaults.
//! - **Persistence**: sled-backed player ledgers, inventories, and
//!   encounter state with schema-versioned records.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grindbot::game::{Activity, GameEngine, GameStoreBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = GameStoreBuilder::new("data/game").open()?;
//!     let engine = GameEngine::new(store);
//!
//!     let report = engine.resolve_reward("node_456", Activity::Explore).await?;
//!     println!("found {} item(s), {} coins", report.stored.len(), report.coins);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`game`] - The resolution core: resolvers, cooldown gate, sessions, storage
//! - [`config`] - Configuration management and validation
//! - [`validation`] - Argument validation the engine re-defends
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   Dispatcher    │ ← External: chat transport, command parsing
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameEngine    │ ← Cooldown gate + resolvers + sessions
//! └─────────────────┘
//!          │
//! ┌─────────────────┐
//! │   GameStore     │ ← Sled persistence
//! └─────────────────┘
//! ```

pub mod config;
pub mod game;
pub mod validation;
