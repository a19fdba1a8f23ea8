//! Test utilities & fixtures.
//! Builds throwaway engines over tempdir-backed stores. Tests own the
//! returned `TempDir`; dropping it tears the store down.

use grindbot::game::{CooldownSchedule, GameEngine, GameStoreBuilder, SessionTimeouts};
use tempfile::TempDir;

/// Engine with production-like defaults over a throwaway store.
pub fn engine() -> (GameEngine, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path()).open().expect("store");
    (GameEngine::new(store), dir)
}

/// Engine with zero cooldowns and instant session timeouts, for tests
/// that loop activities or rely on timeout defaults.
#[allow(dead_code)] // Not every suite drives loops; silenced per-suite.
pub fn fast_engine() -> (GameEngine, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path()).open().expect("store");
    let engine = GameEngine::new(store)
        .with_schedule(CooldownSchedule {
            explore_secs: 0,
            mine_secs: 0,
            fish_secs: 0,
            work_secs: 0,
            boss_fight_secs: 0,
            clan_war_secs: 0,
            wager_secs: 0,
        })
        .with_timeouts(SessionTimeouts {
            chest_secs: 0,
            replacement_secs: 0,
            weapon_secs: 0,
            blackjack_secs: 0,
        });
    (engine, dir)
}

/// Engine with zero cooldowns but real (short) session timeouts, for
/// tests that submit choices from a second task.
#[allow(dead_code)]
pub fn interactive_engine() -> (GameEngine, TempDir) {
    let dir = TempDir::new().expect("tempdir");
    let store = GameStoreBuilder::new(dir.path()).open().expect("store");
    let engine = GameEngine::new(store)
        .with_schedule(CooldownSchedule {
            explore_secs: 0,
            mine_secs: 0,
            fish_secs: 0,
            work_secs: 0,
            boss_fight_secs: 0,
            clan_war_secs: 0,
            wager_secs: 0,
        })
        .with_timeouts(SessionTimeouts {
            chest_secs: 5,
            replacement_secs: 5,
            weapon_secs: 5,
            blackjack_secs: 5,
        });
    (engine, dir)
}
