//! The cooldown gate every player action passes through first.
//!
//! One absolute "available again at" instant per (player, activity) pair,
//! stored on the player record. Checking never mutates; committing is a
//! separate step the action envelope runs only after a permitted action
//! actually resolved.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Activity, PlayerRecord};

/// Per-activity cooldown durations, in seconds. Exploration-class actions
/// sit in the tens of seconds, combat and work in the minutes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CooldownSchedule {
    pub explore_secs: u32,
    pub mine_secs: u32,
    pub fish_secs: u32,
    pub work_secs: u32,
    pub boss_fight_secs: u32,
    pub clan_war_secs: u32,
    pub wager_secs: u32,
}

impl Default for CooldownSchedule {
    fn default() -> Self {
        Self {
            explore_secs: 30,
            mine_secs: 45,
            fish_secs: 60,
            work_secs: 300,
            boss_fight_secs: 180,
            clan_war_secs: 600,
            wager_secs: 15,
        }
    }
}

impl CooldownSchedule {
    pub fn duration(&self, activity: Activity) -> Duration {
        let secs = match activity {
            Activity::Explore => self.explore_secs,
            Activity::Mine => self.mine_secs,
            Activity::Fish => self.fish_secs,
            Activity::Work => self.work_secs,
            Activity::BossFight => self.boss_fight_secs,
            Activity::ClanWar => self.clan_war_secs,
            Activity::Wager => self.wager_secs,
        };
        Duration::seconds(i64::from(secs))
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownStatus {
    Allowed,
    /// Denied; retry after this much time.
    Cooling { remaining: Duration },
}

impl CooldownStatus {
    pub fn is_allowed(&self) -> bool {
        matches!(self, CooldownStatus::Allowed)
    }

    pub fn remaining(&self) -> Duration {
        match self {
            CooldownStatus::Allowed => Duration::zero(),
            CooldownStatus::Cooling { remaining } => *remaining,
        }
    }
}

/// Check whether `player` may run `activity` at `now`. Pure read: calling
/// this any number of times never changes the stored instant.
pub fn may_act(player: &PlayerRecord, activity: Activity, now: DateTime<Utc>) -> CooldownStatus {
    match player.cooldowns.get(activity.name()) {
        Some(available_at) if *available_at > now => CooldownStatus::Cooling {
            remaining: available_at.signed_duration_since(now),
        },
        _ => CooldownStatus::Allowed,
    }
}

/// Advance the stored instant to `now + duration(activity)`. Run only
/// after the gated action resolved.
pub fn commit(
    player: &mut PlayerRecord,
    activity: Activity,
    schedule: &CooldownSchedule,
    now: DateTime<Utc>,
) {
    player
        .cooldowns
        .insert(activity.name().to_string(), now + schedule.duration(activity));
}
