//! Argument validation for dispatcher-supplied values.
//!
//! The command dispatcher is expected to validate stakes and targets
//! before calling in, but the engine re-defends the same invariants
//! rather than trusting the caller blindly.

use crate::game::wager::ROULETTE_MAX;

/// Validation failures with dispatcher-facing messages.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("stake must be greater than zero")]
    ZeroStake,

    #[error("stake {stake} exceeds the table limit of {max}")]
    StakeTooLarge { stake: u64, max: u64 },

    #[error("roulette number must be between 1 and {max}, got {got}")]
    RouletteNumberOutOfRange { got: u8, max: u8 },

    #[error("player id cannot be empty")]
    EmptyPlayerId,

    #[error("player id is too long (maximum {max} characters)")]
    PlayerIdTooLong { max: usize },

    #[error("clan cannot war against itself")]
    SelfWar,
}

/// Stake limits for the wager surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakeRules {
    pub max_stake: u64,
}

impl Default for StakeRules {
    fn default() -> Self {
        // High enough that legitimate whales never hit it; low enough to
        // stop fat-fingered and overflow-fishing stakes.
        Self { max_stake: 1_000_000 }
    }
}

/// A stake must be positive and under the table limit.
pub fn validate_stake(stake: u64, rules: &StakeRules) -> Result<(), ValidationError> {
    if stake == 0 {
        return Err(ValidationError::ZeroStake);
    }
    if stake > rules.max_stake {
        return Err(ValidationError::StakeTooLarge {
            stake,
            max: rules.max_stake,
        });
    }
    Ok(())
}

/// Roulette only takes numbers on the wheel.
pub fn validate_roulette_number(number: u8) -> Result<(), ValidationError> {
    if number == 0 || number > ROULETTE_MAX {
        return Err(ValidationError::RouletteNumberOutOfRange {
            got: number,
            max: ROULETTE_MAX,
        });
    }
    Ok(())
}

const MAX_PLAYER_ID_LEN: usize = 64;

/// Player ids come from the chat platform and are treated as opaque, but
/// an empty or absurdly long id is a dispatcher bug worth rejecting.
pub fn validate_player_id(player_id: &str) -> Result<(), ValidationError> {
    if player_id.trim().is_empty() {
        return Err(ValidationError::EmptyPlayerId);
    }
    if player_id.len() > MAX_PLAYER_ID_LEN {
        return Err(ValidationError::PlayerIdTooLong {
            max: MAX_PLAYER_ID_LEN,
        });
    }
    Ok(())
}

/// Two clans are needed for a war.
pub fn validate_clan_pair(clan_a: &str, clan_b: &str) -> Result<(), ValidationError> {
    if clan_a == clan_b {
        return Err(ValidationError::SelfWar);
    }
    Ok(())
}
