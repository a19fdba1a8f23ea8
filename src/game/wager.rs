//! Closed-form wager settlement: coin flip, roulette, slots.
//!
//! Every game splits into a sampling step and a pure settle function
//! `(stake, draw) -> payout`, so payouts are deterministic given the draw
//! and directly testable. Stakes are debited up front by the action
//! envelope; the payout returned here is the total credited back.

use rand::Rng;

use super::catalog::{SlotSymbol, SLOT_SYMBOLS};
use super::errors::GameError;
use super::table::WeightedTable;
use super::types::ModifierSet;

/// The two faces of the coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinFace {
    Cara,
    Cruz,
}

/// Roulette numbers run 1..=36.
pub const ROULETTE_MAX: u8 = 36;

/// A sampled slot draw: three independent symbol picks.
pub type SlotDraw = [&'static SlotSymbol; 3];

/// How a slot draw paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotResult {
    ThreeOfAKind,
    Pair,
    NoMatch,
}

/// Flip the coin.
pub fn draw_coin<R: Rng + ?Sized>(rng: &mut R) -> CoinFace {
    if rng.gen_bool(0.5) {
        CoinFace::Cara
    } else {
        CoinFace::Cruz
    }
}

/// Spin the roulette wheel: uniform 1..=36.
pub fn draw_roulette<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=ROULETTE_MAX)
}

/// Pull the slot lever: three independent weighted symbol draws.
pub fn draw_slot<R: Rng + ?Sized>(rng: &mut R) -> Result<SlotDraw, GameError> {
    let table = WeightedTable::new(SLOT_SYMBOLS.iter().map(|s| (s, s.weight)).collect())?;
    Ok([
        *table.sample(rng),
        *table.sample(rng),
        *table.sample(rng),
    ])
}

/// Coin flip: a win pays double the stake, a loss pays nothing.
pub fn settle_coin(stake: u64, won: bool) -> u64 {
    if won {
        stake.saturating_mul(2)
    } else {
        0
    }
}

/// Roulette: an exact match pays 36× the stake.
pub fn settle_roulette(stake: u64, chosen: u8, drawn: u8) -> u64 {
    if chosen == drawn {
        stake.saturating_mul(36)
    } else {
        0
    }
}

/// Slots: three of a kind pays `stake × multiplier × 20`, a pair pays
/// `stake × pair multiplier × 5`, anything else pays nothing.
pub fn settle_slot(stake: u64, draw: &SlotDraw) -> (u64, SlotResult) {
    let [a, b, c] = draw;
    if a.glyph == b.glyph && b.glyph == c.glyph {
        return (stake.saturating_mul(a.multiplier).saturating_mul(20), SlotResult::ThreeOfAKind);
    }
    let pair = if a.glyph == b.glyph || a.glyph == c.glyph {
        Some(a)
    } else if b.glyph == c.glyph {
        Some(b)
    } else {
        None
    };
    match pair {
        Some(symbol) => (
            stake.saturating_mul(symbol.multiplier).saturating_mul(5),
            SlotResult::Pair,
        ),
        None => (0, SlotResult::NoMatch),
    }
}

/// The "double winnings" consumable doubles positive payouts and never
/// touches a loss.
pub fn apply_double(payout: u64, modifiers: &ModifierSet) -> u64 {
    if modifiers.double_winnings && payout > 0 {
        payout.saturating_mul(2)
    } else {
        payout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn symbol(glyph: &str) -> &'static SlotSymbol {
        SLOT_SYMBOLS.iter().find(|s| s.glyph == glyph).unwrap()
    }

    #[test]
    fn coin_pays_double_on_win() {
        assert_eq!(settle_coin(100, true), 200);
        assert_eq!(settle_coin(100, false), 0);
    }

    #[test]
    fn roulette_exact_match_pays_36x() {
        assert_eq!(settle_roulette(50, 7, 7), 1800);
        assert_eq!(settle_roulette(50, 7, 8), 0);
    }

    #[test]
    fn slot_three_of_common_pays_20x() {
        let draw = [symbol("⚪"), symbol("⚪"), symbol("⚪")];
        let (payout, result) = settle_slot(100, &draw);
        assert_eq!(payout, 2_000);
        assert_eq!(result, SlotResult::ThreeOfAKind);
    }

    #[test]
    fn slot_pair_of_master_pays_multiplier_times_5() {
        let draw = [symbol("💎"), symbol("💎"), symbol("⚪")];
        let (payout, result) = settle_slot(100, &draw);
        assert_eq!(payout, 5_000);
        assert_eq!(result, SlotResult::Pair);
    }

    #[test]
    fn slot_pair_uses_the_matching_pairs_multiplier() {
        // ⚪💎💎: the pair is diamonds, not the stray common.
        let draw = [symbol("⚪"), symbol("💎"), symbol("💎")];
        let (payout, result) = settle_slot(100, &draw);
        assert_eq!(payout, 5_000);
        assert_eq!(result, SlotResult::Pair);

        // Split pair across first and third positions.
        let draw = [symbol("🟡"), symbol("⚪"), symbol("🟡")];
        let (payout, _) = settle_slot(10, &draw);
        assert_eq!(payout, 10 * 5 * 5);
    }

    #[test]
    fn slot_no_match_pays_nothing() {
        let draw = [symbol("⚪"), symbol("🔵"), symbol("🟣")];
        let (payout, result) = settle_slot(100, &draw);
        assert_eq!(payout, 0);
        assert_eq!(result, SlotResult::NoMatch);
    }

    #[test]
    fn double_winnings_doubles_wins_only() {
        let doubled = ModifierSet {
            double_winnings: true,
            ..Default::default()
        };
        assert_eq!(apply_double(200, &doubled), 400);
        assert_eq!(apply_double(0, &doubled), 0);
        assert_eq!(apply_double(200, &ModifierSet::default()), 200);
    }

    #[test]
    fn roulette_draw_stays_on_the_wheel() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1_000 {
            let drawn = draw_roulette(&mut rng);
            assert!((1..=ROULETTE_MAX).contains(&drawn));
        }
    }

    #[test]
    fn coin_draw_is_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(2);
        let n = 20_000;
        let heads = (0..n)
            .filter(|_| draw_coin(&mut rng) == CoinFace::Cara)
            .count();
        let share = heads as f64 / n as f64;
        assert!((share - 0.5).abs() < 0.02, "share was {}", share);
    }

    #[test]
    fn slot_draw_favors_common_symbols() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut common = 0u32;
        let mut master = 0u32;
        for _ in 0..10_000 {
            for s in draw_slot(&mut rng).unwrap() {
                match s.glyph {
                    "⚪" => common += 1,
                    "💎" => master += 1,
                    _ => {}
                }
            }
        }
        assert!(common > master * 4);
    }
}
