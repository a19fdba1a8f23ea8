//! Blackjack: the one stateful wager.
//!
//! The stake is debited when the hand is dealt and is already forfeit if
//! the player busts; the dealer only plays after the player stands. Hand
//! totals use soft aces (11 downgraded to 1 while over 21).

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::errors::GameError;
use super::types::ModifierSet;

/// Dealer draws until reaching this total.
pub const DEALER_STAND: u8 = 17;
/// Natural-21 bonus multiplier on the stake, on top of stake return.
pub const NATURAL_BONUS: f64 = 1.5;
/// Extra on the natural bonus while the dance consumable is held.
pub const DANCE_BONUS: f64 = 0.15;

/// How a hand ended.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandOutcome {
    Natural,
    PlayerWin,
    DealerWin,
    Push,
    Bust,
}

/// Terminal settlement: outcome plus the total credited back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub outcome: HandOutcome,
    pub payout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum HandState {
    PlayerTurn,
    Settled(Settlement),
}

/// One live blackjack hand. Cards are ranks 1..=13; court cards count 10.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlackjackHand {
    pub stake: u64,
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
    pub state: HandState,
}

fn draw_card<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(1..=13)
}

/// Best total for a set of cards: aces count 11, stepping down to 1 one at
/// a time while the total is over 21.
pub fn hand_total(cards: &[u8]) -> u8 {
    let mut total: u32 = 0;
    let mut soft_aces = 0;
    for &card in cards {
        if card == 1 {
            total += 11;
            soft_aces += 1;
        } else {
            total += u32::from(card.min(10));
        }
    }
    while total > 21 && soft_aces > 0 {
        total -= 10;
        soft_aces -= 1;
    }
    total.min(u8::MAX as u32) as u8
}

impl BlackjackHand {
    /// Deal a fresh hand. A natural 21 on the first two cards settles
    /// immediately with the bonus payout.
    pub fn deal<R: Rng + ?Sized>(stake: u64, modifiers: &ModifierSet, rng: &mut R) -> Self {
        let player = vec![draw_card(rng), draw_card(rng)];
        let dealer = vec![draw_card(rng), draw_card(rng)];
        let mut hand = Self {
            stake,
            player,
            dealer,
            state: HandState::PlayerTurn,
        };
        if hand_total(&hand.player) == 21 {
            let settlement = hand.settle_natural(modifiers);
            hand.state = HandState::Settled(settlement);
        }
        hand
    }

    pub fn player_total(&self) -> u8 {
        hand_total(&self.player)
    }

    pub fn dealer_total(&self) -> u8 {
        hand_total(&self.dealer)
    }

    pub fn settled(&self) -> Option<Settlement> {
        match &self.state {
            HandState::Settled(s) => Some(*s),
            HandState::PlayerTurn => None,
        }
    }

    fn require_player_turn(&self) -> Result<(), GameError> {
        match self.state {
            HandState::PlayerTurn => Ok(()),
            HandState::Settled(_) => Err(GameError::InvalidChoice(
                "hand already settled".to_string(),
            )),
        }
    }

    /// Take another card. Going over 21 forfeits the stake immediately;
    /// the dealer never plays.
    pub fn hit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<u8, GameError> {
        self.require_player_turn()?;
        self.player.push(draw_card(rng));
        let total = self.player_total();
        if total > 21 {
            self.state = HandState::Settled(Settlement {
                outcome: HandOutcome::Bust,
                payout: 0,
            });
        }
        Ok(total)
    }

    /// Stand: the dealer draws to [`DEALER_STAND`], then totals compare.
    pub fn stand<R: Rng + ?Sized>(
        &mut self,
        modifiers: &ModifierSet,
        rng: &mut R,
    ) -> Result<Settlement, GameError> {
        self.require_player_turn()?;
        while self.dealer_total() < DEALER_STAND {
            self.dealer.push(draw_card(rng));
        }
        let settlement = self.compare_totals(modifiers);
        self.state = HandState::Settled(settlement);
        Ok(settlement)
    }

    fn settle_natural(&self, modifiers: &ModifierSet) -> Settlement {
        let mut bonus = self.stake as f64 * NATURAL_BONUS;
        if modifiers.dance {
            bonus *= 1.0 + DANCE_BONUS;
        }
        let payout = super::wager::apply_double(
            self.stake.saturating_add(bonus.floor() as u64),
            modifiers,
        );
        Settlement {
            outcome: HandOutcome::Natural,
            payout,
        }
    }

    fn compare_totals(&self, modifiers: &ModifierSet) -> Settlement {
        let player = self.player_total();
        let dealer = self.dealer_total();
        if dealer > 21 || player > dealer {
            Settlement {
                outcome: HandOutcome::PlayerWin,
                payout: super::wager::apply_double(self.stake.saturating_mul(2), modifiers),
            }
        } else if player == dealer {
            // Push returns the stake untouched; it is not a win, so the
            // doubling consumable does not apply.
            Settlement {
                outcome: HandOutcome::Push,
                payout: self.stake,
            }
        } else {
            Settlement {
                outcome: HandOutcome::DealerWin,
                payout: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hand(stake: u64, player: Vec<u8>, dealer: Vec<u8>) -> BlackjackHand {
        BlackjackHand {
            stake,
            player,
            dealer,
            state: HandState::PlayerTurn,
        }
    }

    #[test]
    fn totals_handle_soft_aces() {
        assert_eq!(hand_total(&[1, 10]), 21);
        assert_eq!(hand_total(&[1, 1, 9]), 21);
        assert_eq!(hand_total(&[1, 5]), 16);
        assert_eq!(hand_total(&[1, 5, 10]), 16);
        assert_eq!(hand_total(&[13, 12, 5]), 25);
    }

    #[test]
    fn court_cards_count_ten() {
        assert_eq!(hand_total(&[11, 12]), 20);
        assert_eq!(hand_total(&[13, 13, 2]), 22);
    }

    #[test]
    fn dealer_draws_to_stand_threshold() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..300 {
            let mut h = hand(100, vec![10, 8], vec![2, 3]);
            let settlement = h.stand(&ModifierSet::default(), &mut rng).expect("stand");
            assert!(h.dealer_total() >= DEALER_STAND);
            // Whatever happened, the hand is terminal now.
            assert_eq!(h.settled(), Some(settlement));
            assert!(h.stand(&ModifierSet::default(), &mut rng).is_err());
            assert!(h.hit(&mut rng).is_err());
        }
    }

    #[test]
    fn player_win_pays_double_stake() {
        let mut h = hand(100, vec![10, 10], vec![10, 7]);
        // Dealer already at 17: no draws, totals compare directly.
        let mut rng = StdRng::seed_from_u64(2);
        let settlement = h.stand(&ModifierSet::default(), &mut rng).expect("stand");
        assert_eq!(settlement.outcome, HandOutcome::PlayerWin);
        assert_eq!(settlement.payout, 200);
    }

    #[test]
    fn push_returns_stake_without_doubling() {
        let doubled = ModifierSet {
            double_winnings: true,
            ..Default::default()
        };
        let mut h = hand(100, vec![10, 7], vec![10, 7]);
        let mut rng = StdRng::seed_from_u64(3);
        let settlement = h.stand(&doubled, &mut rng).expect("stand");
        assert_eq!(settlement.outcome, HandOutcome::Push);
        assert_eq!(settlement.payout, 100);
    }

    #[test]
    fn dealer_win_forfeits_stake() {
        let mut h = hand(100, vec![10, 6], vec![10, 8]);
        let mut rng = StdRng::seed_from_u64(4);
        let settlement = h.stand(&ModifierSet::default(), &mut rng).expect("stand");
        assert_eq!(settlement.outcome, HandOutcome::DealerWin);
        assert_eq!(settlement.payout, 0);
    }

    #[test]
    fn bust_settles_immediately_without_dealer_play() {
        let mut rng = StdRng::seed_from_u64(5);
        loop {
            let mut h = hand(100, vec![10, 9], vec![2, 2]);
            let total = h.hit(&mut rng).expect("hit");
            if total > 21 {
                let settlement = h.settled().expect("settled");
                assert_eq!(settlement.outcome, HandOutcome::Bust);
                assert_eq!(settlement.payout, 0);
                // Dealer never drew.
                assert_eq!(h.dealer.len(), 2);
                break;
            }
        }
    }

    #[test]
    fn natural_pays_bonus_on_top_of_stake() {
        let h = hand(200, vec![1, 10], vec![5, 9]);
        let settlement = h.settle_natural(&ModifierSet::default());
        assert_eq!(settlement.outcome, HandOutcome::Natural);
        // 200 back + floor(200 * 1.5) bonus.
        assert_eq!(settlement.payout, 500);
    }

    #[test]
    fn dance_consumable_boosts_the_natural_bonus() {
        let dance = ModifierSet {
            dance: true,
            ..Default::default()
        };
        let h = hand(200, vec![1, 10], vec![5, 9]);
        let settlement = h.settle_natural(&dance);
        // 200 back + floor(200 * 1.5 * 1.15) = 200 + 345.
        assert_eq!(settlement.payout, 545);
    }

    #[test]
    fn double_winnings_applies_to_natural_and_regular_wins() {
        let doubled = ModifierSet {
            double_winnings: true,
            ..Default::default()
        };
        let h = hand(200, vec![1, 10], vec![5, 9]);
        assert_eq!(h.settle_natural(&doubled).payout, 1_000);

        let mut h = hand(100, vec![10, 10], vec![10, 7]);
        let mut rng = StdRng::seed_from_u64(6);
        let settlement = h.stand(&doubled, &mut rng).expect("stand");
        assert_eq!(settlement.payout, 400);
    }

    #[test]
    fn dealt_natural_settles_at_deal_time() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen_natural = false;
        for _ in 0..2_000 {
            let h = BlackjackHand::deal(50, &ModifierSet::default(), &mut rng);
            if h.player_total() == 21 && h.player.len() == 2 {
                let settlement = h.settled().expect("natural settles at deal");
                assert_eq!(settlement.outcome, HandOutcome::Natural);
                seen_natural = true;
            }
        }
        assert!(seen_natural, "no natural in 2000 deals is implausible");
    }
}
