//! No-limit Texas Hold'em on a persistent table.
//!
//! Chip stacks carry from hand to hand; the button rotates each hand.
//! There are no side pots: an all-in player contests the whole pot,
//! which matches the casual-table rules this engine is built for.

use parlor_protocol::PlayerId;
use parlor_room::{GameRng, TableConfig, TableGame};
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck};
use crate::eval::{HandRank, best_five_from_seven};

// ---------------------------------------------------------------------------
// Engine types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HoldemConfig {
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
}

impl Default for HoldemConfig {
    fn default() -> Self {
        Self {
            starting_stack: 100,
            small_blind: 1,
            big_blind: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldemPhase {
    Preflop,
    Flop,
    Turn,
    River,
    /// The hand is resolved and the result is on display. Host deals
    /// the next hand.
    Showdown,
    /// One player holds all the chips.
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoldemAction {
    Fold,
    /// Pass without betting. Legal only when nothing is owed.
    Check,
    /// Match the current bet, going all-in if short.
    Call,
    /// Raise the bet-to-call to `to`. Must be at least a big blind above
    /// the current bet, unless the raiser is all-in below that.
    Raise { to: u32 },
    /// Host deals the next hand after a showdown.
    NextHand,
}

/// One seat's chips and hand-local flags.
#[derive(Debug, Clone, PartialEq)]
struct PokerSeat {
    stack: u32,
    hole: Vec<Card>,
    folded: bool,
    all_in: bool,
    bet_this_round: u32,
    /// Has acted since the last raise in this betting round. Posting a
    /// blind does not count as acting.
    acted: bool,
    /// Busted before this hand was dealt.
    sitting_out: bool,
}

/// A revealed hand at showdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowdownHand {
    pub seat: usize,
    pub hole: Vec<Card>,
    pub rank: HandRank,
}

/// How the pot was awarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    /// Winning seats with the amount each collected. A split pot's odd
    /// chips go to the earliest seats.
    pub payouts: Vec<(usize, u32)>,
    /// Revealed hands, absent when everyone else folded.
    pub showdown: Option<Vec<ShowdownHand>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoldemState {
    phase: HoldemPhase,
    seats: Vec<PokerSeat>,
    deck: Deck,
    community: Vec<Card>,
    pot: u32,
    bet_to_call: u32,
    turn: usize,
    button: usize,
    hand_no: u32,
    small_blind: u32,
    big_blind: u32,
    result: Option<HandResult>,
}

impl HoldemState {
    fn active_count(&self) -> usize {
        self.seats.iter().filter(|s| s.stack > 0).count()
    }

    fn contenders(&self) -> Vec<usize> {
        (0..self.seats.len())
            .filter(|&i| !self.seats[i].folded && !self.seats[i].sitting_out)
            .collect()
    }

    /// Seats that can still put chips in voluntarily.
    fn actionable_count(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| !s.folded && !s.all_in && !s.sitting_out)
            .count()
    }

    fn next_active(&self, from: usize) -> usize {
        let n = self.seats.len();
        let mut seat = (from + 1) % n;
        while self.seats[seat].stack == 0 && !self.seats[seat].all_in {
            seat = (seat + 1) % n;
        }
        seat
    }

    /// Finds the next seat that still owes action, scanning cyclically
    /// from `start`.
    fn find_pending(&self, start: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n).map(|i| (start + i) % n).find(|&seat| {
            let s = &self.seats[seat];
            !s.folded
                && !s.all_in
                && !s.sitting_out
                && (!s.acted || s.bet_this_round < self.bet_to_call)
        })
    }

    /// Moves chips from a seat into the pot, capped at the stack.
    fn commit(&mut self, seat: usize, amount: u32) {
        let pay = amount.min(self.seats[seat].stack);
        self.seats[seat].stack -= pay;
        self.seats[seat].bet_this_round += pay;
        self.pot += pay;
        if self.seats[seat].stack == 0 {
            self.seats[seat].all_in = true;
        }
    }

    fn begin_hand(&mut self, rng: &mut GameRng) {
        if self.active_count() <= 1 {
            self.phase = HoldemPhase::GameOver;
            return;
        }

        for seat in &mut self.seats {
            seat.sitting_out = seat.stack == 0;
            seat.folded = seat.sitting_out;
            seat.all_in = false;
            seat.bet_this_round = 0;
            seat.acted = false;
            seat.hole.clear();
        }

        self.button = if self.hand_no == 0 {
            self.next_active(self.seats.len() - 1)
        } else {
            self.next_active(self.button)
        };
        self.hand_no += 1;

        self.deck = Deck::shuffled(rng);
        for i in 0..self.seats.len() {
            if !self.seats[i].sitting_out {
                self.seats[i].hole = self.deck.deal(2);
            }
        }
        self.community.clear();
        self.pot = 0;
        self.result = None;

        // Heads-up the button posts the small blind and acts first
        // preflop; otherwise blinds sit left of the button and action
        // starts under the gun.
        let heads_up = self.active_count() == 2;
        let (sb, bb) = if heads_up {
            (self.button, self.next_active(self.button))
        } else {
            let sb = self.next_active(self.button);
            (sb, self.next_active(sb))
        };
        self.commit(sb, self.small_blind);
        self.commit(bb, self.big_blind);
        self.bet_to_call = self.big_blind;
        self.phase = HoldemPhase::Preflop;

        let first = if heads_up { sb } else { self.next_active(bb) };
        match self.find_pending(first) {
            Some(seat) => self.turn = seat,
            // Blinds already have everyone all-in.
            None => self.advance_phase(),
        }
    }

    fn advance_action(&mut self) {
        match self.find_pending((self.turn + 1) % self.seats.len()) {
            Some(seat) => self.turn = seat,
            None => self.advance_phase(),
        }
    }

    /// Closes the betting round, dealing streets until someone can act
    /// or the board is complete.
    fn advance_phase(&mut self) {
        loop {
            for seat in &mut self.seats {
                seat.bet_this_round = 0;
                seat.acted = false;
            }
            self.bet_to_call = 0;

            match self.phase {
                HoldemPhase::Preflop => {
                    let cards = self.deck.deal(3);
                    self.community.extend(cards);
                    self.phase = HoldemPhase::Flop;
                }
                HoldemPhase::Flop => {
                    let card = self.deck.draw();
                    self.community.push(card);
                    self.phase = HoldemPhase::Turn;
                }
                HoldemPhase::Turn => {
                    let card = self.deck.draw();
                    self.community.push(card);
                    self.phase = HoldemPhase::River;
                }
                HoldemPhase::River => {
                    self.showdown();
                    return;
                }
                HoldemPhase::Showdown | HoldemPhase::GameOver => return,
            }

            // With fewer than two seats able to act there is no betting;
            // run the board out.
            if self.actionable_count() >= 2 {
                if let Some(seat) = self.find_pending((self.button + 1) % self.seats.len()) {
                    self.turn = seat;
                    return;
                }
            }
        }
    }

    /// Awards the whole pot to the last seat standing, no reveal.
    fn award_uncontested(&mut self, winner: usize) {
        let amount = self.pot;
        self.seats[winner].stack += amount;
        self.pot = 0;
        self.result = Some(HandResult {
            payouts: vec![(winner, amount)],
            showdown: None,
        });
        self.finish_hand();
    }

    fn showdown(&mut self) {
        let contenders = self.contenders();
        let revealed: Vec<ShowdownHand> = contenders
            .iter()
            .map(|&seat| {
                let mut cards = self.seats[seat].hole.clone();
                cards.extend(self.community.iter().copied());
                ShowdownHand {
                    seat,
                    hole: self.seats[seat].hole.clone(),
                    rank: best_five_from_seven(&cards),
                }
            })
            .collect();

        let best = revealed
            .iter()
            .map(|h| h.rank.clone())
            .max()
            .expect("at least one contender");
        // Winners in seat order, so odd chips favor the earliest seats.
        let winners: Vec<usize> = revealed
            .iter()
            .filter(|h| h.rank == best)
            .map(|h| h.seat)
            .collect();

        let share = self.pot / winners.len() as u32;
        let remainder = self.pot % winners.len() as u32;
        let mut payouts = Vec::with_capacity(winners.len());
        for (i, &seat) in winners.iter().enumerate() {
            let amount = share + u32::from((i as u32) < remainder);
            self.seats[seat].stack += amount;
            payouts.push((seat, amount));
        }
        self.pot = 0;

        self.result = Some(HandResult {
            payouts,
            showdown: Some(revealed),
        });
        self.finish_hand();
    }

    fn finish_hand(&mut self) {
        self.phase = if self.active_count() <= 1 {
            HoldemPhase::GameOver
        } else {
            HoldemPhase::Showdown
        };
    }
}

/// One seat as everyone may see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatView {
    pub stack: u32,
    pub bet_this_round: u32,
    pub folded: bool,
    pub all_in: bool,
    pub sitting_out: bool,
}

/// What one seat is allowed to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldemView {
    pub phase: HoldemPhase,
    pub seat: usize,
    pub hand_no: u32,
    pub community: Vec<Card>,
    pub pot: u32,
    pub bet_to_call: u32,
    pub turn: usize,
    pub button: usize,
    pub your_hole: Vec<Card>,
    pub seats: Vec<SeatView>,
    /// Present once the hand resolves; holes appear here only at a
    /// genuine showdown.
    pub result: Option<HandResult>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Holdem;

impl TableGame for Holdem {
    type Config = HoldemConfig;
    type State = HoldemState;
    type Action = HoldemAction;
    type View = HoldemView;

    fn init(config: &HoldemConfig, players: &[PlayerId], rng: &mut GameRng) -> HoldemState {
        let mut state = HoldemState {
            phase: HoldemPhase::Preflop,
            seats: players
                .iter()
                .map(|_| PokerSeat {
                    stack: config.starting_stack,
                    hole: Vec::new(),
                    folded: false,
                    all_in: false,
                    bet_this_round: 0,
                    acted: false,
                    sitting_out: false,
                })
                .collect(),
            deck: Deck::shuffled(rng),
            community: Vec::new(),
            pot: 0,
            bet_to_call: 0,
            turn: 0,
            button: 0,
            hand_no: 0,
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            result: None,
        };
        state.begin_hand(rng);
        state
    }

    fn validate(state: &HoldemState, seat: usize, action: &HoldemAction) -> Result<(), String> {
        if let HoldemAction::NextHand = action {
            if state.phase != HoldemPhase::Showdown {
                return Err("no hand to deal".to_string());
            }
            if seat != 0 {
                return Err("only the host deals the next hand".to_string());
            }
            return Ok(());
        }

        if !matches!(
            state.phase,
            HoldemPhase::Preflop | HoldemPhase::Flop | HoldemPhase::Turn | HoldemPhase::River
        ) {
            return Err("no betting round in progress".to_string());
        }
        if seat != state.turn {
            return Err("not your turn".to_string());
        }

        let player = &state.seats[seat];
        let owed = state.bet_to_call - player.bet_this_round;
        match action {
            HoldemAction::Fold => Ok(()),
            HoldemAction::Check => {
                if owed > 0 {
                    return Err(format!("cannot check owing {owed}; call or fold"));
                }
                Ok(())
            }
            HoldemAction::Call => {
                if owed == 0 {
                    return Err("nothing to call; check instead".to_string());
                }
                Ok(())
            }
            HoldemAction::Raise { to } => {
                if *to <= state.bet_to_call {
                    return Err(format!(
                        "raise must exceed the current bet of {}",
                        state.bet_to_call
                    ));
                }
                let min_raise = state.bet_to_call + state.big_blind;
                let all_in_short = to - player.bet_this_round >= player.stack;
                if *to < min_raise && !all_in_short {
                    return Err(format!("minimum raise is to {min_raise}"));
                }
                Ok(())
            }
            HoldemAction::NextHand => unreachable!(),
        }
    }

    fn apply(state: &mut HoldemState, seat: usize, action: HoldemAction, rng: &mut GameRng) {
        match action {
            HoldemAction::Fold => {
                state.seats[seat].folded = true;
                let contenders = state.contenders();
                if let [winner] = contenders[..] {
                    state.award_uncontested(winner);
                } else {
                    state.advance_action();
                }
            }
            HoldemAction::Check => {
                state.seats[seat].acted = true;
                state.advance_action();
            }
            HoldemAction::Call => {
                let owed = state.bet_to_call - state.seats[seat].bet_this_round;
                state.commit(seat, owed);
                state.seats[seat].acted = true;
                state.advance_action();
            }
            HoldemAction::Raise { to } => {
                let add = to - state.seats[seat].bet_this_round;
                state.commit(seat, add);
                state.bet_to_call = to;
                // A raise reopens action for everyone else.
                for (i, other) in state.seats.iter_mut().enumerate() {
                    other.acted = i == seat;
                }
                state.advance_action();
            }
            HoldemAction::NextHand => {
                state.begin_hand(rng);
            }
        }
    }

    fn view(state: &HoldemState, seat: usize) -> HoldemView {
        HoldemView {
            phase: state.phase,
            seat,
            hand_no: state.hand_no,
            community: state.community.clone(),
            pot: state.pot,
            bet_to_call: state.bet_to_call,
            turn: state.turn,
            button: state.button,
            your_hole: state.seats[seat].hole.clone(),
            seats: state
                .seats
                .iter()
                .map(|s| SeatView {
                    stack: s.stack,
                    bet_this_round: s.bet_this_round,
                    folded: s.folded,
                    all_in: s.all_in,
                    sitting_out: s.sitting_out,
                })
                .collect(),
            result: state.result.clone(),
        }
    }

    fn is_over(state: &HoldemState) -> bool {
        state.phase == HoldemPhase::GameOver
    }

    fn table() -> TableConfig {
        TableConfig {
            min_players: 2,
            max_players: 9,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};
    use crate::eval::HandCategory;

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n as u64).map(PlayerId).collect()
    }

    fn heads_up(stack: u32) -> (HoldemState, GameRng) {
        let mut rng = GameRng::new(42);
        let config = HoldemConfig {
            starting_stack: stack,
            small_blind: 1,
            big_blind: 2,
        };
        let state = Holdem::init(&config, &players(2), &mut rng);
        (state, rng)
    }

    fn must_apply(state: &mut HoldemState, seat: usize, action: HoldemAction, rng: &mut GameRng) {
        Holdem::validate(state, seat, &action).expect("action should be legal");
        Holdem::apply(state, seat, action, rng);
    }

    // --- blinds and the opening round ---------------------------------------

    #[test]
    fn test_heads_up_blinds_posted() {
        let (state, _rng) = heads_up(10);

        assert_eq!(state.phase, HoldemPhase::Preflop);
        assert_eq!(state.button, 0);
        // Button posts the small blind heads-up and acts first.
        assert_eq!(state.seats[0].bet_this_round, 1);
        assert_eq!(state.seats[1].bet_this_round, 2);
        assert_eq!(state.pot, 3);
        assert_eq!(state.bet_to_call, 2);
        assert_eq!(state.turn, 0);
        assert_eq!(state.seats[0].hole.len(), 2);
        assert_eq!(state.seats[1].hole.len(), 2);
    }

    #[test]
    fn test_call_then_check_advances_to_flop() {
        // Stacks [10,10], blinds [1,2]: small blind calls, big blind
        // checks; flop comes with pot 4 and the bet reset.
        let (mut state, mut rng) = heads_up(10);

        must_apply(&mut state, 0, HoldemAction::Call, &mut rng);
        // Big blind still has the option.
        assert_eq!(state.phase, HoldemPhase::Preflop);
        assert_eq!(state.turn, 1);

        must_apply(&mut state, 1, HoldemAction::Check, &mut rng);

        assert_eq!(state.phase, HoldemPhase::Flop);
        assert_eq!(state.community.len(), 3);
        assert_eq!(state.pot, 4);
        assert_eq!(state.bet_to_call, 0);
        assert_eq!(state.turn, 1, "big blind acts first after the flop");
    }

    #[test]
    fn test_three_handed_blinds_and_utg() {
        let mut rng = GameRng::new(7);
        let state = Holdem::init(&HoldemConfig::default(), &players(3), &mut rng);

        assert_eq!(state.button, 0);
        assert_eq!(state.seats[1].bet_this_round, 1);
        assert_eq!(state.seats[2].bet_this_round, 2);
        assert_eq!(state.turn, 0, "button is under the gun three-handed");
    }

    // --- action legality ----------------------------------------------------

    #[test]
    fn test_check_while_owing_rejected() {
        let (state, _rng) = heads_up(10);
        let result = Holdem::validate(&state, 0, &HoldemAction::Check);
        assert!(result.is_err(), "small blind owes one chip");
    }

    #[test]
    fn test_out_of_turn_rejected_without_mutation() {
        let (state, _rng) = heads_up(10);
        let before = state.clone();
        assert!(Holdem::validate(&state, 1, &HoldemAction::Call).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_raise_below_minimum_rejected() {
        let (state, _rng) = heads_up(100);
        // Bet to call is 2, big blind 2: raises to 3 are short of the
        // minimum of 4 and seat 0 is not stack-limited.
        assert!(Holdem::validate(&state, 0, &HoldemAction::Raise { to: 3 }).is_err());
        assert!(Holdem::validate(&state, 0, &HoldemAction::Raise { to: 2 }).is_err());
        assert!(Holdem::validate(&state, 0, &HoldemAction::Raise { to: 4 }).is_ok());
    }

    #[test]
    fn test_short_all_in_raise_allowed() {
        let (state, _rng) = heads_up(3);
        // Seat 0 has 2 chips behind after the blind; raising to 3 puts
        // them all-in below the minimum raise, which is allowed.
        assert!(Holdem::validate(&state, 0, &HoldemAction::Raise { to: 3 }).is_ok());
    }

    #[test]
    fn test_raise_reopens_action() {
        let (mut state, mut rng) = heads_up(100);
        must_apply(&mut state, 0, HoldemAction::Call, &mut rng);
        must_apply(&mut state, 1, HoldemAction::Raise { to: 6 }, &mut rng);

        assert_eq!(state.phase, HoldemPhase::Preflop, "seat 0 must respond");
        assert_eq!(state.turn, 0);
        assert_eq!(state.bet_to_call, 6);

        must_apply(&mut state, 0, HoldemAction::Call, &mut rng);
        assert_eq!(state.phase, HoldemPhase::Flop);
        assert_eq!(state.pot, 12);
    }

    #[test]
    fn test_call_capped_at_stack_goes_all_in() {
        let (mut state, mut rng) = heads_up(100);
        must_apply(&mut state, 0, HoldemAction::Raise { to: 200 }, &mut rng);

        // Seat 1 owes 198 but holds 98: the call is an all-in.
        must_apply(&mut state, 1, HoldemAction::Call, &mut rng);

        assert!(state.seats[1].all_in);
        assert_eq!(state.seats[1].stack, 0);
    }

    // --- folds --------------------------------------------------------------

    #[test]
    fn test_fold_awards_pot_without_reveal() {
        let (mut state, mut rng) = heads_up(10);

        must_apply(&mut state, 0, HoldemAction::Fold, &mut rng);

        assert_eq!(state.phase, HoldemPhase::Showdown);
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.payouts, vec![(1, 3)]);
        assert!(result.showdown.is_none(), "no holes revealed on a fold win");
        assert_eq!(state.seats[1].stack, 11);
        assert_eq!(state.seats[0].stack, 9);
    }

    // --- showdown -----------------------------------------------------------

    /// Runs a scripted river showdown: replaces holes and community,
    /// then resolves.
    fn scripted_showdown(
        state: &mut HoldemState,
        holes: Vec<Vec<Card>>,
        community: Vec<Card>,
        pot: u32,
    ) {
        for (seat, hole) in holes.into_iter().enumerate() {
            state.seats[seat].hole = hole;
        }
        state.community = community;
        state.pot = pot;
        state.phase = HoldemPhase::River;
        state.showdown();
    }

    #[test]
    fn test_showdown_better_hand_takes_pot() {
        use Rank::*;
        let (mut state, _rng) = heads_up(10);
        let stacks = [state.seats[0].stack, state.seats[1].stack];
        scripted_showdown(
            &mut state,
            vec![
                vec![c(Ace, Suit::Hearts), c(Ace, Suit::Diamonds)],
                vec![c(King, Suit::Hearts), c(King, Suit::Diamonds)],
            ],
            vec![
                c(Two, Suit::Clubs),
                c(Seven, Suit::Spades),
                c(Nine, Suit::Hearts),
                c(Jack, Suit::Clubs),
                c(Four, Suit::Diamonds),
            ],
            3,
        );

        let result = state.result.as_ref().unwrap();
        assert_eq!(result.payouts, vec![(0, 3)]);
        assert_eq!(state.seats[0].stack, stacks[0] + 3);
        assert_eq!(state.seats[1].stack, stacks[1]);

        let revealed = result.showdown.as_ref().unwrap();
        assert_eq!(revealed.len(), 2);
        assert_eq!(revealed[0].rank.category, HandCategory::Pair);
    }

    #[test]
    fn test_split_pot_odd_chip_to_earliest_seat() {
        use Rank::*;
        let (mut state, _rng) = heads_up(10);
        let stacks = [state.seats[0].stack, state.seats[1].stack];
        // The board plays for both: identical best five, pot of 5.
        scripted_showdown(
            &mut state,
            vec![
                vec![c(Two, Suit::Hearts), c(Three, Suit::Hearts)],
                vec![c(Two, Suit::Diamonds), c(Three, Suit::Diamonds)],
            ],
            vec![
                c(Ten, Suit::Spades),
                c(Jack, Suit::Spades),
                c(Queen, Suit::Spades),
                c(King, Suit::Spades),
                c(Ace, Suit::Spades),
            ],
            5,
        );

        let result = state.result.as_ref().unwrap();
        assert_eq!(result.payouts, vec![(0, 3), (1, 2)]);
        assert_eq!(state.seats[0].stack, stacks[0] + 3);
        assert_eq!(state.seats[1].stack, stacks[1] + 2);
    }

    // --- hand-to-hand continuity --------------------------------------------

    #[test]
    fn test_button_rotates_between_hands() {
        let (mut state, mut rng) = heads_up(100);
        assert_eq!(state.button, 0);
        must_apply(&mut state, 0, HoldemAction::Fold, &mut rng);

        must_apply(&mut state, 0, HoldemAction::NextHand, &mut rng);

        assert_eq!(state.button, 1);
        assert_eq!(state.hand_no, 2);
        assert_eq!(state.seats[1].bet_this_round, 1, "new button posts small");
        assert_eq!(state.turn, 1);
    }

    #[test]
    fn test_next_hand_host_only_and_only_after_showdown() {
        let (mut state, mut rng) = heads_up(100);
        assert!(Holdem::validate(&state, 0, &HoldemAction::NextHand).is_err());
        must_apply(&mut state, 0, HoldemAction::Fold, &mut rng);
        assert!(Holdem::validate(&state, 1, &HoldemAction::NextHand).is_err());
        assert!(Holdem::validate(&state, 0, &HoldemAction::NextHand).is_ok());
    }

    #[test]
    fn test_stacks_persist_across_hands() {
        let (mut state, mut rng) = heads_up(100);
        must_apply(&mut state, 0, HoldemAction::Fold, &mut rng);
        assert_eq!(state.seats[0].stack, 99);
        assert_eq!(state.seats[1].stack, 101);

        must_apply(&mut state, 0, HoldemAction::NextHand, &mut rng);
        // Hand 2: seat 1 is the button and posts 1; seat 0 posts 2.
        assert_eq!(state.seats[0].stack, 97);
        assert_eq!(state.seats[1].stack, 100);
    }

    #[test]
    fn test_busted_player_ends_heads_up_game() {
        use Rank::*;
        let (mut state, mut rng) = heads_up(10);
        must_apply(&mut state, 0, HoldemAction::Raise { to: 10 }, &mut rng);
        must_apply(&mut state, 1, HoldemAction::Call, &mut rng);

        // Both all-in; the board ran out and someone won. Force a known
        // outcome for the assertion instead of trusting the deal.
        state.seats[0].stack = 20;
        state.seats[1].stack = 0;
        state.phase = HoldemPhase::Showdown;

        must_apply(&mut state, 0, HoldemAction::NextHand, &mut rng);
        assert_eq!(state.phase, HoldemPhase::GameOver);
        assert!(Holdem::is_over(&state));
    }

    #[test]
    fn test_all_in_preflop_runs_out_the_board() {
        let (mut state, mut rng) = heads_up(10);
        must_apply(&mut state, 0, HoldemAction::Raise { to: 10 }, &mut rng);
        must_apply(&mut state, 1, HoldemAction::Call, &mut rng);

        // Nobody can act: streets deal themselves to a showdown.
        assert_eq!(state.community.len(), 5);
        assert!(matches!(
            state.phase,
            HoldemPhase::Showdown | HoldemPhase::GameOver
        ));
        assert!(state.result.is_some());
        assert_eq!(state.pot, 0, "the pot was paid out");
        assert_eq!(
            state.seats[0].stack + state.seats[1].stack,
            20,
            "chips are conserved"
        );
    }

    // --- views --------------------------------------------------------------

    #[test]
    fn test_views_hide_other_holes() {
        let (state, _rng) = heads_up(10);

        let v0 = Holdem::view(&state, 0);
        let v1 = Holdem::view(&state, 1);

        assert_eq!(v0.your_hole, state.seats[0].hole);
        assert_eq!(v1.your_hole, state.seats[1].hole);
        assert_ne!(v0.your_hole, v1.your_hole);
        // Public seat data carries no cards.
        assert_eq!(v0.seats.len(), 2);
        assert_eq!(v0.pot, 3);
    }

    #[test]
    fn test_showdown_reveals_contender_holes_to_everyone() {
        use Rank::*;
        let (mut state, _rng) = heads_up(10);
        scripted_showdown(
            &mut state,
            vec![
                vec![c(Ace, Suit::Hearts), c(Ace, Suit::Diamonds)],
                vec![c(King, Suit::Hearts), c(King, Suit::Diamonds)],
            ],
            vec![
                c(Two, Suit::Clubs),
                c(Seven, Suit::Spades),
                c(Nine, Suit::Hearts),
                c(Jack, Suit::Clubs),
                c(Four, Suit::Diamonds),
            ],
            3,
        );

        let view = Holdem::view(&state, 1);
        let revealed = view.result.unwrap().showdown.unwrap();
        assert!(revealed.iter().any(|h| h.seat == 0
            && h.hole == vec![c(Ace, Suit::Hearts), c(Ace, Suit::Diamonds)]));
    }

    #[test]
    fn test_action_json_shape() {
        let action = HoldemAction::Raise { to: 40 };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json, serde_json::json!({"type": "raise", "to": 40}));

        let parsed: HoldemAction = serde_json::from_str(r#"{"type":"fold"}"#).unwrap();
        assert_eq!(parsed, HoldemAction::Fold);
    }
}
