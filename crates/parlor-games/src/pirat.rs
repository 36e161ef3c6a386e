//! Pirat: a fixed 13-round trick-taking game for exactly 4 players.
//!
//! Hand sizes follow the schedule `[1,2,3,4,5,6,7,6,5,4,3,2,1]`, spades
//! are always trump, and players bid the number of tricks they expect to
//! win each round. Hitting the bid exactly pays `10 + tricks`; missing
//! by `d` costs `d`.

use parlor_protocol::PlayerId;
use parlor_room::{GameRng, TableConfig, TableGame};
use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck, Suit};

/// Seats at a Pirat table, always exactly four.
pub const SEATS: usize = 4;

/// Cards dealt per player, round by round. Peaks at 7, the round that
/// uses 28 of the 52 cards.
pub const HAND_SIZES: [usize; 13] = [1, 2, 3, 4, 5, 6, 7, 6, 5, 4, 3, 2, 1];

/// The fixed trump suit.
pub const TRUMP: Suit = Suit::Spades;

/// Decides a completed trick: the highest trump wins; with no trump
/// played, the highest card of the lead suit wins.
///
/// `plays` is in play order, `(seat, card)`, with the leader first.
pub fn trick_winner(plays: &[(usize, Card)]) -> usize {
    let lead = plays[0].1.suit;
    plays
        .iter()
        .max_by_key(|(_, card)| (card.suit == TRUMP, card.suit == lead, card.rank))
        .map(|(seat, _)| *seat)
        .expect("a trick has at least one play")
}

// ---------------------------------------------------------------------------
// Engine types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PiratConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiratPhase {
    /// Everyone privately picks a bid in `[0, hand_size]`.
    Bid,
    /// All bids are on the table; waiting for any player to acknowledge.
    BidReveal,
    /// Tricks are being played.
    Play,
    /// Round scored; host deals the next one.
    RoundDone,
    /// Thirteen rounds played.
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PiratAction {
    /// Commit a private bid for this round.
    Bid { tricks: u8 },
    /// Acknowledge the bid reveal and begin play. Any seat may send it.
    RevealOk,
    /// Play a card from your hand.
    PlayCard { card: Card },
    /// Host deals the next round.
    NextRound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PiratState {
    phase: PiratPhase,
    /// 0-based round index into [`HAND_SIZES`].
    round: usize,
    hands: Vec<Vec<Card>>,
    bids: Vec<Option<u8>>,
    tricks_won: Vec<u8>,
    scores: Vec<i32>,
    /// `round % 4`; the leader of the first trick sits to their left.
    dealer: usize,
    /// Seat leading the current trick.
    leader: usize,
    turn: usize,
    /// Plays of the trick in progress, in play order.
    trick: Vec<(usize, Card)>,
    /// The previous trick and its winner, kept for display.
    last_trick: Option<(Vec<(usize, Card)>, usize)>,
    /// Seats tied at the top score once the game ends.
    winners: Vec<usize>,
}

impl PiratState {
    fn hand_size(&self) -> usize {
        HAND_SIZES[self.round]
    }

    fn deal_round(&mut self, rng: &mut GameRng) {
        let mut deck = Deck::shuffled(rng);
        let size = self.hand_size();
        self.hands = (0..SEATS)
            .map(|_| {
                let mut hand = deck.deal(size);
                hand.sort();
                hand
            })
            .collect();
        self.bids = vec![None; SEATS];
        self.tricks_won = vec![0; SEATS];
        self.dealer = self.round % SEATS;
        self.leader = (self.dealer + 1) % SEATS;
        self.turn = self.leader;
        self.trick.clear();
        self.last_trick = None;
        self.phase = PiratPhase::Bid;
    }

    fn score_round(&mut self) {
        for seat in 0..SEATS {
            let bid = self.bids[seat].expect("all bids placed before play") as i32;
            let won = self.tricks_won[seat] as i32;
            self.scores[seat] += if bid == won { 10 + won } else { -(bid - won).abs() };
        }

        if self.round + 1 == HAND_SIZES.len() {
            let top = *self.scores.iter().max().expect("four seats");
            self.winners = (0..SEATS).filter(|&s| self.scores[s] == top).collect();
            self.phase = PiratPhase::GameOver;
        } else {
            self.phase = PiratPhase::RoundDone;
        }
    }

    fn holds_suit(&self, seat: usize, suit: Suit) -> bool {
        self.hands[seat].iter().any(|c| c.suit == suit)
    }
}

/// What one seat is allowed to see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PiratView {
    pub phase: PiratPhase,
    pub seat: usize,
    pub round: usize,
    pub hand_size: usize,
    pub your_hand: Vec<Card>,
    /// Which seats have committed a bid (public during bidding).
    pub bids_placed: Vec<bool>,
    /// The bids themselves, hidden until the reveal.
    pub bids: Vec<Option<u8>>,
    pub tricks_won: Vec<u8>,
    pub scores: Vec<i32>,
    pub dealer: usize,
    pub leader: usize,
    pub turn: usize,
    pub trick: Vec<(usize, Card)>,
    pub last_trick: Option<(Vec<(usize, Card)>, usize)>,
    pub winners: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Pirat;

impl TableGame for Pirat {
    type Config = PiratConfig;
    type State = PiratState;
    type Action = PiratAction;
    type View = PiratView;

    fn init(_config: &PiratConfig, players: &[PlayerId], rng: &mut GameRng) -> PiratState {
        debug_assert_eq!(players.len(), SEATS);
        let mut state = PiratState {
            phase: PiratPhase::Bid,
            round: 0,
            hands: Vec::new(),
            bids: Vec::new(),
            tricks_won: Vec::new(),
            scores: vec![0; SEATS],
            dealer: 0,
            leader: 0,
            turn: 0,
            trick: Vec::new(),
            last_trick: None,
            winners: Vec::new(),
        };
        state.deal_round(rng);
        state
    }

    fn validate(state: &PiratState, seat: usize, action: &PiratAction) -> Result<(), String> {
        match action {
            PiratAction::Bid { tricks } => {
                if state.phase != PiratPhase::Bid {
                    return Err("bidding is closed".to_string());
                }
                if state.bids[seat].is_some() {
                    return Err("you already bid this round".to_string());
                }
                if *tricks as usize > state.hand_size() {
                    return Err(format!(
                        "bid must be between 0 and {}",
                        state.hand_size()
                    ));
                }
                Ok(())
            }
            PiratAction::RevealOk => {
                if state.phase != PiratPhase::BidReveal {
                    return Err("bids are not being revealed".to_string());
                }
                Ok(())
            }
            PiratAction::PlayCard { card } => {
                if state.phase != PiratPhase::Play {
                    return Err("no trick in play".to_string());
                }
                if seat != state.turn {
                    return Err("not your turn".to_string());
                }
                if !state.hands[seat].contains(card) {
                    return Err(format!("{card} is not in your hand"));
                }
                // Follow suit when able; otherwise anything goes,
                // trump included.
                if let Some((_, lead_card)) = state.trick.first()
                    && card.suit != lead_card.suit
                    && state.holds_suit(seat, lead_card.suit)
                {
                    return Err(format!("you must follow {}", lead_card.suit.name()));
                }
                Ok(())
            }
            PiratAction::NextRound => {
                if state.phase != PiratPhase::RoundDone {
                    return Err("no round to deal".to_string());
                }
                if seat != 0 {
                    return Err("only the host deals the next round".to_string());
                }
                Ok(())
            }
        }
    }

    fn apply(state: &mut PiratState, seat: usize, action: PiratAction, rng: &mut GameRng) {
        match action {
            PiratAction::Bid { tricks } => {
                state.bids[seat] = Some(tricks);
                if state.bids.iter().all(|b| b.is_some()) {
                    state.phase = PiratPhase::BidReveal;
                }
            }
            PiratAction::RevealOk => {
                state.phase = PiratPhase::Play;
            }
            PiratAction::PlayCard { card } => {
                let hand = &mut state.hands[seat];
                let pos = hand.iter().position(|c| *c == card).expect("validated");
                hand.remove(pos);
                state.trick.push((seat, card));

                if state.trick.len() == SEATS {
                    let winner = trick_winner(&state.trick);
                    state.tricks_won[winner] += 1;
                    state.last_trick = Some((std::mem::take(&mut state.trick), winner));
                    state.leader = winner;
                    state.turn = winner;

                    if state.hands.iter().all(|h| h.is_empty()) {
                        state.score_round();
                    }
                } else {
                    state.turn = (state.turn + 1) % SEATS;
                }
            }
            PiratAction::NextRound => {
                state.round += 1;
                state.deal_round(rng);
            }
        }
    }

    fn view(state: &PiratState, seat: usize) -> PiratView {
        let bidding = state.phase == PiratPhase::Bid;
        let bids = if bidding {
            // During bidding only your own bid is visible.
            (0..SEATS)
                .map(|s| if s == seat { state.bids[s] } else { None })
                .collect()
        } else {
            state.bids.clone()
        };

        PiratView {
            phase: state.phase,
            seat,
            round: state.round,
            hand_size: state.hand_size(),
            your_hand: state.hands[seat].clone(),
            bids_placed: state.bids.iter().map(|b| b.is_some()).collect(),
            bids,
            tricks_won: state.tricks_won.clone(),
            scores: state.scores.clone(),
            dealer: state.dealer,
            leader: state.leader,
            turn: state.turn,
            trick: state.trick.clone(),
            last_trick: state.last_trick.clone(),
            winners: state.winners.clone(),
        }
    }

    fn is_over(state: &PiratState) -> bool {
        state.phase == PiratPhase::GameOver
    }

    fn table() -> TableConfig {
        TableConfig {
            min_players: SEATS,
            max_players: SEATS,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
